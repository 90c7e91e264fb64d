use crossterm::event::KeyCode;
use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect, Size};

use term_kit::component::NodeId;
use term_kit::event::InputEvent;
use term_kit::focus::{FocusChangeDirection, InteractableLookupMap};
use term_kit::layout::LinearLayout;
use term_kit::root_pane::RootPane;
use term_kit::ui::UiFrame;
use term_kit::widgets::{Button, Label, Panel};

fn draw(pane: &mut RootPane, width: u16, height: u16) {
    let area = Rect::new(0, 0, width, height);
    let mut buffer = Buffer::empty(area);
    let mut frame = UiFrame::from_parts(area, &mut buffer);
    pane.draw(&mut frame, area).unwrap();
}

/// Buttons laid out by a linear layout as the pane's content.
fn pane_with_buttons(layout: LinearLayout, count: usize) -> (RootPane, Vec<NodeId>) {
    let mut pane = RootPane::new();
    let tree = pane.tree_mut();
    let panel = tree.create_container(Panel::new(), layout);
    let buttons = (0..count)
        .map(|i| {
            let id = tree.create_interactable(Button::new(format!("b{i}")));
            tree.add_child(panel, id).unwrap();
            id
        })
        .collect();
    pane.set_content(panel).unwrap();
    draw(&mut pane, 60, 12);
    (pane, buttons)
}

#[test]
fn right_from_the_leftmost_selects_its_neighbour_and_stops_at_the_end() {
    let (pane, buttons) = pane_with_buttons(LinearLayout::horizontal().with_spacing(1), 4);
    let lookup = pane.lookup();
    let tree = pane.tree();
    assert_eq!(lookup.find_next_right(tree, buttons[0]), Some(buttons[1]));
    assert_eq!(lookup.find_next_right(tree, buttons[2]), Some(buttons[3]));
    assert_eq!(lookup.find_next_right(tree, buttons[3]), None);
    assert_eq!(lookup.find_next_left(tree, buttons[0]), None);
}

#[test]
fn down_then_up_round_trips_in_a_column() {
    let (pane, buttons) = pane_with_buttons(LinearLayout::vertical(), 5);
    let lookup = pane.lookup();
    let tree = pane.tree();
    for window in buttons.windows(2) {
        let below = lookup.find_next_down(tree, window[0]);
        assert_eq!(below, Some(window[1]));
        assert_eq!(lookup.find_next_up(tree, window[1]), Some(window[0]));
    }
    assert_eq!(
        lookup.find_next(tree, buttons[4], FocusChangeDirection::Down),
        None
    );
}

#[test]
fn arrow_keys_walk_the_row_through_the_pane() {
    let (mut pane, buttons) = pane_with_buttons(LinearLayout::horizontal().with_spacing(1), 3);
    assert!(pane.dispatch(&InputEvent::key(KeyCode::Right)));
    assert_eq!(pane.focused(), Some(buttons[0]));
    assert!(pane.dispatch(&InputEvent::key(KeyCode::Right)));
    assert_eq!(pane.focused(), Some(buttons[1]));
    assert!(pane.dispatch(&InputEvent::key(KeyCode::Right)));
    assert!(!pane.dispatch(&InputEvent::key(KeyCode::Right)));
    assert_eq!(pane.focused(), Some(buttons[2]));
}

#[test]
fn lookup_is_empty_outside_its_area_for_every_size() {
    let (pane, _) = pane_with_buttons(LinearLayout::horizontal(), 2);
    for width in 0..6u16 {
        for height in 0..4u16 {
            let mut map = InteractableLookupMap::default();
            map.rebuild(pane.tree(), Size::new(width, height));
            for (x, y) in [(width, 0), (0, height), (width, height), (u16::MAX, u16::MAX)] {
                assert_eq!(map.at(Position::new(x, y)), None, "{width}x{height} at ({x},{y})");
            }
        }
    }
}

#[test]
fn structural_changes_invalidate_until_the_next_redraw() {
    let (mut pane, buttons) = pane_with_buttons(LinearLayout::vertical(), 2);
    assert!(!pane.is_invalid());

    let label = pane.tree_mut().create_leaf(Label::new("new"));
    let content = pane.content();
    pane.tree_mut().add_child(content, label).unwrap();
    assert!(pane.is_invalid());
    draw(&mut pane, 60, 12);
    assert!(!pane.is_invalid());

    pane.tree_mut().remove(buttons[0]).unwrap();
    assert!(pane.is_invalid());
    draw(&mut pane, 60, 12);
    assert!(!pane.is_invalid());
}

#[test]
fn hiding_the_focused_component_clears_focus_and_dirties_the_parent() {
    let (mut pane, buttons) = pane_with_buttons(LinearLayout::vertical(), 2);
    assert!(pane.set_focus(Some(buttons[1]), FocusChangeDirection::Teleport));
    draw(&mut pane, 60, 12);
    assert!(!pane.is_invalid());

    pane.tree_mut().set_visible(buttons[1], false).unwrap();
    assert_eq!(pane.focused(), None);
    let content = pane.content();
    assert!(pane.tree().is_invalid(content));
    assert!(!pane.tree().is_invalid(buttons[1]));
}

#[test]
fn disabled_buttons_are_skipped_by_tab() {
    let (mut pane, buttons) = pane_with_buttons(LinearLayout::vertical(), 3);
    pane.tree_mut().set_enabled(buttons[1], false).unwrap();
    pane.dispatch(&InputEvent::key(KeyCode::Tab));
    assert_eq!(pane.focused(), Some(buttons[0]));
    pane.dispatch(&InputEvent::key(KeyCode::Tab));
    assert_eq!(pane.focused(), Some(buttons[2]));
    assert!(!pane.set_focus(Some(buttons[1]), FocusChangeDirection::Teleport));
}
