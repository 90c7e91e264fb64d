use ratatui::layout::Rect;

use crate::component::{ComponentContext, ComponentTree, NodeId, Widget};
use crate::layout::LinearLayout;
use crate::ui::UiFrame;
use crate::widgets::Button;

/// Strip along the top row of a root pane holding menu buttons.
#[derive(Debug, Clone, Copy, Default)]
pub struct MenuBar;

impl Widget for MenuBar {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        frame.fill(area, ctx.theme().normal);
    }

    fn theme_class(&self) -> &'static str {
        "menu"
    }
}

/// Build a menu bar container with one button per `(label, action)` entry.
/// Install it with `RootPane::set_menu_bar`.
pub fn create_menu_bar<I, F>(tree: &mut ComponentTree, entries: I) -> NodeId
where
    I: IntoIterator<Item = (String, F)>,
    F: FnMut() + 'static,
{
    let bar = tree.create_container(MenuBar, LinearLayout::horizontal().with_spacing(1));
    for (label, action) in entries {
        let item = tree.create_interactable(
            Button::new(label)
                .with_action(action)
                .with_theme_class("menu"),
        );
        // Freshly created nodes cannot form a cycle.
        let _ = tree.add_child(bar, item);
    }
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() {}

    #[test]
    fn entries_become_focusable_buttons() {
        let mut tree = ComponentTree::new();
        let bar = create_menu_bar(
            &mut tree,
            [
                ("File".to_string(), noop as fn()),
                ("Edit".to_string(), noop as fn()),
            ],
        );
        assert_eq!(tree.children(bar).len(), 2);
        assert_eq!(tree.focusables(bar).len(), 2);
        let first = tree.children(bar)[0];
        assert_eq!(tree.widget::<Button>(first).unwrap().label(), "File");
    }
}
