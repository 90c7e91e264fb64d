use ratatui::layout::{Offset, Size};

use term_kit::error::GuiError;
use term_kit::gui::MultiWindowGui;
use term_kit::gui_thread::spawn_gui_thread;
use term_kit::screen::VirtualScreen;
use term_kit::widgets::Label;
use term_kit::window::{Hints, Window};

fn spawn() -> term_kit::gui_thread::GuiThread {
    spawn_gui_thread(|| Ok(MultiWindowGui::new(VirtualScreen::new(Size::new(40, 12))))).unwrap()
}

#[test]
fn windows_added_from_another_thread_are_drawn() {
    let gui = spawn();
    let handle = gui.handle().clone();

    let id = handle
        .invoke_and_wait(|gui| {
            let mut window = Window::new("remote").with_hints(Hints::FIXED_POSITION);
            window.set_position(Offset { x: 0, y: 0 });
            let pane = window.pane_mut();
            let content = pane.content();
            let label = pane.tree_mut().create_leaf(Label::new("hi"));
            let _ = pane.tree_mut().add_child(content, label);
            gui.add_window(window)
        })
        .unwrap();

    let (count, active) = handle
        .invoke_and_wait(|gui| (gui.windows().count(), gui.active_window()))
        .unwrap();
    assert_eq!(count, 1);
    assert_eq!(active, Some(id));

    let title = handle
        .invoke_and_wait(|gui| {
            gui.update_screen().map(|()| {
                let buffer = gui.screen().buffer();
                (0..10).map(|x| buffer[(x, 0)].symbol().to_string()).collect::<String>()
            })
        })
        .unwrap()
        .unwrap();
    assert!(title.starts_with('┌'), "{title:?}");

    handle.stop();
    gui.join().unwrap();
}

#[test]
fn tasks_run_in_submission_order() {
    let gui = spawn();
    let handle = gui.handle().clone();
    for title in ["one", "two", "three"] {
        handle
            .invoke_later(move |gui| {
                gui.add_window(Window::new(title));
            })
            .unwrap();
    }
    let titles = handle
        .invoke_and_wait(|gui| gui.windows().map(|w| w.title().to_string()).collect::<Vec<_>>())
        .unwrap();
    assert_eq!(titles, vec!["one", "two", "three"]);

    handle.stop();
    gui.join().unwrap();
}

#[test]
fn stopped_gui_rejects_new_work() {
    let gui = spawn();
    let handle = gui.handle().clone();
    handle.stop();
    gui.join().unwrap();

    assert!(matches!(
        handle.invoke_later(|_| {}),
        Err(GuiError::GuiThreadStopped)
    ));
    assert!(matches!(
        handle.invoke_and_wait(|gui| gui.windows().count()),
        Err(GuiError::GuiThreadStopped)
    ));
}

#[test]
fn builder_errors_are_returned_from_spawn() {
    let result = spawn_gui_thread(|| Err(GuiError::GuiThreadStopped));
    assert!(matches!(result, Err(GuiError::GuiThreadStopped)));
}
