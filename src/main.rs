use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use crossterm::event::{KeyCode, KeyModifiers};
use indoc::indoc;

use term_kit::EventLoop;
use term_kit::component::{ComponentTree, NodeId};
use term_kit::error::{GuiError, TreeError};
use term_kit::event::InputEvent;
use term_kit::gui::{GuiConfig, MultiWindowGui};
use term_kit::gui_thread::GuiHandle;
use term_kit::keybindings::KeyCombo;
use term_kit::layout::LinearLayout;
use term_kit::logging::{self, LogBuffer};
use term_kit::screen::TerminalScreen;
use term_kit::widgets::{Border, Button, CheckBox, Label, Panel, create_menu_bar};
use term_kit::window::{Hints, Window};

const HELP: &str = indoc! {"
    Tab / Shift+Tab   next / previous control
    Arrow keys        move focus spatially
    Enter / Space     press the focused control
    Drag a title bar  move a window
    Ctrl+N            next window
    Ctrl+W            close the active window
    Ctrl+Q            quit
"};

#[derive(Parser, Debug)]
#[command(
    name = "term-kit-demo",
    version = env!("CARGO_PKG_VERSION"),
    about = "Interactive tour of the term-kit widgets and window manager"
)]
struct Cli {
    /// Number of button windows opened at start-up.
    #[arg(short = 'w', long = "windows", default_value_t = 2)]
    windows: usize,

    /// Block on terminal input instead of polling it.
    #[arg(long)]
    blocking_io: bool,

    /// Polling interval when not blocking.
    #[arg(long, value_name = "MILLIS", default_value_t = term_kit::constants::DEFAULT_POLL_INTERVAL_MS)]
    poll_ms: u64,

    /// Arrow keys never fall back to tab order.
    #[arg(long)]
    strict_focus: bool,

    /// Treat arrow keys as plain next / previous.
    #[arg(long)]
    no_spatial_focus: bool,

    /// Write logs to this file instead of the in-memory buffer.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Print the newest log lines after exit.
    #[arg(long, value_name = "LINES")]
    dump_log: Option<usize>,
}

fn main() -> Result<(), GuiError> {
    let cli = Cli::parse();
    let log = LogBuffer::default();
    match &cli.log_file {
        Some(path) => logging::init_file(path)?,
        None => {
            logging::set_global_log_buffer(log.clone());
            logging::init_default();
        }
    }

    let config = GuiConfig {
        blocking_io: cli.blocking_io,
        eof_when_no_windows: true,
        poll_interval: Duration::from_millis(cli.poll_ms),
    };
    let result = run(&cli, config);

    if let Some(lines) = cli.dump_log {
        for line in log.tail(lines) {
            eprintln!("{line}");
        }
    }
    result
}

fn run(cli: &Cli, config: GuiConfig) -> Result<(), GuiError> {
    let screen = TerminalScreen::new()?;
    let mut gui = MultiWindowGui::with_config(screen, config);
    install_global_keys(&mut gui);

    let handle = gui.handle();
    gui.add_window(help_window(&handle, cli)?);
    for index in 0..cli.windows {
        gui.add_window(button_window(index + 1, cli)?);
    }
    EventLoop::new(config.poll_interval).run(&mut gui)
}

fn install_global_keys(gui: &mut MultiWindowGui) {
    let handle = gui.handle();
    gui.add_unhandled_input_listener(move |event| {
        let InputEvent::Key(key) = event else {
            return false;
        };
        if !key.modifiers.contains(KeyModifiers::CONTROL) {
            return false;
        }
        let scheduled = match key.code {
            KeyCode::Char('q') => {
                handle.stop();
                Ok(())
            }
            KeyCode::Char('n') => handle.invoke_later(|gui| {
                let _ = gui.cycle_active_window(false);
            }),
            KeyCode::Char('w') => handle.invoke_later(|gui| {
                if let Some(id) = gui.active_window() {
                    let _ = gui.close_window(id);
                }
            }),
            _ => return false,
        };
        if let Err(err) = scheduled {
            tracing::warn!(%err, "could not schedule shortcut");
        }
        true
    });
}

fn configure(window: &mut Window, cli: &Cli) {
    let pane = window.pane_mut();
    pane.set_strict_focus_change(cli.strict_focus);
    pane.set_direction_based_movements(!cli.no_spatial_focus);
}

fn help_window(handle: &GuiHandle, cli: &Cli) -> Result<Window, TreeError> {
    let mut window = Window::new("term-kit").with_hints(Hints::CENTERED);
    configure(&mut window, cli);
    let pane = window.pane_mut();

    let open = handle.clone();
    let quit = handle.clone();
    let entries: Vec<(String, Box<dyn FnMut()>)> = vec![
        (
            "New window".to_string(),
            Box::new(move || {
                let _ = open.invoke_later(|gui| {
                    let number = gui.windows().count() + 1;
                    match button_window_plain(number) {
                        Ok(window) => {
                            gui.add_window(window);
                        }
                        Err(err) => tracing::warn!(%err, "could not build window"),
                    }
                });
            }),
        ),
        ("Quit".to_string(), Box::new(move || quit.stop())),
    ];
    let bar = create_menu_bar(pane.tree_mut(), entries);
    pane.set_menu_bar(Some(bar))?;

    let tree = pane.tree_mut();
    let column = tree.create_container(Panel::new(), LinearLayout::vertical().with_spacing(1));
    let help = tree.create_leaf(Label::new(HELP.trim_end()));
    tree.add_child(column, help)?;
    let remember = tree.create_interactable(CheckBox::new("Remember window positions"));
    tree.add_child(column, remember)?;
    pane.set_content(column)?;
    Ok(window)
}

fn button_window(number: usize, cli: &Cli) -> Result<Window, TreeError> {
    let mut window = button_window_plain(number)?;
    configure(&mut window, cli);
    Ok(window)
}

/// A 3x3 grid of buttons inside a titled border, for spatial navigation.
fn button_window_plain(number: usize) -> Result<Window, TreeError> {
    let mut window = Window::new(format!("Buttons {number}"));
    let tree = window.pane_mut().tree_mut();
    let grid = build_grid(tree, number)?;
    let frame = tree.create_composite(Border::titled("grid"));
    tree.set_child(frame, Some(grid))?;
    let content = tree.create_container(
        Panel::new().with_shortcut(KeyCombo::new(KeyCode::Char('r'), KeyModifiers::NONE), || {
            tracing::info!("reset requested");
        }),
        LinearLayout::vertical(),
    );
    tree.add_child(content, frame)?;
    window.pane_mut().set_content(content)?;
    Ok(window)
}

fn build_grid(tree: &mut ComponentTree, number: usize) -> Result<NodeId, TreeError> {
    let rows = tree.create_container(Panel::new(), LinearLayout::vertical());
    for row in 0..3 {
        let line = tree.create_container(Panel::new(), LinearLayout::horizontal().with_spacing(1));
        for column in 0..3 {
            let label = format!("{number}.{}", row * 3 + column + 1);
            let button = tree.create_interactable(Button::new(label.clone()).with_action(move || {
                tracing::info!(button = %label, "pressed");
            }));
            tree.add_child(line, button)?;
        }
        tree.add_child(rows, line)?;
    }
    Ok(rows)
}
