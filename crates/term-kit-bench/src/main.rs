use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::event::KeyCode;
use ratatui::layout::{Offset, Size};

use term_kit::component::NodeId;
use term_kit::error::{GuiError, TreeError};
use term_kit::event::InputEvent;
use term_kit::gui::MultiWindowGui;
use term_kit::layout::LinearLayout;
use term_kit::screen::VirtualScreen;
use term_kit::widgets::{Button, Panel};
use term_kit::window::{Hints, Window, WindowId};

#[derive(Parser, Debug)]
#[command(
    name = "term-kit-bench",
    version = env!("CARGO_PKG_VERSION"),
    about = "Headless benchmark for focus lookup rebuilds and directional navigation"
)]
struct BenchCli {
    /// Buttons per row.
    #[arg(short = 'c', long = "columns", default_value_t = 12)]
    columns: u16,

    /// Rows of buttons.
    #[arg(short = 'r', long = "rows", default_value_t = 20)]
    rows: u16,

    /// Full redraws (layout, render and lookup rebuild) to time.
    #[arg(short = 'i', long = "iterations", default_value_t = 200)]
    iterations: usize,
}

struct BenchConfig {
    columns: u16,
    rows: u16,
    iterations: usize,
}

impl TryFrom<&BenchCli> for BenchConfig {
    type Error = String;

    fn try_from(cli: &BenchCli) -> Result<Self, Self::Error> {
        if !(1..=200).contains(&cli.columns) {
            return Err("columns must be between 1 and 200".to_string());
        }
        if !(1..=500).contains(&cli.rows) {
            return Err("rows must be between 1 and 500".to_string());
        }
        if cli.iterations == 0 {
            return Err("iterations must be at least 1".to_string());
        }
        Ok(Self {
            columns: cli.columns,
            rows: cli.rows,
            iterations: cli.iterations,
        })
    }
}

/// Each button is `< nnnn >`, one column apart.
const CELL_WIDTH: u16 = 9;

fn main() -> Result<(), GuiError> {
    let args = BenchCli::parse();
    let config = match BenchConfig::try_from(&args) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("term-kit-bench: {message}");
            std::process::exit(2);
        }
    };

    let (mut gui, window) = build_gui(&config)?;
    gui.update_screen()?;

    let mut rebuilds = Timings::default();
    for _ in 0..config.iterations {
        if let Some(window) = gui.window_mut(window) {
            window.invalidate();
        }
        let started = Instant::now();
        gui.update_screen()?;
        rebuilds.record(started.elapsed());
    }

    let mut moves = Timings::default();
    let mut missed = 0usize;
    for (code, expect_move) in snake_path(&config) {
        let before = focused(&gui, window);
        let started = Instant::now();
        gui.handle_input(&InputEvent::key(code))?;
        moves.record(started.elapsed());
        if expect_move && focused(&gui, window) == before {
            missed += 1;
        }
    }

    println!("{}", report(&config, &rebuilds, &moves, missed));
    Ok(())
}

fn build_gui(config: &BenchConfig) -> Result<(MultiWindowGui, WindowId), GuiError> {
    let size = Size::new(
        config.columns * CELL_WIDTH + 2,
        config.rows.saturating_add(2),
    );
    let mut gui = MultiWindowGui::new(VirtualScreen::new(size));
    let mut window = Window::new("bench").with_hints(Hints::FIXED_POSITION | Hints::NO_POST_RENDERING);
    window.set_position(Offset { x: 0, y: 0 });
    let grid = build_grid(window.pane_mut().tree_mut(), config)?;
    window.pane_mut().set_content(grid)?;
    let id = gui.add_window(window);
    Ok((gui, id))
}

fn build_grid(
    tree: &mut term_kit::component::ComponentTree,
    config: &BenchConfig,
) -> Result<NodeId, TreeError> {
    let rows = tree.create_container(Panel::new(), LinearLayout::vertical());
    for row in 0..config.rows {
        let line = tree.create_container(Panel::new(), LinearLayout::horizontal().with_spacing(1));
        for column in 0..config.columns {
            let index = u32::from(row) * u32::from(config.columns) + u32::from(column);
            let button = tree.create_interactable(Button::new(format!("{index:04}")));
            tree.add_child(line, button)?;
        }
        tree.add_child(rows, line)?;
    }
    Ok(rows)
}

/// Tab into the grid, then sweep it boustrophedon with arrow keys.
fn snake_path(config: &BenchConfig) -> Vec<(KeyCode, bool)> {
    let mut path = vec![(KeyCode::Tab, true)];
    for row in 0..config.rows {
        let across = if row % 2 == 0 { KeyCode::Right } else { KeyCode::Left };
        path.extend((1..config.columns).map(|_| (across, true)));
        if row + 1 < config.rows {
            path.push((KeyCode::Down, true));
        }
    }
    path
}

fn focused(gui: &MultiWindowGui, window: WindowId) -> Option<NodeId> {
    gui.window(window).and_then(|window| window.pane().focused())
}

#[derive(Default)]
struct Timings {
    count: usize,
    total: Duration,
    fastest: Option<Duration>,
    slowest: Duration,
}

impl Timings {
    fn record(&mut self, elapsed: Duration) {
        self.count += 1;
        self.total += elapsed;
        self.fastest = Some(self.fastest.map_or(elapsed, |fastest| fastest.min(elapsed)));
        self.slowest = self.slowest.max(elapsed);
    }

    fn average_us(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.total.as_secs_f64() * 1_000_000.0 / self.count as f64
    }

    fn fastest_us(&self) -> f64 {
        self.fastest.unwrap_or_default().as_secs_f64() * 1_000_000.0
    }

    fn slowest_us(&self) -> f64 {
        self.slowest.as_secs_f64() * 1_000_000.0
    }

    fn per_second(&self) -> f64 {
        let secs = self.total.as_secs_f64();
        if secs > 0.0 {
            self.count as f64 / secs
        } else {
            0.0
        }
    }
}

fn report(config: &BenchConfig, rebuilds: &Timings, moves: &Timings, missed: usize) -> String {
    indoc::formatdoc!(
        r#"
        Focus bench: {columns}x{rows} grid ({buttons} buttons)
        Redraw + lookup rebuild: {redraws} runs | Avg: {r_avg:.1} us | Best: {r_best:.1} us | Worst: {r_worst:.1} us
        Navigation: {nav} moves (~{nav_rate:.0}/s) | Avg: {m_avg:.2} us | Worst: {m_worst:.2} us
        Moves that did not change focus: {missed}
        "#,
        columns = config.columns,
        rows = config.rows,
        buttons = u32::from(config.columns) * u32::from(config.rows),
        redraws = rebuilds.count,
        r_avg = rebuilds.average_us(),
        r_best = rebuilds.fastest_us(),
        r_worst = rebuilds.slowest_us(),
        nav = moves.count,
        nav_rate = moves.per_second(),
        m_avg = moves.average_us(),
        m_worst = moves.slowest_us(),
        missed = missed,
    )
}
