//! Build a terminal interface from a JSON layout document.
//!
//! Run with the path to a layout file; Tab cycles focus, Enter
//! activates, Esc closes the window.

use std::io::{self, stderr};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use simui::element::json;
use simui::factory::{ActionTable, GuiFactory};
use simui::term::{
    event::{spawn_event_reader, AppEvent},
    TermToolkit,
};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(
    name = env!("CARGO_PKG_NAME"),
    about = "Materialize a JSON layout document into a terminal interface"
)]
struct Cli {
    /// Layout document (JSON object with a `configuration_data` array).
    layout: PathBuf,

    /// Print all parameter values as JSON on exit.
    #[arg(long = "dump-values")]
    dump_values: bool,
}

// ───────────────────────────────────────── main ──────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing (only when RUST_LOG is set).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr) // never pollute stdout
        .init();

    let cli = Cli::parse();

    // ── build the interface ───────────────────────────────────
    let roots = json::load_layout(&cli.layout)?;

    let mut actions = ActionTable::new();
    actions.register(
        "run",
        std::rc::Rc::new(|| tracing::info!("run action invoked")),
    );

    let mut toolkit = TermToolkit::new();
    let interface = GuiFactory::new().build_interface(&mut toolkit, &roots, &actions)?;

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    // ── event loop ────────────────────────────────────────────
    let mut events = spawn_event_reader(Duration::from_millis(100));

    loop {
        // Draw first so the interface is visible before the first key.
        terminal.draw(|frame| toolkit.render(frame))?;

        if let Some(event) = events.recv().await {
            match event {
                AppEvent::Key(key) => toolkit.handle_key(key),
                AppEvent::Resize(_, _) => {}
                AppEvent::Tick => {}
            }
        } else {
            break; // event reader ended
        }

        if toolkit.close_requested() {
            break;
        }
    }

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if cli.dump_values {
        let values = interface.values(&toolkit);
        println!("{}", serde_json::to_string_pretty(&values)?);
    }

    Ok(())
}
