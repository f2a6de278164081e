mod input;
mod render;
mod runtime;
mod ui;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use parrot_core::config::CoreConfig;
use parrot_core::tracing_setup::init_tracing;
use parrot_core::CoreRuntime;

use crate::runtime::run_app;
use crate::ui::App;

#[derive(Debug, Parser)]
#[command(name = "parrot-tui", about = "Echo-chat TUI with nested conversations, notes and overlays")]
struct Args {
    /// Simulated reply latency in milliseconds
    #[arg(long)]
    reply_delay_ms: Option<u64>,

    /// Append logs to this file (same effect as PARROT_LOG_FILE)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Disable sound effects
    #[arg(long)]
    no_sound: bool,

    /// Notes snapshot file, loaded at startup and written by the export key
    #[arg(long, default_value = "parrot-notes.json")]
    export_file: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_file.as_deref());

    // Restore the terminal before the panic message hits stderr
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::event::DisableMouseCapture
        );
        eprintln!("\n\n=== PANIC ===");
        eprintln!("{}", panic_info);
        eprintln!("=============\n");
        original_hook(panic_info);
    }));

    let mut config = CoreConfig::default();
    if let Some(ms) = args.reply_delay_ms {
        config.reply_delay = Duration::from_millis(ms);
    }

    let mut core_runtime = CoreRuntime::new(config.clone())?;
    let mut app = App::new(config, !args.no_sound, args.export_file.clone());
    if args.export_file.exists() {
        match parrot_core::export::import_notes(&args.export_file) {
            Ok(notes) => {
                let mut store = app.notes.borrow_mut();
                for note in notes {
                    store.add(note);
                }
            }
            Err(e) => tracing::warn!("could not load notes snapshot: {}", e),
        }
    }
    let data_rx = core_runtime
        .take_data_rx()
        .ok_or_else(|| anyhow::anyhow!("Core runtime already has active data receiver"))?;
    app.set_core_handle(core_runtime.handle());

    let mut terminal = ui::init_terminal()?;
    let result = run_app(&mut terminal, &mut app, data_rx).await;

    core_runtime.shutdown();
    ui::restore_terminal()?;

    if let Err(err) = result {
        eprintln!("Error: {err}");
    }

    Ok(())
}
