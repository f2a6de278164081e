use std::fs::OpenOptions;
use std::path::Path;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialize tracing for the TUI binary.
///
/// A raw-mode terminal owns stdout, so there is no console layer: logs go to
/// the file named by `PARROT_LOG_FILE` (or the explicit `log_file` override)
/// when set, and are otherwise discarded. `RUST_LOG` controls the filter.
pub fn init_tracing(log_file: Option<&Path>) {
    let env_path = std::env::var("PARROT_LOG_FILE").ok();
    let path = log_file
        .map(|p| p.to_path_buf())
        .or_else(|| env_path.map(Into::into));

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if let Some(path) = path {
        match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => {
                let file_layer = fmt::layer()
                    .with_writer(file)
                    .with_ansi(false)
                    .with_target(true)
                    .with_filter(tracing_subscriber::filter::LevelFilter::DEBUG);
                registry.with(file_layer).init();
            }
            Err(e) => {
                // Can't log this anywhere useful yet
                eprintln!("Failed to open log file {}: {}", path.display(), e);
                registry.init();
            }
        }
    } else {
        registry.init();
    }
}
