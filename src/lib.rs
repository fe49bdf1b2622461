pub mod changes;
pub mod commands;
pub mod config;
pub mod excel;
pub mod server;

pub use commands::{get_changed_rows, process_file, run_detection, ChangeOutcome, ChangedRow, ChangedRows};
pub use config::Config;

/// Install the global tracing subscriber. `RUST_LOG` overrides the default `info` level.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();
}
