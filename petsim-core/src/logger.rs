//! Tracing initialization: console output via the fmt layer, with an optional
//! tee to a log file.

use std::fs::OpenOptions;
use std::io;
use std::sync::Arc;

use tracing_subscriber::{
    layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

/// Initializes the global tracing subscriber.
///
/// Reads the log level from `RUST_LOG` (defaults to `info`). When
/// `log_file_path` is given, every line is written to both stdout and the
/// file. Load `.env` (e.g. `dotenvy::dotenv()`) before calling this or
/// `RUST_LOG` from the file will not take effect.
pub fn init_tracing(log_file_path: Option<&str>) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = match log_file_path {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let file = Arc::new(file);
            use tracing_subscriber::fmt::writer::MakeWriterExt;
            tracing_subscriber::fmt::layer()
                .with_writer(io::stdout.and(file))
                .with_target(true)
                .with_level(true)
                .boxed()
        }
        None => tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_level(true)
            .boxed(),
    };

    Registry::default()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to set global subscriber: {}", e))?;

    Ok(())
}
