//! Worker configuration from the environment.

use std::env;

/// Settings the worker reads at startup.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Queue or topic the worker consumes.
    pub queue_name: String,
    /// Topic subscription, when the transport distinguishes one.
    pub subscription: Option<String>,
    /// Optional log file the console output is teed into.
    pub log_file: Option<String>,
}

impl WorkerConfig {
    pub fn from_env() -> Self {
        Self {
            queue_name: env::var("QUEUE_NAME").unwrap_or_else(|_| "pets".to_string()),
            subscription: env::var("SUBSCRIPTION").ok(),
            log_file: env::var("LOG_FILE").ok(),
        }
    }
}
