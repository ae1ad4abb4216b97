//! Logging and tracing initialization.
//!
//! Logs go to stderr so that CLI output on stdout stays machine-readable,
//! or to `LoggingConfig::file` when one is configured.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;

/// Initialize the tracing subscriber with the given configuration.
///
/// `RUST_LOG` takes precedence over `config.level`. Calling this more than
/// once is harmless; later calls are ignored.
pub fn init_logging(config: &LoggingConfig) {
    let log_file = config.file.as_ref().and_then(|path| {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Some(file),
            Err(e) => {
                eprintln!("playstats: cannot open log file {}: {e}", path.display());
                None
            }
        }
    });

    match log_file {
        Some(file) => install(config, Mutex::new(file)),
        None => install(config, std::io::stderr),
    }
}

fn install<W>(config: &LoggingConfig, writer: W)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let builder = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(writer);

    if config.json {
        let subscriber = builder.json().finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    } else {
        let subscriber = builder
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }
}

/// Initialize logging for a command-line tool; `verbose` forces debug level.
pub fn init_cli_logging(config: &LoggingConfig, verbose: bool) {
    if verbose {
        let config = LoggingConfig {
            level: "debug".to_string(),
            ..config.clone()
        };
        init_logging(&config);
    } else {
        init_logging(config);
    }
}
