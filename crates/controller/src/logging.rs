//! Tracing subscriber setup

use tracing_subscriber::FmtSubscriber;

use crate::config::LoggingConfig;
use crate::ControllerError;

/// Install the global tracing subscriber.
///
/// Logs go to stderr; stdout is left to the JSON lines render feed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), ControllerError> {
    let level = config.max_level()?;
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_ansi(!config.json);

    let installed = if config.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };

    installed.map_err(|e| ControllerError::Logging(e.to_string()))
}
