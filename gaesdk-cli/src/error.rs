//! CLI error type.

use gaesdk::config::ConfigError;
use gaesdk::logging::LoggingError;
use gaesdk::manager::ManagerError;
use thiserror::Error;

/// Errors that end a CLI run with a non-zero exit code.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Manager(#[from] ManagerError),

    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Logging(#[from] LoggingError),

    #[error("cannot determine the working directory: {0}")]
    WorkingDir(#[source] std::io::Error),
}
