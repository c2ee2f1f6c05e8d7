//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system
///
/// `RUST_LOG` takes precedence; `default_level` is used when it is unset.
/// Returns an error if a logger was already installed.
pub fn init(default_level: &str) -> Result<(), log::SetLoggerError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .try_init()
}
