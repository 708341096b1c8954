//! Logging utilities
//!
//! The library only talks to the `log` facade. Hosts install a backend with
//! [`init_with_filter`].

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system with a default filter.
///
/// `RUST_LOG` still takes precedence when it is set. Returns an error if a
/// logger was already installed, which hosts are free to ignore.
pub fn init_with_filter(filter: &str) -> Result<(), log::SetLoggerError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .format_timestamp_millis()
        .try_init()
}
