//! # Weave Log
//!
//! One-call `tracing` setup for Weave binaries.
//!
//! ```ignore
//! let _guard = weave_log::auto_init()?;
//! tracing::info!(items = 3, "graph loaded");
//! ```

mod builder;
mod config;
mod error;

pub use builder::{LoggerBuilder, LoggerGuard};
pub use config::{Config, DisplayConfig, Format};
pub use error::{LogError, LogResult};

/// Pick a configuration from the environment and build type, then install it.
///
/// Returns a no-op guard when a subscriber is already installed, so it is
/// safe to call more than once.
pub fn auto_init() -> LogResult<LoggerGuard> {
    if tracing::dispatcher::has_been_set() {
        return Ok(LoggerGuard::noop());
    }

    let config = if std::env::var("WEAVE_LOG").is_ok() || std::env::var("RUST_LOG").is_ok() {
        Config::from_env()
    } else if cfg!(debug_assertions) {
        Config::development()
    } else {
        Config::production()
    };
    init_with(config)
}

/// Initialize with default configuration
pub fn init() -> LogResult<LoggerGuard> {
    init_with(Config::default())
}

/// Initialize with custom configuration
pub fn init_with(config: Config) -> LogResult<LoggerGuard> {
    LoggerBuilder::from_config(config).build()
}
