//! User interface module - status lines printed while syncing.

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_error, display_failure, display_partial, display_start, display_status,
    display_success, display_summary, display_warning,
};

/// Map `-v` occurrences to a default log filter for `env_logger`.
pub fn log_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Initialise logging. `RUST_LOG` wins over `-v`.
pub fn init_logging(verbosity: u8) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_filter(verbosity)))
        .format_timestamp(None)
        .init();
}
