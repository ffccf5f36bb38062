use std::env::var;
use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive, e.g. `debug` or
/// `whitelist_merge=trace`.
pub const LOG_LEVEL_ENV: &str = "WHITELIST_MERGE_LOG_LEVEL";

const DEFAULT_LOG_SPEC: &str = "warn";

/// Log specification for the given `-v` count. Without `-v` the environment
/// decides, then the default.
pub fn log_spec(verbosity: u8) -> String {
    match verbosity {
        0 => var(LOG_LEVEL_ENV).unwrap_or_else(|_| DEFAULT_LOG_SPEC.to_string()),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Installs the global stderr subscriber. Returns false if one was already set.
pub fn init_logger(verbosity: u8) -> bool {
    let spec = log_spec(verbosity);
    let filter = match EnvFilter::try_new(&spec) {
        Ok(filter) => filter,
        Err(e) => {
            // Use eprint as the subscriber is not up yet
            eprintln!(
                "Invalid log specification '{}' ({}), falling back to '{}'",
                spec, e, DEFAULT_LOG_SPEC
            );
            EnvFilter::new(DEFAULT_LOG_SPEC)
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env::{remove_var, set_var};

    #[test]
    #[serial]
    fn test_default_spec() {
        remove_var(LOG_LEVEL_ENV);
        assert_eq!(log_spec(0), "warn");
    }

    #[test]
    #[serial]
    fn test_env_spec() {
        set_var(LOG_LEVEL_ENV, "whitelist_merge=trace");
        assert_eq!(log_spec(0), "whitelist_merge=trace");
        remove_var(LOG_LEVEL_ENV);
    }

    #[test]
    #[serial]
    fn test_verbosity_overrides_env() {
        set_var(LOG_LEVEL_ENV, "error");
        assert_eq!(log_spec(1), "info");
        assert_eq!(log_spec(2), "debug");
        assert_eq!(log_spec(3), "trace");
        assert_eq!(log_spec(7), "trace");
        remove_var(LOG_LEVEL_ENV);
    }

    #[test]
    #[serial]
    fn test_logger_initialization_is_idempotent() {
        remove_var(LOG_LEVEL_ENV);
        // Another test may have installed it first
        let _ = init_logger(1);
        assert!(!init_logger(1));
    }
}
