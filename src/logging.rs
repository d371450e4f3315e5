//! Tracing subscriber setup for binaries
//!
//! The library only emits `tracing` events; installing a subscriber is the
//! host's decision.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Map a CLI level name to a tracing level, defaulting to INFO
pub fn parse_level(name: &str) -> Level {
    match name.to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Filter directive used when `RUST_LOG` is not set
pub fn default_directive(level: Level) -> String {
    format!(
        "triage={level},triage_core={level}",
        level = level.as_str().to_lowercase()
    )
}

/// Install a stderr fmt subscriber; `RUST_LOG` overrides `level`
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(parse_level(level))));

    // Ignore the error when a subscriber is already installed (tests, embedding hosts)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("DEBUG"), Level::DEBUG);
        assert_eq!(parse_level("warn"), Level::WARN);
        assert_eq!(parse_level("chatty"), Level::INFO);
    }

    #[test]
    fn test_default_directive() {
        assert_eq!(
            default_directive(Level::DEBUG),
            "triage=debug,triage_core=debug"
        );
    }
}
