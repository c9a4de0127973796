//! Logging setup

use tracing_subscriber::EnvFilter;

/// Install the global subscriber, writing to stderr so stdout carries only
/// the REPL conversation. An unparsable filter falls back to `info`.
///
/// Returns false when a subscriber was already installed.
pub fn init(filter: &str) -> bool {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_refused() {
        init("not a [valid filter");
        assert!(!init("debug"));
    }
}
