use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Maps a `--log-level` value to a filter. Unknown values fall back to `info`.
fn level_filter(level: &str) -> LevelFilter {
    match level.to_ascii_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        "off" => LevelFilter::OFF,
        _ => LevelFilter::INFO,
    }
}

/// Installs the global subscriber. `RUST_LOG` takes precedence over `level`.
///
/// Logs go to stderr; stdout belongs to the board.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::builder()
        .with_default_directive(level_filter(level).into())
        .from_env_lossy();

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    if installed.is_err() {
        tracing::warn!("logging was already initialised");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_levels() {
        assert_eq!(level_filter("debug"), LevelFilter::DEBUG);
        assert_eq!(level_filter("WARN"), LevelFilter::WARN);
        assert_eq!(level_filter("off"), LevelFilter::OFF);
    }

    #[test]
    fn unknown_level_defaults_to_info() {
        assert_eq!(level_filter("verbose"), LevelFilter::INFO);
        assert_eq!(level_filter(""), LevelFilter::INFO);
    }
}
