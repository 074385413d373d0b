// tests/logging_levels.rs

use pipedag::cli::LogLevel;
use pipedag::logging::resolve_level;

#[test]
fn test_log_level_resolution() {
    assert_eq!(resolve_level(Some(LogLevel::Debug), Some("error")), tracing::Level::DEBUG);
    assert_eq!(resolve_level(None, Some(" Warning ")), tracing::Level::WARN);
    assert_eq!(resolve_level(None, Some("bogus")), tracing::Level::INFO);
    assert_eq!(resolve_level(None, None), tracing::Level::INFO);
}
