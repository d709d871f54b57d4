//! Test harness helpers.

use std::io::Write;

use tempfile::NamedTempFile;
use tracing_subscriber::EnvFilter;

/// Create a temporary file with the given content.
///
/// Returns the `NamedTempFile` which will be cleaned up when dropped.
///
/// # Panics
///
/// Panics if the file cannot be created or written.
#[must_use]
pub fn test_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file.flush().expect("Failed to flush temp file");
    file
}

/// Create a temporary `.toml` file with the given content.
///
/// # Panics
///
/// Panics if the file cannot be created or written.
#[must_use]
pub fn test_config_file(content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file.flush().expect("Failed to flush temp file");
    file
}

/// Set up test logging with the given filter.
///
/// Safe to call from many tests; only the first call installs a subscriber.
pub fn setup_test_logging(filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_file() {
        let file = test_file("hello world");
        let content = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(content, "hello world");
    }

    #[test]
    fn test_config_file_extension() {
        let file = test_config_file("[registry]\n");
        assert!(file.path().to_string_lossy().ends_with(".toml"));
    }

    #[test]
    fn test_logging_twice_is_harmless() {
        setup_test_logging("debug");
        setup_test_logging("warn");
    }
}
