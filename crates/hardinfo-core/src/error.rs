//! Error types for HardInfo

use std::path::PathBuf;

/// Result type alias using [`Error`]
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Main error type for HardInfo
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Runtime data could not be located
    #[error("Runtime data not found (looked for {marker} under {searched:?})")]
    RuntimeDataNotFound {
        /// Marker file that identifies the data directory
        marker: String,
        /// Directories that were searched
        searched: Vec<PathBuf>,
    },

    /// Home directory could not be determined
    #[error("Unable to determine the home directory")]
    NoHomeDirectory,

    /// No program could open the URL
    #[error("Couldn't find a Web browser to open URL {0}")]
    NoBrowser(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_data_error_display() {
        let err = Error::RuntimeDataNotFound {
            marker: "benchmark.data".to_string(),
            searched: vec![PathBuf::from("/usr/share/hardinfo")],
        };
        let message = err.to_string();
        assert!(message.contains("benchmark.data"));
        assert!(message.contains("/usr/share/hardinfo"));
    }

    #[test]
    fn test_config_error() {
        let err = Error::config("bad value");
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(err.to_string(), "Configuration error: bad value");
    }
}
