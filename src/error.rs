use thiserror::Error;

/// Error type for every fallible operation in the crate
#[derive(Error, Debug)]
pub enum Error {
    /// Input rejected before rendering starts (empty series list, empty series,
    /// duplicate names or ids, non-finite scores)
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Fewer glyphs were paired with observations than observations exist
    #[error("Point matching failed: matched {matched} points but expected {expected}")]
    ReconciliationMismatch { matched: usize, expected: usize },

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// The rendered vector document could not be parsed
    #[error("Document error: {0}")]
    Document(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error")]
    Io(#[source] std::io::Error),

    #[error("JSON error")]
    Json(#[source] serde_json::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl From<roxmltree::Error> for Error {
    fn from(err: roxmltree::Error) -> Self {
        Error::Document(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(format!("invalid TOML: {}", err))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Config(format!("invalid YAML: {}", err))
    }
}
