use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("color must start with '#'")]
    MissingHash,
    #[error("color must have 6 hex digits, got {0}")]
    InvalidLength(usize),
    #[error("invalid hex digits in color: {0}")]
    InvalidDigit(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("parameters file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parameters parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
