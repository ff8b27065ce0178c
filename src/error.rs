//! Error types for wifiqr operations

use thiserror::Error;

/// Result type alias using wifiqr's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for wifiqr operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (config file, themes file, log setup)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required WiFi credential is absent
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// Logo or other user-supplied asset could not be used
    #[error("Asset error: {0}")]
    Asset(String),

    /// QR code encoding failed
    #[error("Failed to encode QR code: {0}")]
    QrEncode(String),

    /// QR code decoding failed
    #[error("Failed to decode QR code: {0}")]
    QrDecode(String),

    /// No QR code found in image
    #[error("No QR code found in image")]
    NoQrCodeFound,

    /// PDF assembly error
    #[error("PDF error: {0}")]
    Pdf(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Other(format!("JSON error: {}", e))
    }
}
