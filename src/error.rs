//! Error types for signature compositing and letter generation

use thiserror::Error;

/// Result type alias for crate operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while editing a signature or requesting a letter
#[derive(Error, Debug)]
pub enum Error {
    /// Imported file is not an SVG document
    #[error("Unsupported signature format: {0}")]
    UnsupportedFormat(String),

    /// Stored signature could not be parsed
    #[error("Malformed signature document: {0}")]
    MalformedCarrier(String),

    /// Authoring surface dimensions are unusable
    #[error("Invalid drawing surface: {0}")]
    InvalidSurface(String),

    /// Form input rejected before any request was made
    #[error("Validation failed: {0}")]
    ValidationError(String),

    /// Transport-level failure talking to the letter server
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Letter server answered with an error or an unexpected payload
    #[error("Server error: {0}")]
    ServerError(String),

    /// A letter generation is already in flight
    #[error("A letter is already being generated")]
    Busy,

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// The single line shown to the user when an operation fails.
    pub fn user_message(&self) -> String {
        match self {
            Error::NetworkError(_) | Error::ServerError(_) => {
                format!("Не удалось скачать PDF: {}", self)
            }
            Error::UnsupportedFormat(_) => "Пожалуйста, загрузите файл в формате SVG.".to_string(),
            Error::Busy => "Письмо уже генерируется, подождите.".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(feature = "client")]
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            Error::ServerError(format!("Server responded with status {}", status.as_u16()))
        } else {
            Error::NetworkError(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_failures_get_download_prefix() {
        let e = Error::ServerError("Invalid server response".into());
        assert_eq!(
            e.user_message(),
            "Не удалось скачать PDF: Server error: Invalid server response"
        );
    }

    #[test]
    fn unsupported_format_asks_for_svg() {
        let e = Error::UnsupportedFormat("image/png".into());
        assert!(e.user_message().contains("SVG"));
    }
}
