//! Error types for the poster pipeline.

use thiserror::Error;

/// Result type alias using PosterError.
pub type PosterResult<T> = Result<T, PosterError>;

/// Primary error type for poster generation.
#[derive(Debug, Error)]
pub enum PosterError {
    // === User Input Errors ===
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("Theme '{0}' not found")]
    ThemeNotFound(String),

    #[error("Invalid theme name: {0:?}")]
    InvalidThemeName(String),

    #[error("Theme '{0}' already exists")]
    ThemeExists(String),

    // === Recoverable Data Errors ===
    #[error("Cache entry unreadable: {0}")]
    CacheCorrupt(String),

    #[error("Font unavailable: {0}")]
    Font(String),

    // === Fetch Errors ===
    #[error("Could not find coordinates for {city}, {country}")]
    CoordinatesNotFound { city: String, country: String },

    #[error("Failed to fetch {layer}: {message}")]
    Fetch { layer: String, message: String },

    // === Persistence Errors ===
    #[error("Could not save {what}: {message}")]
    Persistence { what: String, message: String },

    // === Rendering Errors ===
    #[error("Rendering failed: {0}")]
    Render(String),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification used by entry points to decide how to report an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad city, country, theme, or distance supplied by the user.
    UserInput,
    /// Logged and replaced by a fallback; the pipeline keeps going.
    RecoverableData,
    /// Coordinates or street network unavailable; aborts the current run only.
    FatalFetch,
    /// Cache or theme write failed.
    Persistence,
    /// Rendering, export or unexpected internal failure.
    Internal,
}

impl PosterError {
    pub fn fetch(layer: impl Into<String>, message: impl ToString) -> Self {
        PosterError::Fetch {
            layer: layer.into(),
            message: message.to_string(),
        }
    }

    pub fn persistence(what: impl Into<String>, message: impl ToString) -> Self {
        PosterError::Persistence {
            what: what.into(),
            message: message.to_string(),
        }
    }

    pub fn invalid_parameter(param: impl Into<String>, message: impl Into<String>) -> Self {
        PosterError::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Get the error kind for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PosterError::MissingParameter(_)
            | PosterError::InvalidParameter { .. }
            | PosterError::ThemeNotFound(_)
            | PosterError::InvalidThemeName(_)
            | PosterError::ThemeExists(_) => ErrorKind::UserInput,

            PosterError::CacheCorrupt(_) | PosterError::Font(_) => ErrorKind::RecoverableData,

            PosterError::CoordinatesNotFound { .. } | PosterError::Fetch { .. } => {
                ErrorKind::FatalFetch
            }

            PosterError::Persistence { .. } => ErrorKind::Persistence,

            PosterError::Render(_) | PosterError::Export(_) | PosterError::Internal(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// Process exit status for the command-line driver.
    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            ErrorKind::UserInput => 2,
            _ => 1,
        }
    }
}

// Conversion from common error types
impl From<std::io::Error> for PosterError {
    fn from(err: std::io::Error) -> Self {
        PosterError::Internal(format!("I/O error: {}", err))
    }
}

impl From<serde_json::Error> for PosterError {
    fn from(err: serde_json::Error) -> Self {
        PosterError::Internal(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            PosterError::MissingParameter("city".into()).kind(),
            ErrorKind::UserInput
        );
        assert_eq!(
            PosterError::fetch("street network", "timeout").kind(),
            ErrorKind::FatalFetch
        );
        assert_eq!(
            PosterError::persistence("cache", "disk full").kind(),
            ErrorKind::Persistence
        );
        assert_eq!(
            PosterError::CacheCorrupt("bad gzip header".into()).kind(),
            ErrorKind::RecoverableData
        );
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(PosterError::ThemeNotFound("neon".into()).exit_code(), 2);
        assert_eq!(
            PosterError::CoordinatesNotFound {
                city: "Atlantis".into(),
                country: "Ocean".into()
            }
            .exit_code(),
            1
        );
    }

    #[test]
    fn test_messages_name_the_input() {
        let err = PosterError::CoordinatesNotFound {
            city: "Atlantis".into(),
            country: "Ocean".into(),
        };
        assert_eq!(err.to_string(), "Could not find coordinates for Atlantis, Ocean");
    }
}
