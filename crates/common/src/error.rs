//! Error types shared across VidPrompt Studio crates.

use std::path::PathBuf;

/// Top-level error type for VidPrompt Studio operations.
#[derive(Debug, thiserror::Error)]
pub enum VidpromptError {
    #[error("Media error: {message}")]
    Media { message: String },

    #[error("Capture error: {message}")]
    Capture { message: String },

    #[error("Export error: {message}")]
    Export { message: String },

    #[error("An export is already in progress")]
    ExportBusy,

    #[error("Generation error: {message}")]
    Generation { message: String },

    #[error("Sink error: {message}")]
    Sink { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Unsupported operation: {message}")]
    Unsupported { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using VidpromptError.
pub type VidpromptResult<T> = Result<T, VidpromptError>;

impl VidpromptError {
    pub fn media(msg: impl Into<String>) -> Self {
        Self::Media {
            message: msg.into(),
        }
    }

    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture {
            message: msg.into(),
        }
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export {
            message: msg.into(),
        }
    }

    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation {
            message: msg.into(),
        }
    }

    pub fn sink(msg: impl Into<String>) -> Self {
        Self::Sink {
            message: msg.into(),
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported {
            message: msg.into(),
        }
    }
}
