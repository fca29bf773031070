//! Error taxonomy for QR generation.

use std::path::PathBuf;

use image_engine::EngineError;
use mailto_link::MailtoError;

/// Failure category, mapped to the CLI exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    EncodingFailure,
    IoFailure,
}

impl ErrorKind {
    pub fn exit_code(self) -> u8 {
        match self {
            Self::InvalidInput => 2,
            Self::EncodingFailure => 3,
            Self::IoFailure => 4,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ComposerError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid email: {0}")]
    Email(#[from] MailtoError),

    #[error("QR encoding failed: {0}")]
    Encoding(#[from] EngineError),

    #[error("Failed to read logo {path}: {source}")]
    LogoRead {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to encode image for {path}: {source}")]
    ImageEncode {
        path: PathBuf,
        source: image::ImageError,
    },
}

impl ComposerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) | Self::Email(_) => ErrorKind::InvalidInput,
            Self::Encoding(EngineError::InvalidVersion(_) | EngineError::ImageTooLarge { .. }) => {
                ErrorKind::InvalidInput
            }
            Self::Encoding(_) => ErrorKind::EncodingFailure,
            Self::LogoRead { .. } | Self::Write { .. } | Self::ImageEncode { .. } => {
                ErrorKind::IoFailure
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ComposerError>;
