//! Error types

use std::path::{Path, PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A line does not have the expected columns or types
    #[error("{}:{line}: {message}", display_origin(.origin))]
    Format {
        origin: Option<PathBuf>,
        line: usize,
        message: String,
    },

    /// An option has an invalid value
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// The structure of a tagged file is broken
    #[error("{}:{line}: malformed input: {message}", display_origin(.origin))]
    MalformedInput {
        origin: Option<PathBuf>,
        line: usize,
        message: String,
    },

    /// A line is not valid UTF-8
    #[error("{}:{line}: invalid UTF-8", display_origin(.origin))]
    Decode { origin: Option<PathBuf>, line: usize },

    #[error("I/O error on {}: {source}", display_origin(.path))]
    Io {
        path: Option<PathBuf>,
        #[source]
        source: std::io::Error,
    },
}

fn display_origin(origin: &Option<PathBuf>) -> String {
    match origin {
        Some(path) => path.display().to_string(),
        None => "<reader>".to_string(),
    }
}

impl Error {
    pub(crate) fn format(line: usize, message: impl Into<String>) -> Self {
        Error::Format {
            origin: None,
            line,
            message: message.into(),
        }
    }

    pub(crate) fn malformed(line: usize, message: impl Into<String>) -> Self {
        Error::MalformedInput {
            origin: None,
            line,
            message: message.into(),
        }
    }

    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Error::Io {
            path: Some(path.to_path_buf()),
            source,
        }
    }

    /// Error raised while reading line `line` of a stream
    pub(crate) fn read(line: usize, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::InvalidData {
            Error::Decode { origin: None, line }
        } else {
            Error::Io { path: None, source }
        }
    }

    /// Attach the file path to errors raised while reading a stream
    pub fn with_origin(self, path: &Path) -> Self {
        match self {
            Error::Format { line, message, .. } => Error::Format {
                origin: Some(path.to_path_buf()),
                line,
                message,
            },
            Error::MalformedInput { line, message, .. } => Error::MalformedInput {
                origin: Some(path.to_path_buf()),
                line,
                message,
            },
            Error::Decode { line, .. } => Error::Decode {
                origin: Some(path.to_path_buf()),
                line,
            },
            Error::Io { path: None, source } => Error::Io {
                path: Some(path.to_path_buf()),
                source,
            },
            e => e,
        }
    }
}
