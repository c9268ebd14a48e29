use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DrboError {
    #[error("failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("no element matches selector `{selector}`")]
    MissingField { selector: String },

    #[error("invalid selector `{selector}`: {message}")]
    InvalidSelector { selector: String, message: String },

    #[error("template not found: {name}")]
    MissingTemplate { name: String },

    #[error("filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DrboError {
    pub fn fetch(url: &str, message: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.to_string(),
            message: message.into(),
        }
    }

    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Name of the pipeline stage the error came from, for user-facing messages.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Fetch { .. } => "fetch",
            Self::MissingField { .. } | Self::InvalidSelector { .. } => "extract",
            Self::MissingTemplate { .. } => "render",
            Self::Filesystem { .. } => "filesystem",
        }
    }
}

pub type Result<T> = std::result::Result<T, DrboError>;
