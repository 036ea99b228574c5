/// Error types shared across the application
///
/// Preview errors travel inside iced messages, so they must be `Clone`.
/// I/O errors are wrapped in `Arc` for that reason.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Failure while turning a selected file into a preview source
#[derive(Debug, Clone, Error)]
pub enum PreviewError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: Arc<std::io::Error>,
    },

    #[error("preview source is not a valid data URL")]
    Malformed,

    #[error("failed to decode data URL payload: {0}")]
    Decode(#[from] base64::DecodeError),
}

/// A page element binding could not be resolved
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    #[error("no element bound for {0}")]
    Missing(&'static str),

    #[error("element id {id:?} is bound to both {first} and {second}")]
    Duplicate {
        id: String,
        first: &'static str,
        second: &'static str,
    },
}

/// Settings could not be loaded
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings from {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings from {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid page bindings: {0}")]
    Binding(#[from] BindingError),
}

/// Top-level error returned from `main`
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("user interface failed: {0}")]
    Ui(#[from] iced::Error),
}
