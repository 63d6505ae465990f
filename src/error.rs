//! Structured error types for configuration and resolution.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Not found errors
    PathNotFound,
    LayoutNotFound,

    // Validation errors
    InvalidClassName,
    InvalidManifest,

    // Runtime errors
    LoadFailure,
    IoError,
}

/// Errors raised by the configuration layer.
///
/// None of these are recovered from internally. The only fallbacks in the
/// crate are for absent values (an unregistered namespace, an unset layout
/// name), never for failures.
#[derive(Debug, Error)]
pub enum ViewError {
    /// A root directory that does not exist on disk.
    #[error("Path not found: {}", .path.display())]
    PathNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An explicitly named layout that matched no defined layout class.
    #[error("Layout not found: {name} (tried {})", .candidates.join(", "))]
    LayoutNotFound {
        name: String,
        namespace: String,
        candidates: Vec<String>,
    },

    /// A view or layout failed while loading.
    #[error("Failed to load {class}: {source}")]
    LoadFailure {
        class: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("Invalid class name '{name}': {reason}")]
    InvalidClassName { name: String, reason: String },

    #[error("Invalid manifest {}: {reason}", .path.display())]
    Manifest { path: PathBuf, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ViewError {
    /// Stable code for this error kind.
    pub fn code(&self) -> ErrorCode {
        match self {
            ViewError::PathNotFound { .. } => ErrorCode::PathNotFound,
            ViewError::LayoutNotFound { .. } => ErrorCode::LayoutNotFound,
            ViewError::LoadFailure { .. } => ErrorCode::LoadFailure,
            ViewError::InvalidClassName { .. } => ErrorCode::InvalidClassName,
            ViewError::Manifest { .. } => ErrorCode::InvalidManifest,
            ViewError::Io(_) => ErrorCode::IoError,
        }
    }

    // Convenience constructors

    pub fn path_not_found(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ViewError::PathNotFound {
            path: path.into(),
            source,
        }
    }

    pub fn layout_not_found(name: &str, namespace: &str, candidates: Vec<String>) -> Self {
        ViewError::LayoutNotFound {
            name: name.to_string(),
            namespace: namespace.to_string(),
            candidates,
        }
    }

    pub fn load_failure(class: impl std::fmt::Display, err: anyhow::Error) -> Self {
        ViewError::LoadFailure {
            class: class.to_string(),
            source: err.into(),
        }
    }

    pub fn invalid_class_name(name: &str, reason: &str) -> Self {
        ViewError::InvalidClassName {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn manifest(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        ViewError::Manifest {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type for configuration operations.
pub type ViewResult<T> = std::result::Result<T, ViewError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_serialize_screaming_snake() {
        let json = serde_json::to_string(&ErrorCode::LayoutNotFound).unwrap();
        assert_eq!(json, "\"LAYOUT_NOT_FOUND\"");
    }

    #[test]
    fn test_layout_not_found_lists_candidates() {
        let err = ViewError::layout_not_found(
            "application",
            "Web::Views",
            vec![
                "Web::Views::ApplicationLayout".to_string(),
                "ApplicationLayout".to_string(),
            ],
        );
        assert_eq!(err.code(), ErrorCode::LayoutNotFound);
        assert_eq!(
            err.to_string(),
            "Layout not found: application (tried Web::Views::ApplicationLayout, ApplicationLayout)"
        );
    }

    #[test]
    fn test_load_failure_keeps_source() {
        let err = ViewError::load_failure("Web::Views::Index", anyhow::anyhow!("missing template"));
        assert_eq!(err.code(), ErrorCode::LoadFailure);
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "missing template");
    }
}
