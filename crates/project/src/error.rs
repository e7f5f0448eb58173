//! Error types for the project crate (thiserror-based).

use thiserror::Error;

use crate::types::TrackKind;

/// Errors that can occur during project model or persistence operations.
///
/// Invariant violations are rejected at the model boundary: the operation
/// returns an error and the project is left exactly as it was.
#[derive(Error, Debug)]
pub enum ProjectError {
    #[error("track not found: {id}")]
    TrackNotFound { id: String },

    #[error("clip not found: {id}")]
    ClipNotFound { id: String },

    #[error("invalid clip range: start {start} must be < end {end}")]
    InvalidClipRange { start: u64, end: u64 },

    #[error("clip kind {clip:?} does not match track kind {track:?}")]
    KindMismatch { clip: TrackKind, track: TrackKind },

    #[error("split point {at} outside clip range ({start}, {end})")]
    InvalidSplitPoint { at: u64, start: u64, end: u64 },

    #[error("parameter '{key}' does not apply to a {kind:?} clip")]
    ParamKindMismatch { key: &'static str, kind: TrackKind },

    #[error("invalid project document: {reason}")]
    InvalidProject { reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience Result type for project operations.
pub type ProjectResult<T> = Result<T, ProjectError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = ProjectError::ClipNotFound { id: "c_9".into() };
        assert!(err.to_string().contains("c_9"));

        let err = ProjectError::InvalidClipRange { start: 10, end: 10 };
        assert!(err.to_string().contains("10"));

        let err = ProjectError::KindMismatch {
            clip: TrackKind::Text,
            track: TrackKind::Video,
        };
        let msg = err.to_string();
        assert!(msg.contains("Text") && msg.contains("Video"));
    }

    #[test]
    fn io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let proj_err: ProjectError = io_err.into();
        assert!(matches!(proj_err, ProjectError::Io(_)));
    }
}
