//! Error types for the compositor crate (thiserror-based).
//!
//! Rendering itself never fails — missing resources degrade per layer — so
//! the only fallible operation here is configuration.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompositorError {
    #[error("font load failed: {0}")]
    FontLoad(String),
}

/// Convenience Result type for compositor operations.
pub type CompositorResult<T> = Result<T, CompositorError>;
