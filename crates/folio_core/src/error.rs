//! Host error types

use thiserror::Error;

use crate::element::ElementId;

/// Errors raised by the element host
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The element was torn down while something still referenced it
    #[error("Element {0:?} is gone")]
    TargetGone(ElementId),
}

/// Result type for host operations
pub type Result<T> = std::result::Result<T, HostError>;
