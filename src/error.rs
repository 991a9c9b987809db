//! Error types for marker and draw-mode operations.

use thiserror::Error;

/// Errors raised synchronously by the public annotator operations.
///
/// Live gestures (drag, resize, draw preview) never produce these; invalid
/// candidates there are reverted instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnnotateError {
    /// Coordinate or size out of range for its unit
    #[error("Invalid marker value: {message}")]
    Validation {
        /// Which value was rejected and why
        message: String,
    },

    /// A marker with this id is already placed
    #[error("Marker '{id}' already exists")]
    DuplicateMarker {
        /// The colliding id
        id: String,
    },

    /// The marker would extend past the image
    #[error("Marker '{id}' is not inside the image")]
    OutOfBounds {
        /// Id of the rejected marker
        id: String,
    },

    /// Draw mode requested without a pending marker id
    #[error("A marker id is required to enter draw mode")]
    MissingId,

    /// Draw mode requested while another session is active
    #[error("Already drawing marker '{id}'")]
    DrawInProgress {
        /// Id of the session that is still active
        id: String,
    },

    /// No placed marker has this id
    #[error("Marker '{id}' not found")]
    MarkerNotFound {
        /// The unknown id
        id: String,
    },
}

impl AnnotateError {
    /// Create a validation error with a message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn duplicate(id: impl Into<String>) -> Self {
        Self::DuplicateMarker { id: id.into() }
    }

    pub fn out_of_bounds(id: impl Into<String>) -> Self {
        Self::OutOfBounds { id: id.into() }
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        Self::MarkerNotFound { id: id.into() }
    }
}

pub type Result<T, E = AnnotateError> = std::result::Result<T, E>;
