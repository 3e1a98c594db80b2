//! Error types for the Spotter annotation core.

use thiserror::Error;

use crate::model::{ImageId, Role};

/// Errors that can occur across the annotation lifecycle.
///
/// The taxonomy distinguishes validation errors (fixable caller input),
/// not-found conditions that are genuine faults, persistence faults
/// (retryable), and authorization faults. Expected negative results such
/// as an empty work queue are modeled as `Ok(None)` or zero-row counts
/// by the APIs themselves, not as errors.
#[derive(Error, Debug)]
pub enum SpotterError {
    /// I/O error during ingestion or store snapshot operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Image decoding error while measuring canonical dimensions
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Display dimensions were zero or non-finite, so no scale exists
    #[error("degenerate display size {width}x{height}: image not rendered yet")]
    DegenerateDisplay {
        /// Displayed width that was rejected
        width: f32,
        /// Displayed height that was rejected
        height: f32,
    },

    /// A label submission carried no boxes
    #[error("submission must contain at least one box")]
    EmptyBatch,

    /// A box in a submission violated a geometric constraint.
    /// The whole batch is rejected; nothing is persisted.
    #[error("box {index} rejected: {constraint}")]
    InvalidBox {
        /// Zero-based position of the offending box in the batch
        index: usize,
        /// The constraint that failed
        constraint: String,
    },

    /// A lifecycle state name was not one of the four defined states
    #[error("invalid lifecycle state: '{name}'")]
    InvalidState {
        /// The name that failed to parse
        name: String,
    },

    /// The referenced image does not exist
    #[error("image not found: {id}")]
    ImageNotFound {
        /// The missing image id
        id: ImageId,
    },

    /// A session operation ran without an image loaded
    #[error("no image loaded in this session")]
    NoActiveImage,

    /// The caller's role does not permit this operation
    #[error("operation requires the {required:?} role")]
    Forbidden {
        /// The role the operation requires
        required: Role,
    },

    /// The persistence collaborator failed; prior state is unchanged
    #[error("storage error: {message}")]
    Storage {
        /// Description of the storage failure
        message: String,
    },
}

impl SpotterError {
    /// Create an invalid-box error for the box at `index`.
    pub fn invalid_box(index: usize, constraint: impl Into<String>) -> Self {
        Self::InvalidBox {
            index,
            constraint: constraint.into(),
        }
    }

    /// Create a storage fault with a message.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Whether retrying the failed operation could succeed.
    ///
    /// Only infrastructure faults are retryable; validation and
    /// authorization outcomes will not change on retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage { .. } | Self::Io(_))
    }
}
