//! Persistence seam for images and labels.
//!
//! The annotation core never talks to a database directly; it goes
//! through [`LabelStore`], which any backing store implements. The
//! crate ships [`memory::MemoryStore`], an in-memory implementation
//! with JSON snapshot support, used by the seed tool and the tests.

mod memory;

pub use memory::MemoryStore;

use crate::error::SpotterError;
use crate::geometry::BoundingBox;
use crate::lifecycle::ImageState;
use crate::model::{Image, ImageId, Label, LabelId, UserId};

/// Storage contract for the shared image/label state.
///
/// Reads report missing rows as `Ok(None)` or empty collections, and
/// destructive operations report affected-row counts, so callers can
/// tell "not there" apart from a storage fault. Implementations raise
/// [`SpotterError::Storage`] only for genuine infrastructure failures.
pub trait LabelStore {
    /// Insert a new image in the `Unlabeled` state and return it.
    ///
    /// Callers are responsible for filename idempotence (see
    /// [`image_by_filename`](Self::image_by_filename)); the store does
    /// not deduplicate.
    fn insert_image(&mut self, filename: &str, width: u32, height: u32)
        -> Result<Image, SpotterError>;

    /// Fetch an image by id.
    fn image(&self, id: ImageId) -> Result<Option<Image>, SpotterError>;

    /// Fetch an image by filename, if one was ever ingested under it.
    fn image_by_filename(&self, filename: &str) -> Result<Option<Image>, SpotterError>;

    /// The lowest-id `Unlabeled` image, if any.
    ///
    /// No reservation is taken: two callers may be handed the same
    /// image, and the last submission wins. This non-exclusivity is the
    /// documented assignment policy, not a defect.
    fn next_unlabeled(&self) -> Result<Option<Image>, SpotterError>;

    /// Images currently in `state`, ascending by id, at most `limit`.
    fn images_by_state(&self, state: ImageState, limit: usize)
        -> Result<Vec<Image>, SpotterError>;

    /// Overwrite an image's lifecycle state unconditionally.
    ///
    /// Returns the number of rows updated: 0 when the image id does not
    /// exist, 1 otherwise.
    fn set_state(&mut self, id: ImageId, state: ImageState) -> Result<u64, SpotterError>;

    /// Persist a submission batch: insert every box as a new label
    /// owned by `created_by`, then move the image to `Annotated`, as a
    /// single atomic unit. On any failure nothing is persisted.
    ///
    /// Geometric validation happens upstream in the submission service;
    /// the store only guarantees atomicity and insertion order.
    fn submit_labels(
        &mut self,
        image_id: ImageId,
        created_by: UserId,
        boxes: &[BoundingBox],
    ) -> Result<Vec<LabelId>, SpotterError>;

    /// All labels for an image in insertion order (ascending id).
    fn labels_for_image(&self, image_id: ImageId) -> Result<Vec<Label>, SpotterError>;

    /// Delete one label by id.
    ///
    /// Returns the number of rows deleted: 0 for an unknown id, 1
    /// otherwise. Never alters the owning image's lifecycle state.
    fn delete_label(&mut self, id: LabelId) -> Result<u64, SpotterError>;
}
