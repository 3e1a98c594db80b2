//! Client-side working set of draft boxes.
//!
//! A [`DraftStore`] holds the display-space boxes drawn during one
//! annotation session, for exactly one image. Drafts are ephemeral:
//! switching images resets the store, and nothing here is persisted
//! until the session submits.

use crate::constants::MIN_DRAFT_BOX_PX;
use crate::error::SpotterError;
use crate::geometry::{self, BoundingBox, DisplaySize};

/// Ordered, mutable sequence of display-space draft boxes.
#[derive(Debug, Clone, Default)]
pub struct DraftStore {
    boxes: Vec<BoundingBox>,
}

impl DraftStore {
    /// Create an empty draft store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a draft box.
    ///
    /// Boxes whose display-space width or height falls below
    /// [`MIN_DRAFT_BOX_PX`] are almost always accidental clicks; they
    /// are dropped and `false` is returned so the caller can tell the
    /// user nothing was added.
    pub fn add(&mut self, bbox: BoundingBox) -> bool {
        if bbox.width() < MIN_DRAFT_BOX_PX || bbox.height() < MIN_DRAFT_BOX_PX {
            log::debug!(
                "draft rejected: {}x{} px is below the {} px minimum",
                bbox.width(),
                bbox.height(),
                MIN_DRAFT_BOX_PX
            );
            return false;
        }
        self.boxes.push(bbox);
        true
    }

    /// Remove and return the most recently added box.
    ///
    /// No-op on an empty store.
    pub fn undo(&mut self) -> Option<BoundingBox> {
        self.boxes.pop()
    }

    /// Discard all drafts.
    pub fn clear(&mut self) {
        self.boxes.clear();
    }

    /// Number of drafts held.
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// Whether the store holds no drafts.
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Iterate over the drafts in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &BoundingBox> {
        self.boxes.iter()
    }

    /// Map every draft through the display-to-canonical transform.
    ///
    /// Does not mutate the store; the session clears it only once the
    /// submission actually succeeded.
    pub fn export_canonical(
        &self,
        displayed: DisplaySize,
        canonical_width: u32,
        canonical_height: u32,
    ) -> Result<Vec<BoundingBox>, SpotterError> {
        self.boxes
            .iter()
            .map(|b| geometry::to_canonical(*b, displayed, canonical_width, canonical_height))
            .collect()
    }
}
