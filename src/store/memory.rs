//! In-memory [`LabelStore`] with JSON snapshot support.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SpotterError;
use crate::geometry::BoundingBox;
use crate::lifecycle::ImageState;
use crate::model::{Image, ImageId, Label, LabelId, UserId};
use crate::store::LabelStore;

/// An in-memory image/label store.
///
/// Rows live in `BTreeMap`s keyed by id, which makes ascending-id
/// iteration (insertion order for our monotonic ids) the natural order
/// everywhere. The whole store serializes to JSON, so the seed tool can
/// keep a snapshot file between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryStore {
    images: BTreeMap<ImageId, Image>,
    labels: BTreeMap<LabelId, Label>,
    next_image_id: ImageId,
    next_label_id: LabelId,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            images: BTreeMap::new(),
            labels: BTreeMap::new(),
            next_image_id: 1,
            next_label_id: 1,
        }
    }

    /// Load a store snapshot from a JSON file.
    pub fn load(path: &Path) -> Result<Self, SpotterError> {
        let json = std::fs::read_to_string(path)?;
        let store = serde_json::from_str(&json)?;
        Ok(store)
    }

    /// Write the store as pretty-printed JSON to `path`.
    pub fn save(&self, path: &Path) -> Result<(), SpotterError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Total number of images.
    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Total number of labels across all images.
    pub fn label_count(&self) -> usize {
        self.labels.len()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LabelStore for MemoryStore {
    fn insert_image(
        &mut self,
        filename: &str,
        width: u32,
        height: u32,
    ) -> Result<Image, SpotterError> {
        let image = Image {
            id: self.next_image_id,
            filename: filename.to_string(),
            width,
            height,
            state: ImageState::Unlabeled,
        };
        self.next_image_id += 1;
        self.images.insert(image.id, image.clone());
        Ok(image)
    }

    fn image(&self, id: ImageId) -> Result<Option<Image>, SpotterError> {
        Ok(self.images.get(&id).cloned())
    }

    fn image_by_filename(&self, filename: &str) -> Result<Option<Image>, SpotterError> {
        Ok(self
            .images
            .values()
            .find(|img| img.filename == filename)
            .cloned())
    }

    fn next_unlabeled(&self) -> Result<Option<Image>, SpotterError> {
        Ok(self
            .images
            .values()
            .find(|img| img.state.assignable())
            .cloned())
    }

    fn images_by_state(
        &self,
        state: ImageState,
        limit: usize,
    ) -> Result<Vec<Image>, SpotterError> {
        Ok(self
            .images
            .values()
            .filter(|img| img.state == state)
            .take(limit)
            .cloned()
            .collect())
    }

    fn set_state(&mut self, id: ImageId, state: ImageState) -> Result<u64, SpotterError> {
        match self.images.get_mut(&id) {
            Some(image) => {
                image.state = state;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn submit_labels(
        &mut self,
        image_id: ImageId,
        created_by: UserId,
        boxes: &[BoundingBox],
    ) -> Result<Vec<LabelId>, SpotterError> {
        // All checks happen before the first mutation, so a failure
        // leaves both tables untouched.
        let Some(image) = self.images.get_mut(&image_id) else {
            return Err(SpotterError::ImageNotFound { id: image_id });
        };
        image.state = ImageState::after_submission();

        let mut ids = Vec::with_capacity(boxes.len());
        for bbox in boxes {
            let label = Label {
                id: self.next_label_id,
                image_id,
                created_by,
                xmin: bbox.xmin,
                ymin: bbox.ymin,
                xmax: bbox.xmax,
                ymax: bbox.ymax,
            };
            self.next_label_id += 1;
            ids.push(label.id);
            self.labels.insert(label.id, label);
        }

        Ok(ids)
    }

    fn labels_for_image(&self, image_id: ImageId) -> Result<Vec<Label>, SpotterError> {
        Ok(self
            .labels
            .values()
            .filter(|l| l.image_id == image_id)
            .cloned()
            .collect())
    }

    fn delete_label(&mut self, id: LabelId) -> Result<u64, SpotterError> {
        Ok(match self.labels.remove(&id) {
            Some(_) => 1,
            None => 0,
        })
    }
}
