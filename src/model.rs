//! Domain model: images, labels, and the identities that act on them.

use serde::{Deserialize, Serialize};

use crate::geometry::BoundingBox;
use crate::lifecycle::ImageState;

/// Opaque image identifier.
pub type ImageId = i64;
/// Opaque label identifier.
pub type LabelId = i64;
/// Opaque user identifier, supplied by the authentication collaborator.
pub type UserId = i64;

/// An ingested image and its review progress.
///
/// Width and height are the canonical pixel dimensions, fixed at
/// ingestion; every label ever stored for this image must lie within
/// `[0, width] x [0, height]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub id: ImageId,
    pub filename: String,
    pub width: u32,
    pub height: u32,
    pub state: ImageState,
}

impl Image {
    /// Resolve this image's filename to a fetchable URL under `base`.
    ///
    /// The static asset collaborator guarantees a byte-stable mapping
    /// from filename to content; this only builds the address.
    pub fn url(&self, base: &str) -> String {
        format!("{}/{}", base.trim_end_matches('/'), self.filename)
    }
}

/// A persisted, canonical-space box attributed to an image and creator.
///
/// Labels are never mutated in place; correction is delete-and-resubmit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub id: LabelId,
    pub image_id: ImageId,
    pub created_by: UserId,
    pub xmin: f32,
    pub ymin: f32,
    pub xmax: f32,
    pub ymax: f32,
}

impl Label {
    /// The label's coordinates as a [`BoundingBox`].
    pub fn bbox(&self) -> BoundingBox {
        BoundingBox::new(self.xmin, self.ymin, self.xmax, self.ymax)
    }
}

/// What a user is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Draws boxes on assigned images.
    Annotator,
    /// Reviews submitted work and drives state overrides.
    Admin,
}

/// A verified identity, as handed over by the authentication
/// collaborator. The core trusts this pair completely; credential
/// storage and token issuance happen upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub role: Role,
}

impl User {
    pub fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_url_joins_cleanly() {
        let image = Image {
            id: 1,
            filename: "dog_001.png".to_string(),
            width: 640,
            height: 480,
            state: ImageState::Unlabeled,
        };

        assert_eq!(image.url("/static"), "/static/dog_001.png");
        assert_eq!(image.url("/static/"), "/static/dog_001.png");
        assert_eq!(
            image.url("http://localhost:5000/static"),
            "http://localhost:5000/static/dog_001.png"
        );
    }

    #[test]
    fn test_label_bbox_view() {
        let label = Label {
            id: 7,
            image_id: 1,
            created_by: 2,
            xmin: 20.0,
            ymin: 20.0,
            xmax: 120.0,
            ymax: 120.0,
        };

        let bbox = label.bbox();
        assert_eq!(bbox.width(), 100.0);
        assert!(bbox.has_positive_area());
    }
}
