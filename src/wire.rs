//! Serde bodies for the endpoints the core's correctness depends on.
//!
//! HTTP routing itself lives outside this crate; these types pin down
//! the JSON shapes so every transport that carries them agrees on the
//! contract.

use serde::{Deserialize, Serialize};

use crate::error::SpotterError;
use crate::geometry::BoundingBox;
use crate::lifecycle::ImageState;
use crate::model::{Image, ImageId, Label};
use crate::service::SubmitReceipt;

/// `POST submit-labels` request body:
/// `{ "imageId": 1, "boxes": [{ "xmin": .., "ymin": .., "xmax": .., "ymax": .. }] }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitLabelsRequest {
    #[serde(rename = "imageId")]
    pub image_id: ImageId,
    pub boxes: Vec<BoundingBox>,
}

/// Success acknowledgment for a label submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitLabelsResponse {
    pub message: String,
    pub inserted: usize,
    pub state: ImageState,
}

impl From<&SubmitReceipt> for SubmitLabelsResponse {
    fn from(receipt: &SubmitReceipt) -> Self {
        Self {
            message: "Labels saved, image marked Annotated".to_string(),
            inserted: receipt.label_ids.len(),
            state: receipt.state,
        }
    }
}

/// `PATCH set-state` request body: `{ "state": "Verified" }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetStateRequest {
    pub state: String,
}

impl SetStateRequest {
    /// Parse the carried state name, rejecting anything outside the
    /// four defined states.
    pub fn parse_state(&self) -> Result<ImageState, SpotterError> {
        self.state.parse()
    }
}

/// Row-count acknowledgment for `set-state` and `delete-label`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowsAffectedResponse {
    pub affected: u64,
}

/// Labels for one image, insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelsResponse {
    pub labels: Vec<Label>,
}

/// An image as handed to clients, with its resolved content URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagePayload {
    pub id: ImageId,
    pub filename: String,
    pub width: u32,
    pub height: u32,
    pub state: ImageState,
    pub url: String,
}

impl ImagePayload {
    /// Build the payload for `image`, resolving its URL under `base`.
    pub fn from_image(image: &Image, base: &str) -> Self {
        Self {
            id: image.id,
            filename: image.filename.clone(),
            width: image.width,
            height: image.height,
            state: image.state,
            url: image.url(base),
        }
    }
}

/// Structured rejection body.
///
/// Validation failures carry enough detail to fix the input: for a box
/// constraint violation, the zero-based index of the offending box and
/// the constraint that failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub box_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraint: Option<String>,
    pub retryable: bool,
}

impl From<&SpotterError> for ErrorResponse {
    fn from(err: &SpotterError) -> Self {
        let (box_index, constraint) = match err {
            SpotterError::InvalidBox { index, constraint } => {
                (Some(*index), Some(constraint.clone()))
            }
            _ => (None, None),
        };
        Self {
            message: err.to_string(),
            box_index,
            constraint,
            retryable: err.is_retryable(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_request_shape() {
        let json = r#"{"imageId": 3, "boxes": [{"xmin": 1.0, "ymin": 2.0, "xmax": 10.0, "ymax": 20.0}]}"#;
        let req: SubmitLabelsRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.image_id, 3);
        assert_eq!(req.boxes.len(), 1);
        assert_eq!(req.boxes[0].xmax, 10.0);

        let back = serde_json::to_string(&req).unwrap();
        assert!(back.contains("\"imageId\":3"));
    }

    #[test]
    fn test_set_state_request_parses_valid_names_only() {
        let req = SetStateRequest {
            state: "Rejected".to_string(),
        };
        assert_eq!(req.parse_state().unwrap(), ImageState::Rejected);

        let bad = SetStateRequest {
            state: "Deleted".to_string(),
        };
        assert!(matches!(
            bad.parse_state(),
            Err(SpotterError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_error_response_names_box_and_constraint() {
        let err = SpotterError::invalid_box(4, "ymax must be greater than ymin");
        let body = ErrorResponse::from(&err);
        assert_eq!(body.box_index, Some(4));
        assert_eq!(
            body.constraint.as_deref(),
            Some("ymax must be greater than ymin")
        );
        assert!(!body.retryable);
    }

    #[test]
    fn test_image_payload_carries_url() {
        let image = Image {
            id: 9,
            filename: "cat.png".to_string(),
            width: 800,
            height: 600,
            state: ImageState::Annotated,
        };
        let payload = ImagePayload::from_image(&image, "/static");
        assert_eq!(payload.url, "/static/cat.png");

        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains("\"state\":\"Annotated\""));
    }
}
