//! COCO-style dataset export.
//!
//! Reviewed work needs an exit path: this module renders every image in
//! a chosen lifecycle state, together with its labels, as a COCO-style
//! JSON document (`bbox` in `[x, y, width, height]` form). Exporting
//! `Verified` images yields a training-ready object detection set.

use serde::Serialize;

use crate::error::SpotterError;
use crate::lifecycle::ImageState;
use crate::model::{ImageId, LabelId};
use crate::store::LabelStore;

#[derive(Serialize)]
struct CocoDataset {
    images: Vec<CocoImage>,
    annotations: Vec<CocoAnnotation>,
    categories: Vec<CocoCategory>,
}

#[derive(Serialize)]
struct CocoImage {
    id: ImageId,
    file_name: String,
    width: u32,
    height: u32,
}

#[derive(Serialize)]
struct CocoAnnotation {
    id: LabelId,
    image_id: ImageId,
    category_id: u32,
    bbox: [f32; 4],
    area: f32,
    iscrowd: u8,
}

#[derive(Serialize)]
struct CocoCategory {
    id: u32,
    name: String,
}

/// Single category id for all exported boxes; Spotter labels carry no
/// class of their own.
const OBJECT_CATEGORY_ID: u32 = 1;

/// Export all images in `state`, with their labels, as COCO JSON.
pub fn export_state(
    store: &impl LabelStore,
    state: ImageState,
) -> Result<String, SpotterError> {
    let images = store.images_by_state(state, usize::MAX)?;

    let mut coco_images = Vec::with_capacity(images.len());
    let mut coco_annotations = Vec::new();

    for image in &images {
        coco_images.push(CocoImage {
            id: image.id,
            file_name: image.filename.clone(),
            width: image.width,
            height: image.height,
        });

        for label in store.labels_for_image(image.id)? {
            let bbox = label.bbox();
            coco_annotations.push(CocoAnnotation {
                id: label.id,
                image_id: image.id,
                category_id: OBJECT_CATEGORY_ID,
                bbox: [bbox.xmin, bbox.ymin, bbox.width(), bbox.height()],
                area: bbox.area(),
                iscrowd: 0,
            });
        }
    }

    let dataset = CocoDataset {
        images: coco_images,
        annotations: coco_annotations,
        categories: vec![CocoCategory {
            id: OBJECT_CATEGORY_ID,
            name: "object".to_string(),
        }],
    };

    log::info!(
        "exported {} images / {} annotations in state {}",
        dataset.images.len(),
        dataset.annotations.len(),
        state
    );
    Ok(serde_json::to_string_pretty(&dataset)?)
}
