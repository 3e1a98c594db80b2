//! Server-side services: label submission and the review workflow.
//!
//! Both operate on any [`LabelStore`] and take the verified [`User`]
//! identity supplied by the authentication collaborator. Authorization
//! is checked before any domain logic runs; validation is checked
//! before any persistence happens.

use crate::constants::REVIEW_PAGE_SIZE;
use crate::error::SpotterError;
use crate::geometry::BoundingBox;
use crate::lifecycle::ImageState;
use crate::model::{Image, ImageId, Label, LabelId, Role, User};
use crate::store::LabelStore;

/// Acknowledgment of a successfully persisted submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitReceipt {
    /// The image the labels were stored against.
    pub image_id: ImageId,
    /// Ids of the inserted labels, in insertion order.
    pub label_ids: Vec<LabelId>,
    /// The image's lifecycle state after the submission.
    pub state: ImageState,
}

fn require_role(user: &User, required: Role) -> Result<(), SpotterError> {
    if user.role == required {
        Ok(())
    } else {
        Err(SpotterError::Forbidden { required })
    }
}

/// Annotator-facing operations.
pub mod submission {
    use super::*;

    /// Hand out one `Unlabeled` image: the lowest id, or `None` when
    /// the queue is empty (a normal condition, not an error).
    ///
    /// No reservation is taken; concurrent annotators may receive the
    /// same image. See the assignment policy note on
    /// [`LabelStore::next_unlabeled`].
    pub fn next_image(
        store: &impl LabelStore,
        user: &User,
    ) -> Result<Option<Image>, SpotterError> {
        require_role(user, Role::Annotator)?;
        store.next_unlabeled()
    }

    /// Validate and atomically persist a batch of canonical-space boxes
    /// for `image_id`, then move the image to `Annotated`.
    ///
    /// Any constraint violation rejects the entire batch with no
    /// partial insert, naming the offending box and constraint. The
    /// service does not check that the image was ever handed to this
    /// user: any authenticated annotator may submit for any image id.
    pub fn submit_labels(
        store: &mut impl LabelStore,
        user: &User,
        image_id: ImageId,
        boxes: &[BoundingBox],
    ) -> Result<SubmitReceipt, SpotterError> {
        require_role(user, Role::Annotator)?;

        if boxes.is_empty() {
            return Err(SpotterError::EmptyBatch);
        }

        let image = store
            .image(image_id)?
            .ok_or(SpotterError::ImageNotFound { id: image_id })?;

        for (index, bbox) in boxes.iter().enumerate() {
            validate_box(index, bbox, &image)?;
        }

        let label_ids = store.submit_labels(image_id, user.id, boxes)?;
        log::info!(
            "user {} submitted {} labels for image {}, now Annotated",
            user.id,
            label_ids.len(),
            image_id
        );

        Ok(SubmitReceipt {
            image_id,
            label_ids,
            state: ImageState::after_submission(),
        })
    }

    fn validate_box(
        index: usize,
        bbox: &BoundingBox,
        image: &Image,
    ) -> Result<(), SpotterError> {
        if !bbox.is_finite() {
            return Err(SpotterError::invalid_box(
                index,
                "coordinates must be finite numbers",
            ));
        }
        if bbox.xmax <= bbox.xmin {
            return Err(SpotterError::invalid_box(
                index,
                "xmax must be greater than xmin",
            ));
        }
        if bbox.ymax <= bbox.ymin {
            return Err(SpotterError::invalid_box(
                index,
                "ymax must be greater than ymin",
            ));
        }
        if !bbox.within_bounds(image.width as f32, image.height as f32) {
            return Err(SpotterError::invalid_box(
                index,
                format!(
                    "box exceeds canonical bounds {}x{}",
                    image.width, image.height
                ),
            ));
        }
        Ok(())
    }
}

/// Admin-facing review operations.
pub mod review {
    use super::*;

    /// Images currently in `state`, ascending by id, capped at
    /// [`REVIEW_PAGE_SIZE`].
    pub fn list_by_state(
        store: &impl LabelStore,
        user: &User,
        state: ImageState,
    ) -> Result<Vec<Image>, SpotterError> {
        require_role(user, Role::Admin)?;
        store.images_by_state(state, REVIEW_PAGE_SIZE)
    }

    /// All labels for an image in insertion order, for overlay
    /// rendering. Any authenticated identity may read labels; only
    /// destructive review actions require the admin role.
    pub fn load_labels(
        store: &impl LabelStore,
        _user: &User,
        image_id: ImageId,
    ) -> Result<Vec<Label>, SpotterError> {
        store.labels_for_image(image_id)
    }

    /// Delete exactly one label.
    ///
    /// Returns the number of rows removed; deleting an unknown id
    /// reports 0 without erroring. The image's lifecycle state is left
    /// alone: re-setting it is a separate, deliberate admin action.
    pub fn delete_label(
        store: &mut impl LabelStore,
        user: &User,
        label_id: LabelId,
    ) -> Result<u64, SpotterError> {
        require_role(user, Role::Admin)?;
        let deleted = store.delete_label(label_id)?;
        if deleted == 0 {
            log::debug!("delete_label({label_id}): no such label");
        }
        Ok(deleted)
    }

    /// Administrative state override: unconditionally set `image_id` to
    /// `state`, from any current state.
    ///
    /// This is deliberately kept general rather than guarded by a
    /// transition table; it is the single entry point through which any
    /// future tightening would go. The annotator path cannot reach it.
    /// Returns the number of rows updated (0 for an unknown image id).
    pub fn set_state(
        store: &mut impl LabelStore,
        user: &User,
        image_id: ImageId,
        state: ImageState,
    ) -> Result<u64, SpotterError> {
        require_role(user, Role::Admin)?;
        let updated = store.set_state(image_id, state)?;
        if updated > 0 {
            log::info!("admin {} set image {} to {}", user.id, image_id, state);
        }
        Ok(updated)
    }
}
