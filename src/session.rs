//! Annotator session workflow.
//!
//! An [`AnnotationSession`] drives the fetch-draw-submit loop for one
//! user: pull the next unlabeled image, collect display-space drafts,
//! convert them to canonical space against the rendered display size,
//! submit, and auto-advance. The transport behind it is abstracted as
//! [`Backend`] so the workflow is testable without any wire at all.
//!
//! A session takes `&mut self` for every mutating step, so two
//! overlapping submissions from one session are unrepresentable; the
//! optimistic draft clear only happens after the backend reported
//! success.

use crate::draft::DraftStore;
use crate::error::SpotterError;
use crate::geometry::{BoundingBox, DisplaySize};
use crate::model::{Image, ImageId, User};
use crate::service::{submission, SubmitReceipt};
use crate::store::LabelStore;

/// The slice of the wire contract an annotator session consumes.
///
/// Faults surface as [`SpotterError`]; queue exhaustion is `Ok(None)`.
pub trait Backend {
    /// Request one unlabeled image, or `None` when the queue is empty.
    fn next_image(&mut self) -> Result<Option<Image>, SpotterError>;

    /// Submit a batch of canonical-space boxes for `image_id`.
    fn submit_labels(
        &mut self,
        image_id: ImageId,
        boxes: &[BoundingBox],
    ) -> Result<SubmitReceipt, SpotterError>;
}

/// In-process [`Backend`] that calls the submission service directly
/// on an owned store, for tests and embedded use without a transport.
pub struct InProcessBackend<S: LabelStore> {
    store: S,
    user: User,
}

impl<S: LabelStore> InProcessBackend<S> {
    pub fn new(store: S, user: User) -> Self {
        Self { store, user }
    }

    /// Borrow the underlying store (e.g. for review-side assertions).
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutably borrow the underlying store.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}

impl<S: LabelStore> Backend for InProcessBackend<S> {
    fn next_image(&mut self) -> Result<Option<Image>, SpotterError> {
        submission::next_image(&self.store, &self.user)
    }

    fn submit_labels(
        &mut self,
        image_id: ImageId,
        boxes: &[BoundingBox],
    ) -> Result<SubmitReceipt, SpotterError> {
        submission::submit_labels(&mut self.store, &self.user, image_id, boxes)
    }
}

/// Outcome of a successful submission, including the auto-advance.
///
/// The batch is persisted by the time this exists; the receipt is
/// therefore unconditional. The auto-advance runs after persistence
/// and can fail independently, so its fault is carried here instead of
/// masquerading as a submission failure.
#[derive(Debug)]
pub struct SubmitOutcome {
    /// Acknowledgment for the persisted batch.
    pub receipt: SubmitReceipt,
    /// The auto-advance result: the next unlabeled image (already
    /// loaded into the session), `None` on queue exhaustion, or the
    /// transport fault that kept the session without a current image.
    pub next: Result<Option<Image>, SpotterError>,
}

/// Per-user, per-image annotation workflow state.
pub struct AnnotationSession<B: Backend> {
    backend: B,
    current: Option<Image>,
    drafts: DraftStore,
    displayed: Option<DisplaySize>,
}

impl<B: Backend> AnnotationSession<B> {
    /// Create a session with no image loaded.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            current: None,
            drafts: DraftStore::new(),
            displayed: None,
        }
    }

    /// The image currently being worked, if any.
    pub fn current_image(&self) -> Option<&Image> {
        self.current.as_ref()
    }

    /// Number of drafts collected for the current image.
    pub fn draft_count(&self) -> usize {
        self.drafts.len()
    }

    /// Fetch the next unlabeled image and make it current.
    ///
    /// Unsent drafts for the previous image are discarded silently;
    /// partial work is never persisted. Returns `None` on queue
    /// exhaustion, which is a normal condition.
    pub fn next_image(&mut self) -> Result<Option<&Image>, SpotterError> {
        let image = self.backend.next_image()?;
        if self.current.is_some() && !self.drafts.is_empty() {
            log::debug!(
                "discarding {} unsent drafts on image switch",
                self.drafts.len()
            );
        }
        self.drafts.clear();
        self.displayed = None;
        self.current = image;
        Ok(self.current.as_ref())
    }

    /// Record the rendered size of the current image.
    ///
    /// The canonical transform needs the exact on-screen pixel size at
    /// submit time; the renderer must pass it here whenever the layout
    /// changes. Kept explicit rather than read from any global state.
    pub fn set_displayed(&mut self, displayed: DisplaySize) {
        self.displayed = Some(displayed);
    }

    /// Add a display-space draft box. Returns `false` when the box was
    /// rejected for being under the minimum size.
    pub fn add_box(&mut self, bbox: BoundingBox) -> Result<bool, SpotterError> {
        if self.current.is_none() {
            return Err(SpotterError::NoActiveImage);
        }
        Ok(self.drafts.add(bbox))
    }

    /// Remove the most recently drawn draft, if any.
    pub fn undo(&mut self) -> Option<BoundingBox> {
        self.drafts.undo()
    }

    /// Discard all drafts for the current image.
    pub fn clear(&mut self) {
        self.drafts.clear();
    }

    /// Export, submit, and auto-advance.
    ///
    /// Requires a current image, at least one draft, and a recorded
    /// display size. On success the drafts are cleared and the next
    /// unlabeled image is fetched immediately. On any failure before
    /// persistence (validation or transport) the drafts and current
    /// image are left intact so no work is lost, and no retry is
    /// attempted.
    ///
    /// A fault during the auto-advance does NOT fail the call: the
    /// labels are already durable at that point, so the receipt comes
    /// back as `Ok` and the advance fault is reported in
    /// [`SubmitOutcome::next`]. The session is left without a current
    /// image; the caller retries with [`next_image`].
    ///
    /// [`next_image`]: AnnotationSession::next_image
    pub fn submit(&mut self) -> Result<SubmitOutcome, SpotterError> {
        let image = self.current.as_ref().ok_or(SpotterError::NoActiveImage)?;
        if self.drafts.is_empty() {
            return Err(SpotterError::EmptyBatch);
        }
        let displayed = self.displayed.ok_or(SpotterError::DegenerateDisplay {
            width: 0.0,
            height: 0.0,
        })?;

        let boxes = self
            .drafts
            .export_canonical(displayed, image.width, image.height)?;
        let image_id = image.id;

        let receipt = self.backend.submit_labels(image_id, &boxes)?;

        // Only now is it safe to drop local state.
        self.drafts.clear();
        self.displayed = None;
        self.current = None;

        let next = self.backend.next_image();
        match &next {
            Ok(image) => self.current = image.clone(),
            Err(err) => log::warn!(
                "labels for image {image_id} persisted but auto-advance failed: {err}"
            ),
        }
        Ok(SubmitOutcome { receipt, next })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::ImageState;
    use crate::model::{Role, User};
    use crate::store::{LabelStore, MemoryStore};

    fn session_with_images(n: usize) -> AnnotationSession<InProcessBackend<MemoryStore>> {
        let mut store = MemoryStore::new();
        for i in 0..n {
            store
                .insert_image(&format!("img_{i:03}.png"), 1000, 800)
                .unwrap();
        }
        let backend = InProcessBackend::new(store, User::new(1, Role::Annotator));
        AnnotationSession::new(backend)
    }

    fn backend(session: &AnnotationSession<InProcessBackend<MemoryStore>>) -> &MemoryStore {
        session.backend.store()
    }

    #[test]
    fn test_draw_submit_advance_flow() {
        let mut session = session_with_images(2);

        let first = session.next_image().unwrap().unwrap();
        assert_eq!(first.id, 1);

        // 1000x800 canonical, rendered at 500x400: a 2x scale-up.
        session.set_displayed(DisplaySize::new(500.0, 400.0));
        assert!(session
            .add_box(BoundingBox::new(10.0, 10.0, 60.0, 60.0))
            .unwrap());

        let outcome = session.submit().unwrap();
        assert_eq!(outcome.receipt.image_id, 1);
        assert_eq!(outcome.receipt.state, ImageState::Annotated);

        // Auto-advance landed on the next unlabeled image.
        assert_eq!(outcome.next.unwrap().unwrap().id, 2);
        assert_eq!(session.current_image().unwrap().id, 2);
        assert_eq!(session.draft_count(), 0);

        // The stored label is the canonical-space box.
        let labels = backend(&session).labels_for_image(1).unwrap();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].bbox(), BoundingBox::new(20.0, 20.0, 120.0, 120.0));
    }

    #[test]
    fn test_submit_exhausts_queue() {
        let mut session = session_with_images(1);
        session.next_image().unwrap();
        session.set_displayed(DisplaySize::new(1000.0, 800.0));
        session
            .add_box(BoundingBox::new(10.0, 10.0, 60.0, 60.0))
            .unwrap();

        let outcome = session.submit().unwrap();
        assert!(outcome.next.unwrap().is_none());
        assert!(session.current_image().is_none());
    }

    #[test]
    fn test_advance_fault_still_returns_receipt() {
        // Persists the batch, then fails every subsequent fetch.
        struct AdvanceFailingBackend {
            store: MemoryStore,
            user: User,
            submitted: bool,
        }
        impl Backend for AdvanceFailingBackend {
            fn next_image(&mut self) -> Result<Option<Image>, SpotterError> {
                if self.submitted {
                    Err(SpotterError::storage("transport down"))
                } else {
                    crate::service::submission::next_image(&self.store, &self.user)
                }
            }
            fn submit_labels(
                &mut self,
                image_id: ImageId,
                boxes: &[BoundingBox],
            ) -> Result<SubmitReceipt, SpotterError> {
                let receipt = crate::service::submission::submit_labels(
                    &mut self.store,
                    &self.user,
                    image_id,
                    boxes,
                )?;
                self.submitted = true;
                Ok(receipt)
            }
        }

        let mut store = MemoryStore::new();
        store.insert_image("img_000.png", 1000, 800).unwrap();
        let backend = AdvanceFailingBackend {
            store,
            user: User::new(1, Role::Annotator),
            submitted: false,
        };
        let mut session = AnnotationSession::new(backend);
        session.next_image().unwrap();
        session.set_displayed(DisplaySize::new(500.0, 400.0));
        session
            .add_box(BoundingBox::new(10.0, 10.0, 60.0, 60.0))
            .unwrap();

        // The batch is durable, so the receipt must come back even
        // though the advance hit a fault.
        let outcome = session.submit().unwrap();
        assert_eq!(outcome.receipt.image_id, 1);
        assert_eq!(outcome.receipt.label_ids.len(), 1);
        assert!(matches!(outcome.next, Err(SpotterError::Storage { .. })));

        // The session has no current image; the labels are persisted
        // exactly once and the drafts are gone.
        assert!(session.current_image().is_none());
        assert_eq!(session.draft_count(), 0);
        assert_eq!(session.backend.store.label_count(), 1);
    }

    #[test]
    fn test_submit_without_drafts_is_rejected() {
        let mut session = session_with_images(1);
        session.next_image().unwrap();
        session.set_displayed(DisplaySize::new(500.0, 400.0));

        let err = session.submit();
        assert!(matches!(err, Err(SpotterError::EmptyBatch)));
    }

    #[test]
    fn test_submit_without_display_size_is_rejected() {
        let mut session = session_with_images(1);
        session.next_image().unwrap();
        session
            .add_box(BoundingBox::new(10.0, 10.0, 60.0, 60.0))
            .unwrap();

        let err = session.submit();
        assert!(matches!(err, Err(SpotterError::DegenerateDisplay { .. })));
        // Work is preserved for the retry.
        assert_eq!(session.draft_count(), 1);
    }

    #[test]
    fn test_failed_submission_preserves_drafts() {
        // A backend that always fails at the transport boundary.
        struct FailingBackend;
        impl Backend for FailingBackend {
            fn next_image(&mut self) -> Result<Option<Image>, SpotterError> {
                Ok(Some(Image {
                    id: 1,
                    filename: "x.png".to_string(),
                    width: 100,
                    height: 100,
                    state: ImageState::Unlabeled,
                }))
            }
            fn submit_labels(
                &mut self,
                _image_id: ImageId,
                _boxes: &[BoundingBox],
            ) -> Result<SubmitReceipt, SpotterError> {
                Err(SpotterError::storage("connection reset"))
            }
        }

        let mut session = AnnotationSession::new(FailingBackend);
        session.next_image().unwrap();
        session.set_displayed(DisplaySize::new(100.0, 100.0));
        session
            .add_box(BoundingBox::new(10.0, 10.0, 60.0, 60.0))
            .unwrap();

        let err = session.submit();
        assert!(matches!(err, Err(SpotterError::Storage { .. })));

        // Drafts, display size, and current image all survive so the
        // user can retry manually.
        assert_eq!(session.draft_count(), 1);
        assert_eq!(session.current_image().unwrap().id, 1);
        let retry = session.submit();
        assert!(retry.is_err());
        assert_eq!(session.draft_count(), 1);
    }

    #[test]
    fn test_switching_images_resets_drafts() {
        let mut session = session_with_images(2);
        session.next_image().unwrap();
        session.set_displayed(DisplaySize::new(500.0, 400.0));
        session
            .add_box(BoundingBox::new(10.0, 10.0, 60.0, 60.0))
            .unwrap();

        // Fetching again discards the unsent draft silently.
        session.next_image().unwrap();
        assert_eq!(session.draft_count(), 0);
    }

    #[test]
    fn test_add_box_without_image_fails() {
        let mut session = session_with_images(1);
        let err = session.add_box(BoundingBox::new(0.0, 0.0, 10.0, 10.0));
        assert!(matches!(err, Err(SpotterError::NoActiveImage)));
    }
}
