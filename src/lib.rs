//! Spotter - bounding-box annotation lifecycle core.
//!
//! Human annotators draw boxes on images; administrators review,
//! accept, or reject the work. This crate implements the parts with
//! real invariants: the image lifecycle state machine, the
//! display/canonical coordinate transform, draft collection, validated
//! atomic label submission, the admin review workflow, and batch
//! ingestion. Authentication, HTTP routing, and file serving are
//! external collaborators consumed through narrow seams.

pub mod constants;
pub mod draft;
pub mod error;
pub mod export;
pub mod geometry;
pub mod ingest;
pub mod lifecycle;
pub mod model;
pub mod service;
pub mod session;
pub mod store;
pub mod wire;

pub use draft::DraftStore;
pub use error::SpotterError;
pub use geometry::{BoundingBox, DisplaySize};
pub use lifecycle::ImageState;
pub use model::{Image, Label, Role, User};
pub use session::{AnnotationSession, Backend, InProcessBackend};
pub use store::{LabelStore, MemoryStore};
