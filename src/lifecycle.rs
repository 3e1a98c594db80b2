//! Image lifecycle state machine.
//!
//! Every image moves through `Unlabeled -> Annotated -> {Verified,
//! Rejected}`. The annotator side only ever triggers the first hop, as a
//! side effect of a successful label submission. Administrators hold a
//! blunter instrument: the review override may set any state from any
//! state, so `Verified` and `Rejected` are terminal only from the
//! annotator's perspective.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SpotterError;

/// Review progress of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ImageState {
    /// Eligible for annotator assignment; has zero or stale labels.
    #[default]
    Unlabeled,
    /// Carries labels from the most recent submission, awaiting review.
    Annotated,
    /// Accepted by an administrator.
    Verified,
    /// Declined by an administrator.
    Rejected,
}

impl ImageState {
    /// The wire name of this state.
    pub fn name(&self) -> &'static str {
        match self {
            ImageState::Unlabeled => "Unlabeled",
            ImageState::Annotated => "Annotated",
            ImageState::Verified => "Verified",
            ImageState::Rejected => "Rejected",
        }
    }

    /// All states, in lifecycle order.
    pub fn all() -> &'static [ImageState] {
        &[
            ImageState::Unlabeled,
            ImageState::Annotated,
            ImageState::Verified,
            ImageState::Rejected,
        ]
    }

    /// Whether an annotator may be handed this image as work.
    pub fn assignable(&self) -> bool {
        matches!(self, ImageState::Unlabeled)
    }

    /// The state an image enters when a label submission succeeds.
    ///
    /// This is the only transition the annotator path can cause; every
    /// other transition goes through the administrative override.
    pub fn after_submission() -> ImageState {
        ImageState::Annotated
    }
}

impl fmt::Display for ImageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ImageState {
    type Err = SpotterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Unlabeled" => Ok(ImageState::Unlabeled),
            "Annotated" => Ok(ImageState::Annotated),
            "Verified" => Ok(ImageState::Verified),
            "Rejected" => Ok(ImageState::Rejected),
            other => Err(SpotterError::InvalidState {
                name: other.to_string(),
            }),
        }
    }
}
