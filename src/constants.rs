//! Global constants for the Spotter annotation core.

/// Minimum draft box size in display pixels, per dimension.
///
/// Boxes narrower or shorter than this are treated as accidental clicks
/// and rejected by the draft store.
pub const MIN_DRAFT_BOX_PX: f32 = 5.0;

/// Maximum number of images returned by a review listing.
///
/// There is no pagination cursor; images beyond this bound are simply
/// not shown. Admins narrow the result set by state instead.
pub const REVIEW_PAGE_SIZE: usize = 50;
