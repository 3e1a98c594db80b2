//! Display/canonical coordinate transforms.
//!
//! An image is annotated on a possibly-scaled on-screen rendering
//! ("display space") but its labels are stored against the image's true
//! pixel dimensions ("canonical space"). This module holds the pure
//! conversion math between the two, extracted for testability: display
//! dimensions are an explicit parameter of every call, never implicit
//! rendering state.

use serde::{Deserialize, Serialize};

use crate::error::SpotterError;

/// An axis-aligned bounding box in corner form.
///
/// `xmin`/`ymin` is the top-left corner, `xmax`/`ymax` the bottom-right.
/// The same type carries both display-space drafts and canonical-space
/// labels; which space a value lives in is determined by where it came
/// from, and the transforms below move between the two.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub xmin: f32,
    pub ymin: f32,
    pub xmax: f32,
    pub ymax: f32,
}

impl BoundingBox {
    pub fn new(xmin: f32, ymin: f32, xmax: f32, ymax: f32) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// Create a bounding box from two corner points in any order.
    pub fn from_corners(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            xmin: x1.min(x2),
            ymin: y1.min(y2),
            xmax: x1.max(x2),
            ymax: y1.max(y2),
        }
    }

    /// Width of the box.
    pub fn width(&self) -> f32 {
        self.xmax - self.xmin
    }

    /// Height of the box.
    pub fn height(&self) -> f32 {
        self.ymax - self.ymin
    }

    /// Area of the box.
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Whether all four coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.xmin.is_finite()
            && self.ymin.is_finite()
            && self.xmax.is_finite()
            && self.ymax.is_finite()
    }

    /// Whether both margins are strictly positive.
    ///
    /// Zero-area and inverted boxes fail this check.
    pub fn has_positive_area(&self) -> bool {
        self.xmax > self.xmin && self.ymax > self.ymin
    }

    /// Whether the box lies within `[0, width] x [0, height]`.
    pub fn within_bounds(&self, width: f32, height: f32) -> bool {
        self.xmin >= 0.0 && self.ymin >= 0.0 && self.xmax <= width && self.ymax <= height
    }
}

/// The rendered size of an image on screen, in display pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplaySize {
    pub width: f32,
    pub height: f32,
}

impl DisplaySize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether this size can serve as a transform denominator.
    ///
    /// A not-yet-rendered image reports zero dimensions; transforms must
    /// reject it rather than divide by zero.
    pub fn is_renderable(&self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }
}

/// Map a display-space box to canonical space.
///
/// Each coordinate is scaled by `canonical / displayed` along its axis
/// and rounded to the nearest integer. Whenever the input box lies
/// within `[0, displayed.width] x [0, displayed.height]`, the output
/// lies within `[0, canonical_width] x [0, canonical_height]` up to
/// rounding at the boundary.
pub fn to_canonical(
    bbox: BoundingBox,
    displayed: DisplaySize,
    canonical_width: u32,
    canonical_height: u32,
) -> Result<BoundingBox, SpotterError> {
    if !displayed.is_renderable() {
        return Err(SpotterError::DegenerateDisplay {
            width: displayed.width,
            height: displayed.height,
        });
    }

    let scale_x = canonical_width as f32 / displayed.width;
    let scale_y = canonical_height as f32 / displayed.height;

    Ok(BoundingBox {
        xmin: (bbox.xmin * scale_x).round(),
        ymin: (bbox.ymin * scale_y).round(),
        xmax: (bbox.xmax * scale_x).round(),
        ymax: (bbox.ymax * scale_y).round(),
    })
}

/// Map a canonical-space box to display space.
///
/// Used for overlay rendering (e.g. drawing saved labels on a resized
/// review image). Feeds a renderer rather than storage, so coordinates
/// are not rounded.
pub fn to_display(
    bbox: BoundingBox,
    displayed: DisplaySize,
    canonical_width: u32,
    canonical_height: u32,
) -> Result<BoundingBox, SpotterError> {
    if !displayed.is_renderable() {
        return Err(SpotterError::DegenerateDisplay {
            width: displayed.width,
            height: displayed.height,
        });
    }

    let scale_x = displayed.width / canonical_width as f32;
    let scale_y = displayed.height / canonical_height as f32;

    Ok(BoundingBox {
        xmin: bbox.xmin * scale_x,
        ymin: bbox.ymin * scale_y,
        xmax: bbox.xmax * scale_x,
        ymax: bbox.ymax * scale_y,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners_normalizes_order() {
        let a = BoundingBox::from_corners(50.0, 80.0, 10.0, 20.0);
        let b = BoundingBox::from_corners(10.0, 20.0, 50.0, 80.0);
        assert_eq!(a, b);
        assert_eq!(a.xmin, 10.0);
        assert_eq!(a.ymax, 80.0);
    }

    #[test]
    fn test_positive_area() {
        assert!(BoundingBox::new(0.0, 0.0, 10.0, 10.0).has_positive_area());
        assert!(!BoundingBox::new(10.0, 0.0, 10.0, 10.0).has_positive_area());
        assert!(!BoundingBox::new(20.0, 0.0, 10.0, 10.0).has_positive_area());
        assert!(!BoundingBox::new(0.0, 10.0, 10.0, 5.0).has_positive_area());
    }

    #[test]
    fn test_to_canonical_scales_and_rounds() {
        // 1000x800 image displayed at 500x400 is a 2x/2x scale-up.
        let displayed = DisplaySize::new(500.0, 400.0);
        let drawn = BoundingBox::new(10.0, 10.0, 60.0, 60.0);

        let canonical = to_canonical(drawn, displayed, 1000, 800).unwrap();
        assert_eq!(canonical, BoundingBox::new(20.0, 20.0, 120.0, 120.0));
    }

    #[test]
    fn test_to_canonical_stays_in_bounds_at_edges() {
        let displayed = DisplaySize::new(333.0, 214.0);
        let full = BoundingBox::new(0.0, 0.0, 333.0, 214.0);

        let canonical = to_canonical(full, displayed, 1024, 768).unwrap();
        assert!(canonical.within_bounds(1024.0, 768.0));
        assert_eq!(canonical.xmax, 1024.0);
        assert_eq!(canonical.ymax, 768.0);
    }

    #[test]
    fn test_to_canonical_rejects_degenerate_display() {
        let bbox = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let err = to_canonical(bbox, DisplaySize::new(0.0, 400.0), 1000, 800);
        assert!(matches!(
            err,
            Err(SpotterError::DegenerateDisplay { .. })
        ));
    }

    #[test]
    fn test_to_display_inverse_scale() {
        let displayed = DisplaySize::new(500.0, 400.0);
        let label = BoundingBox::new(20.0, 20.0, 120.0, 120.0);

        let shown = to_display(label, displayed, 1000, 800).unwrap();
        assert_eq!(shown, BoundingBox::new(10.0, 10.0, 60.0, 60.0));
    }

    #[test]
    fn test_round_trip_within_one_unit() {
        // Canonical -> display -> canonical recovers the original box up
        // to one unit per coordinate, across uneven scale factors.
        let cases = [
            (640_u32, 480_u32, 800.0_f32, 600.0_f32),
            (1920, 1080, 433.0, 243.0),
            (333, 777, 1000.0, 1000.0),
            (1024, 768, 1024.0, 768.0),
        ];

        for (cw, ch, dw, dh) in cases {
            let displayed = DisplaySize::new(dw, dh);
            let original = BoundingBox::new(
                (cw as f32 * 0.1).round(),
                (ch as f32 * 0.2).round(),
                (cw as f32 * 0.7).round(),
                (ch as f32 * 0.9).round(),
            );

            let shown = to_display(original, displayed, cw, ch).unwrap();
            let back = to_canonical(shown, displayed, cw, ch).unwrap();

            assert!((back.xmin - original.xmin).abs() <= 1.0);
            assert!((back.ymin - original.ymin).abs() <= 1.0);
            assert!((back.xmax - original.xmax).abs() <= 1.0);
            assert!((back.ymax - original.ymax).abs() <= 1.0);
        }
    }
}
