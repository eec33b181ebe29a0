//! Coordinate transforms from backend boxes to canvas pixels.
//!
//! Every output box is derived from the raw backend box. Scaling and the
//! preview divisor are never chained on the same box.

use crate::types::{BoundingBox, RawHighlightBox, RawHighlightPart};

/// Divisor applied to collection previews.
pub const PREVIEW_DIVISOR: u32 = 4;

/// Convert corner coordinates into `{x, y, width, height}`.
///
/// Inverted corners collapse to a zero extent.
pub fn to_box(ulx: u32, uly: u32, lrx: u32, lry: u32) -> BoundingBox {
    BoundingBox {
        x: ulx,
        y: uly,
        width: lrx.saturating_sub(ulx),
        height: lry.saturating_sub(uly),
    }
}

/// [`to_box`] over a raw backend box.
pub fn raw_to_box(raw: &RawHighlightBox) -> BoundingBox {
    to_box(raw.ulx, raw.uly, raw.lrx, raw.lry)
}

/// [`to_box`] over a raw highlight part.
pub fn part_to_box(part: &RawHighlightPart) -> BoundingBox {
    to_box(part.ulx, part.uly, part.lrx, part.lry)
}

/// Multiply every field by `scale`, truncating toward zero.
///
/// A scale of exactly `1.0` returns the box untouched. Non-positive scales
/// are the caller's problem.
pub fn apply_scale(bbox: BoundingBox, scale: f64) -> BoundingBox {
    if scale == 1.0 {
        return bbox;
    }
    // `as` truncates toward zero and saturates at the u32 bounds.
    let scaled = |v: u32| (f64::from(v) * scale) as u32;
    BoundingBox {
        x: scaled(bbox.x),
        y: scaled(bbox.y),
        width: scaled(bbox.width),
        height: scaled(bbox.height),
    }
}

/// Floor-divide every field by `divisor`.
pub fn apply_divisor(bbox: BoundingBox, divisor: u32) -> BoundingBox {
    BoundingBox {
        x: bbox.x / divisor,
        y: bbox.y / divisor,
        width: bbox.width / divisor,
        height: bbox.height / divisor,
    }
}
