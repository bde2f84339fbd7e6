//! Aspect-preserving image placement.
//!
//! Pixel dimensions are converted to inches with the image's DPI, shrunk to
//! fit the bounding box along the constraining axis, floored at a minimum
//! rendered size, and centered.

use crate::types::{ImageBox, PixelSize, Rect};

/// DPI assumed when the image carries none.
pub const DEFAULT_DPI: f64 = 96.0;

/// Smallest rendered width or height, in inches.
pub const DEFAULT_MIN_IMAGE_SIZE: f64 = 1.0;

/// Resolve a usable DPI, falling back to [`DEFAULT_DPI`] for missing, zero,
/// negative or non-finite values.
pub fn effective_dpi(dpi: Option<f64>) -> f64 {
    match dpi {
        Some(d) if d.is_finite() && d > 0.0 => d,
        _ => DEFAULT_DPI,
    }
}

/// Place an image of `pixels` inside `bounds`.
///
/// Returns `None` when the geometry is degenerate (zero-sized image or
/// non-positive box), in which case the slide is built without the image.
///
/// The result never drops below `min_size` in either dimension, even when
/// that makes it overflow `bounds` along the other axis.
pub fn autofit(pixels: PixelSize, dpi: Option<f64>, bounds: Rect, min_size: f64) -> Option<ImageBox> {
    if pixels.width == 0 || pixels.height == 0 {
        return None;
    }
    if !(bounds.width > 0.0 && bounds.height > 0.0) {
        return None;
    }

    let dpi = effective_dpi(dpi);
    let image_width = f64::from(pixels.width) / dpi;
    let image_height = f64::from(pixels.height) / dpi;

    let box_aspect = bounds.width / bounds.height;
    let image_aspect = image_width / image_height;

    let (width, height) = if image_aspect > box_aspect {
        let mut width = bounds.width.min(image_width).max(min_size);
        let mut height = width / image_aspect;
        if height < min_size {
            height = min_size;
            width = height * image_aspect;
        }
        (width, height)
    } else {
        let mut height = bounds.height.min(image_height).max(min_size);
        let mut width = height * image_aspect;
        if width < min_size {
            width = min_size;
            height = width / image_aspect;
        }
        (width, height)
    };

    Some(ImageBox {
        width,
        height,
        left: bounds.left + ((bounds.width - width) / 2.0).max(0.0),
        top: bounds.top + ((bounds.height - height) / 2.0).max(0.0),
    })
}
