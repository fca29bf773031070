//! Logo resizing.
//!
//! Fits logos into a square box with Lanczos3 filtering, keeping the aspect
//! ratio.

use image::DynamicImage;
use image::imageops::FilterType;
use tracing::debug;

/// Resize an image so its longer side equals `max_side`, keeping its aspect
/// ratio. The source image is left untouched.
pub fn fit_within(img: &DynamicImage, max_side: u32) -> DynamicImage {
    let max_side = max_side.max(1);
    let (orig_w, orig_h) = (img.width(), img.height());

    if orig_w.max(orig_h) == max_side {
        debug!(max_side, "Logo already fits, skipping resize");
        return img.clone();
    }

    let fitted = img.resize(max_side, max_side, FilterType::Lanczos3);
    debug!(
        orig_w,
        orig_h,
        new_width = fitted.width(),
        new_height = fitted.height(),
        "Resized logo"
    );
    fitted
}
