//! Image composition: placing a logo over the center of a QR image.

use image::{DynamicImage, Rgb, RgbImage, Rgba};
use tracing::debug;

/// Axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    /// Rectangle of `width` x `height` centered in a `outer_w` x `outer_h` canvas.
    pub fn centered(outer_w: u32, outer_h: u32, width: u32, height: u32) -> Self {
        Self {
            x: outer_w.saturating_sub(width) / 2,
            y: outer_h.saturating_sub(height) / 2,
            width: width.min(outer_w),
            height: height.min(outer_h),
        }
    }

    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }

    /// Whether this region overlaps the rectangle at (`x`, `y`) of size `w` x `h`.
    pub fn intersects(&self, x: u32, y: u32, w: u32, h: u32) -> bool {
        x < self.x + self.width && x + w > self.x && y < self.y + self.height && y + h > self.y
    }
}

/// Overlay `top` image onto `base` at the given position.
///
/// The `top` image is alpha-composited over the base; pixels falling outside
/// `base` are dropped.
pub fn overlay(base: &mut RgbImage, top: &DynamicImage, x: u32, y: u32) {
    let top_rgba = top.to_rgba8();
    for (dx, dy, pixel) in top_rgba.enumerate_pixels() {
        let target_x = x + dx;
        let target_y = y + dy;
        if target_x < base.width() && target_y < base.height() {
            let alpha = pixel[3] as f32 / 255.0;
            if alpha > 0.99 {
                base.put_pixel(target_x, target_y, Rgb([pixel[0], pixel[1], pixel[2]]));
            } else if alpha > 0.01 {
                let bg = base.get_pixel(target_x, target_y);
                let blended = blend_pixel(bg, pixel, alpha);
                base.put_pixel(target_x, target_y, blended);
            }
        }
    }
}

/// Place `logo` at the center of `base`.
///
/// The logo footprint is first filled with `backing` so the QR modules
/// underneath are fully replaced, then the logo is alpha-composited on top.
/// Returns the covered region.
pub fn overlay_centered(base: &mut RgbImage, logo: &DynamicImage, backing: Rgb<u8>) -> Region {
    let region = Region::centered(base.width(), base.height(), logo.width(), logo.height());

    debug!(
        x = region.x,
        y = region.y,
        width = region.width,
        height = region.height,
        "Compositing logo at center"
    );

    for py in region.y..region.y + region.height {
        for px in region.x..region.x + region.width {
            base.put_pixel(px, py, backing);
        }
    }
    overlay(base, logo, region.x, region.y);

    region
}

fn blend_pixel(bg: &Rgb<u8>, fg: &Rgba<u8>, alpha: f32) -> Rgb<u8> {
    let inv = 1.0 - alpha;
    Rgb([
        (fg[0] as f32 * alpha + bg[0] as f32 * inv) as u8,
        (fg[1] as f32 * alpha + bg[1] as f32 * inv) as u8,
        (fg[2] as f32 * alpha + bg[2] as f32 * inv) as u8,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

    #[test]
    fn centered_region_is_balanced() {
        let r = Region::centered(100, 100, 20, 10);
        assert_eq!(
            r,
            Region {
                x: 40,
                y: 45,
                width: 20,
                height: 10
            }
        );
        assert!(r.contains(40, 45));
        assert!(!r.contains(60, 45));
    }

    #[test]
    fn centered_region_clamps_oversized_content() {
        let r = Region::centered(10, 10, 30, 30);
        assert_eq!((r.x, r.y, r.width, r.height), (0, 0, 10, 10));
    }

    #[test]
    fn overlay_does_not_panic_on_out_of_bounds() {
        let mut base = RgbImage::new(100, 100);
        let top = DynamicImage::ImageRgba8(RgbaImage::new(50, 50));
        overlay(&mut base, &top, 80, 80); // partially out of bounds
    }

    #[test]
    fn overlay_blends_half_transparent_pixels() {
        let mut base = RgbImage::from_pixel(1, 1, Rgb([0, 0, 0]));
        let top = DynamicImage::ImageRgba8(RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 128])));
        overlay(&mut base, &top, 0, 0);
        let p = base.get_pixel(0, 0);
        assert!((120..=135).contains(&p[0]), "got {p:?}");
    }

    #[test]
    fn overlay_centered_replaces_modules_under_transparent_logo() {
        let mut base = RgbImage::from_pixel(30, 30, Rgb([0, 0, 255]));
        // Fully transparent logo with one opaque red pixel in its corner.
        let mut logo = RgbaImage::new(10, 10);
        logo.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        let region = overlay_centered(&mut base, &DynamicImage::ImageRgba8(logo), WHITE);

        assert_eq!((region.x, region.y), (10, 10));
        assert_eq!(*base.get_pixel(10, 10), Rgb([255, 0, 0]));
        assert_eq!(*base.get_pixel(15, 15), WHITE);
        // Outside the footprint stays untouched.
        assert_eq!(*base.get_pixel(9, 9), Rgb([0, 0, 255]));
        assert_eq!(*base.get_pixel(20, 20), Rgb([0, 0, 255]));
    }
}
