//! QR code encoding and rasterisation.

use std::fmt;

use image::{Rgb, RgbImage};
use qrcode::render::unicode;
use qrcode::types::QrError;
use qrcode::{Color, EcLevel, QrCode, Version};
use tracing::{debug, info};

use crate::compose::Region;
use crate::{EngineError, MAX_VERSION, Result};

/// An encoded QR symbol: the module matrix plus the version and level chosen.
pub struct QrSymbol {
    code: QrCode,
}

impl fmt::Debug for QrSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QrSymbol")
            .field("version", &self.version())
            .field("ec_level", &self.ec_level())
            .field("width", &self.width())
            .finish()
    }
}

impl QrSymbol {
    /// Number of modules per side.
    pub fn width(&self) -> usize {
        self.code.width()
    }

    pub fn version(&self) -> i16 {
        match self.code.version() {
            Version::Normal(v) | Version::Micro(v) => v,
        }
    }

    pub fn ec_level(&self) -> EcLevel {
        self.code.error_correction_level()
    }

    /// Row-major module colors, `true` for dark.
    pub fn modules(&self) -> Vec<bool> {
        self.code
            .to_colors()
            .into_iter()
            .map(|c| c == Color::Dark)
            .collect()
    }

    /// Count modules whose rendered square intersects `region`.
    pub fn modules_in(&self, region: &Region, opts: &RenderOptions) -> usize {
        let width = self.width() as u32;
        let ms = opts.module_size;
        let mut count = 0;
        for y in 0..width {
            for x in 0..width {
                let px = (opts.border + x) * ms;
                let py = (opts.border + y) * ms;
                if region.intersects(px, py, ms, ms) {
                    count += 1;
                }
            }
        }
        count
    }
}

/// Raster layout and colors for [`render_symbol`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Pixels per module side.
    pub module_size: u32,
    /// Quiet zone width in modules.
    pub border: u32,
    pub dark: Rgb<u8>,
    pub light: Rgb<u8>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            module_size: 10,
            border: 4,
            dark: Rgb([0, 0, 255]),
            light: Rgb([255, 255, 255]),
        }
    }
}

impl RenderOptions {
    /// Side length in pixels of a rendered symbol of `width` modules, or
    /// `None` when it does not fit in a `u32`.
    pub fn image_side(&self, width: usize) -> Option<u32> {
        u32::try_from(width)
            .ok()?
            .checked_add(self.border.checked_mul(2)?)?
            .checked_mul(self.module_size)
    }
}

/// Encode `data` at `ec_level` using the smallest version `>= min_version`
/// that holds it.
pub fn encode_symbol(data: &[u8], ec_level: EcLevel, min_version: i16) -> Result<QrSymbol> {
    if !(1..=MAX_VERSION).contains(&min_version) {
        return Err(EngineError::InvalidVersion(min_version));
    }

    for version in min_version..=MAX_VERSION {
        match QrCode::with_version(data, Version::Normal(version), ec_level) {
            Ok(code) => {
                info!(
                    version,
                    ?ec_level,
                    width = code.width(),
                    len = data.len(),
                    "Encoded QR symbol"
                );
                return Ok(QrSymbol { code });
            }
            Err(QrError::DataTooLong) => continue,
            Err(e) => return Err(EngineError::Encode(e.to_string())),
        }
    }

    Err(EngineError::DataTooLong {
        len: data.len(),
        ec_level,
    })
}

/// Rasterise a symbol with its quiet zone.
pub fn render_symbol(symbol: &QrSymbol, opts: &RenderOptions) -> Result<RgbImage> {
    let module_count = symbol.width() as u32;
    let scale = opts.module_size.max(1);
    let img_size = opts
        .image_side(symbol.width())
        .ok_or(EngineError::ImageTooLarge {
            modules: symbol.width(),
            module_size: opts.module_size,
            border: opts.border,
        })?;

    debug!(module_count, scale, img_size, "Rendering QR symbol");

    let mut img = RgbImage::from_pixel(img_size, img_size, opts.light);

    for (i, dark) in symbol.modules().into_iter().enumerate() {
        if !dark {
            continue;
        }
        let x = (i as u32) % module_count + opts.border;
        let y = (i as u32) / module_count + opts.border;
        for dx in 0..scale {
            for dy in 0..scale {
                img.put_pixel(x * scale + dx, y * scale + dy, opts.dark);
            }
        }
    }

    Ok(img)
}

/// Read the module matrix back from a rendered image.
///
/// Each module is classified by the color at its center: whichever of
/// `opts.dark` / `opts.light` is closer wins.
pub fn read_modules(img: &RgbImage, width: usize, opts: &RenderOptions) -> Vec<bool> {
    let ms = opts.module_size.max(1);
    let mut modules = Vec::with_capacity(width * width);
    for y in 0..width as u32 {
        for x in 0..width as u32 {
            let cx = (opts.border + x) * ms + ms / 2;
            let cy = (opts.border + y) * ms + ms / 2;
            let pixel = img.get_pixel(cx, cy);
            modules.push(distance(pixel, &opts.dark) < distance(pixel, &opts.light));
        }
    }
    modules
}

/// Compact terminal rendering using half-block characters.
pub fn render_text(symbol: &QrSymbol) -> String {
    symbol
        .code
        .render::<unicode::Dense1x2>()
        .dark_color(unicode::Dense1x2::Light)
        .light_color(unicode::Dense1x2::Dark)
        .build()
}

fn distance(a: &Rgb<u8>, b: &Rgb<u8>) -> u32 {
    a.0.iter()
        .zip(b.0.iter())
        .map(|(&p, &q)| {
            let d = i32::from(p) - i32::from(q);
            (d * d) as u32
        })
        .sum()
}
