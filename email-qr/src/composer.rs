//! QR composer: mailto link → QR raster → optional centered logo → output.

use std::borrow::Cow;
use std::path::PathBuf;

use image::{DynamicImage, ImageReader, RgbImage};
use image_engine::{
    EcLevel, MAX_BORDER, MAX_MODULE_SIZE, QrSymbol, Region, RenderOptions, encode_symbol,
    fit_within, overlay_centered, read_modules, recovery_capacity, render_symbol,
};
use mailto_link::{EmailSpec, MailtoUri};
use tracing::{debug, info, warn};

use crate::error::{ComposerError, Result};
use crate::output;

/// Largest logo box side as a share of the image side.
pub const MAX_LOGO_RATIO: f32 = 0.30;

/// Encoding and rendering parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComposerOptions {
    pub ec_level: EcLevel,
    /// Smallest QR version to use; larger versions are picked when the link
    /// does not fit.
    pub min_version: i16,
    pub render: RenderOptions,
    /// Logo box side as a share of the image side.
    pub logo_ratio: f32,
}

impl Default for ComposerOptions {
    fn default() -> Self {
        Self {
            ec_level: EcLevel::H,
            min_version: 6,
            render: RenderOptions::default(),
            logo_ratio: 0.25,
        }
    }
}

impl ComposerOptions {
    fn validate(&self, with_logo: bool) -> Result<()> {
        if !(1..=image_engine::MAX_VERSION).contains(&self.min_version) {
            return Err(ComposerError::InvalidInput(format!(
                "min version must be between 1 and {}, got {}",
                image_engine::MAX_VERSION,
                self.min_version
            )));
        }
        if !(1..=MAX_MODULE_SIZE).contains(&self.render.module_size) {
            return Err(ComposerError::InvalidInput(format!(
                "module size must be between 1 and {MAX_MODULE_SIZE} pixels, got {}",
                self.render.module_size
            )));
        }
        if self.render.border > MAX_BORDER {
            return Err(ComposerError::InvalidInput(format!(
                "border must be at most {MAX_BORDER} modules, got {}",
                self.render.border
            )));
        }
        if !(self.logo_ratio > 0.0 && self.logo_ratio <= MAX_LOGO_RATIO) {
            return Err(ComposerError::InvalidInput(format!(
                "logo ratio must be in (0, {MAX_LOGO_RATIO}], got {}",
                self.logo_ratio
            )));
        }
        if with_logo && self.ec_level < EcLevel::Q {
            return Err(ComposerError::InvalidInput(format!(
                "a logo needs error correction quartile or high, got {:?}",
                self.ec_level
            )));
        }
        Ok(())
    }
}

/// Where the logo comes from.
#[derive(Debug, Clone)]
pub enum LogoSource {
    Path(PathBuf),
    Image(DynamicImage),
}

impl LogoSource {
    fn load(&self) -> Result<Cow<'_, DynamicImage>> {
        match self {
            Self::Image(img) => Ok(Cow::Borrowed(img)),
            Self::Path(path) => {
                let read_err = |source| ComposerError::LogoRead {
                    path: path.clone(),
                    source,
                };
                let img = ImageReader::open(path)
                    .map_err(|e| read_err(image::ImageError::IoError(e)))?
                    .with_guessed_format()
                    .map_err(|e| read_err(image::ImageError::IoError(e)))?
                    .decode()
                    .map_err(read_err)?;
                debug!(path = %path.display(), width = img.width(), height = img.height(), "Loaded logo");
                Ok(Cow::Owned(img))
            }
        }
    }
}

/// Everything [`generate`] needs.
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    pub email: EmailSpec,
    pub logo: Option<LogoSource>,
    /// Persist the image here when set; otherwise it is only returned.
    pub output_path: Option<PathBuf>,
    pub options: ComposerOptions,
}

impl GenerateRequest {
    pub fn new(email: EmailSpec) -> Self {
        Self {
            email,
            ..Self::default()
        }
    }

    pub fn with_logo(mut self, logo: LogoSource) -> Self {
        self.logo = Some(logo);
        self
    }

    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    pub fn with_options(mut self, options: ComposerOptions) -> Self {
        self.options = options;
        self
    }
}

/// The generated QR code and how it was built.
#[derive(Debug)]
pub struct OutputArtifact {
    pub image: RgbImage,
    pub uri: MailtoUri,
    pub symbol: QrSymbol,
    /// Pixel area covered by the logo, if one was placed.
    pub logo_region: Option<Region>,
    /// Modules whose rendered color no longer matches the encoded matrix.
    pub damaged_modules: usize,
    pub path: Option<PathBuf>,
}

/// Build the QR code for `request`, persisting it when an output path is set.
///
/// Any failure aborts the whole operation; nothing is written unless every
/// step before the write succeeded.
pub fn generate(request: &GenerateRequest) -> Result<OutputArtifact> {
    let opts = &request.options;
    opts.validate(request.logo.is_some())?;
    if let Some(path) = &request.output_path {
        output::output_format(path)?;
    }

    let uri = request.email.to_uri();
    let symbol = encode_symbol(uri.as_str().as_bytes(), opts.ec_level, opts.min_version)?;
    let mut image = render_symbol(&symbol, &opts.render)?;

    let logo_region = match &request.logo {
        Some(source) => {
            let logo = source.load()?;
            Some(place_logo(&mut image, &symbol, &logo, opts)?)
        }
        None => None,
    };

    let damaged_modules = count_damaged(&image, &symbol, &opts.render);
    if damaged_modules > 0 {
        debug!(damaged_modules, "Modules altered by logo");
    }

    if let Some(path) = &request.output_path {
        output::save_image(&image, path)?;
    }

    info!(
        uri_len = uri.as_str().len(),
        version = symbol.version(),
        side = image.width(),
        logo = logo_region.is_some(),
        "QR code generated"
    );

    Ok(OutputArtifact {
        image,
        uri,
        symbol,
        logo_region,
        damaged_modules,
        path: request.output_path.clone(),
    })
}

fn place_logo(
    image: &mut RgbImage,
    symbol: &QrSymbol,
    logo: &DynamicImage,
    opts: &ComposerOptions,
) -> Result<Region> {
    let box_side = ((image.width() as f32 * opts.logo_ratio).floor() as u32).max(1);
    let fitted = fit_within(logo, box_side);
    let region = overlay_centered(image, &fitted, opts.render.light);

    let covered = symbol.modules_in(&region, &opts.render);
    let total = symbol.width() * symbol.width();
    let coverage = covered as f32 / total as f32;
    let budget = recovery_capacity(opts.ec_level);

    debug!(box_side, covered, total, coverage, budget, "Logo coverage");

    if coverage > budget {
        return Err(ComposerError::InvalidInput(format!(
            "logo covers {:.1}% of the modules, above the {:.0}% that {:?} error correction restores",
            coverage * 100.0,
            budget * 100.0,
            opts.ec_level
        )));
    }
    if coverage > budget * 0.75 {
        warn!(coverage, budget, "Logo is close to the error correction limit");
    }

    Ok(region)
}

fn count_damaged(image: &RgbImage, symbol: &QrSymbol, render: &RenderOptions) -> usize {
    read_modules(image, symbol.width(), render)
        .into_iter()
        .zip(symbol.modules())
        .filter(|(seen, encoded)| seen != encoded)
        .count()
}
