//! Runtime configuration: defaults, then environment overrides.

use std::path::PathBuf;

use image::Rgb;
use image_engine::{EcLevel, RenderOptions};
use mailto_link::{EmailSpec, defaults};

use super::validation::{parse_color, parse_ec_level, validate_setting};
use crate::composer::{ComposerOptions, GenerateRequest, LogoSource};
use crate::error::ComposerError;

/// Prefix of the environment variables read by [`AppConfig::load`].
pub const ENV_PREFIX: &str = "EMAIL_QR_";

/// Keys accepted by [`AppConfig::set`], also the env variable suffixes.
pub const SETTING_KEYS: &[&str] = &[
    "RECIPIENT",
    "SUBJECT",
    "BODY",
    "LOGO",
    "OUTPUT",
    "EC_LEVEL",
    "MIN_VERSION",
    "MODULE_SIZE",
    "BORDER",
    "FILL_COLOR",
    "BACK_COLOR",
    "LOGO_RATIO",
];

pub const DEFAULT_OUTPUT: &str = "email_qr.png";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub logo_path: Option<PathBuf>,
    /// `None` only returns the image without saving it.
    pub output_path: Option<PathBuf>,
    pub ec_level: EcLevel,
    pub min_version: i16,
    pub module_size: u32,
    pub border: u32,
    pub fill_color: Rgb<u8>,
    pub back_color: Rgb<u8>,
    pub logo_ratio: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        let options = ComposerOptions::default();
        Self {
            recipient: defaults::RECIPIENT.into(),
            subject: defaults::SUBJECT.into(),
            body: defaults::BODY.into(),
            logo_path: None,
            output_path: Some(PathBuf::from(DEFAULT_OUTPUT)),
            ec_level: options.ec_level,
            min_version: options.min_version,
            module_size: options.render.module_size,
            border: options.render.border,
            fill_color: options.render.dark,
            back_color: options.render.light,
            logo_ratio: options.logo_ratio,
        }
    }
}

impl AppConfig {
    /// Defaults overridden by `EMAIL_QR_*` environment variables.
    pub fn load() -> Result<Self, ComposerError> {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides from `lookup`, called with the full variable name.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ComposerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        for key in SETTING_KEYS {
            let var = format!("{ENV_PREFIX}{key}");
            if let Some(value) = lookup(&var) {
                self.set(key, &value)
                    .map_err(|e| ComposerError::InvalidInput(format!("{var}: {e}")))?;
                tracing::debug!("Setting {key} taken from environment");
            }
        }
        Ok(())
    }

    /// Set one value by key after validating it.
    ///
    /// An empty `LOGO` or `OUTPUT` clears the path.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        validate_setting(key, value)?;
        match key {
            "RECIPIENT" => self.recipient = value.into(),
            "SUBJECT" => self.subject = value.into(),
            "BODY" => self.body = value.into(),
            "LOGO" => self.logo_path = non_empty_path(value),
            "OUTPUT" => self.output_path = non_empty_path(value),
            "EC_LEVEL" => self.ec_level = parse_ec_level(value)?,
            "MIN_VERSION" => self.min_version = parse_num(value)?,
            "MODULE_SIZE" => self.module_size = parse_num(value)?,
            "BORDER" => self.border = parse_num(value)?,
            "FILL_COLOR" => self.fill_color = parse_color(value)?,
            "BACK_COLOR" => self.back_color = parse_color(value)?,
            "LOGO_RATIO" => self.logo_ratio = parse_num(value)?,
            _ => return Err(format!("unknown setting key: {key}")),
        }
        Ok(())
    }

    pub fn options(&self) -> ComposerOptions {
        ComposerOptions {
            ec_level: self.ec_level,
            min_version: self.min_version,
            render: RenderOptions {
                module_size: self.module_size,
                border: self.border,
                dark: self.fill_color,
                light: self.back_color,
            },
            logo_ratio: self.logo_ratio,
        }
    }

    /// Build the generation request; fails on an invalid recipient.
    pub fn to_request(&self) -> Result<GenerateRequest, ComposerError> {
        let email = EmailSpec::new(&self.recipient, &self.subject, &self.body)?;
        let mut request = GenerateRequest::new(email).with_options(self.options());
        if let Some(logo) = &self.logo_path {
            request = request.with_logo(LogoSource::Path(logo.clone()));
        }
        request.output_path = self.output_path.clone();
        Ok(request)
    }
}

fn non_empty_path(value: &str) -> Option<PathBuf> {
    if value.is_empty() {
        None
    } else {
        Some(PathBuf::from(value))
    }
}

fn parse_num<T: std::str::FromStr>(value: &str) -> Result<T, String> {
    value.parse().map_err(|_| format!("invalid number '{value}'"))
}
