//! JSON configuration file.
//!
//! Field names follow the callable interface:
//!
//! ```json
//! {
//!   "recipient": "etude@example.com",
//!   "subject": "Participation",
//!   "body": "Bonjour",
//!   "logo_path": "logo.png",
//!   "output_path": "out/email_qr.png",
//!   "ec_level": "high",
//!   "logo_ratio": 0.25
//! }
//! ```

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use super::AppConfig;
use crate::error::ComposerError;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub recipient: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
    pub logo_path: Option<String>,
    pub output_path: Option<String>,
    pub ec_level: Option<String>,
    pub min_version: Option<i16>,
    pub module_size: Option<u32>,
    pub border: Option<u32>,
    pub fill_color: Option<String>,
    pub back_color: Option<String>,
    pub logo_ratio: Option<f32>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Apply every field present in the file on top of `config`.
    pub fn apply(&self, config: &mut AppConfig) -> Result<(), ComposerError> {
        let values = [
            ("RECIPIENT", self.recipient.clone()),
            ("SUBJECT", self.subject.clone()),
            ("BODY", self.body.clone()),
            ("LOGO", self.logo_path.clone()),
            ("OUTPUT", self.output_path.clone()),
            ("EC_LEVEL", self.ec_level.clone()),
            ("MIN_VERSION", self.min_version.map(|v| v.to_string())),
            ("MODULE_SIZE", self.module_size.map(|v| v.to_string())),
            ("BORDER", self.border.map(|v| v.to_string())),
            ("FILL_COLOR", self.fill_color.clone()),
            ("BACK_COLOR", self.back_color.clone()),
            ("LOGO_RATIO", self.logo_ratio.map(|v| v.to_string())),
        ];
        for (key, value) in values {
            if let Some(value) = value {
                config
                    .set(key, &value)
                    .map_err(|e| ComposerError::InvalidInput(format!("config {key}: {e}")))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use image_engine::EcLevel;
    use tempfile::TempDir;

    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn load_and_apply() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("email-qr.json");
        std::fs::write(
            &path,
            r#"{
                "recipient": "etude@example.com",
                "subject": "Participation",
                "body": "Bonjour, je souhaite participer.",
                "logo_path": "logo.png",
                "ec_level": "quartile",
                "logo_ratio": 0.2
            }"#,
        )
        .unwrap();

        let file = ConfigFile::load(&path).unwrap();
        let mut config = AppConfig::default();
        file.apply(&mut config).unwrap();

        assert_eq!(config.subject, "Participation");
        assert_eq!(config.logo_path, Some(PathBuf::from("logo.png")));
        assert_eq!(config.ec_level, EcLevel::Q);
        assert!((config.logo_ratio - 0.2).abs() < f32::EPSILON);
        // Absent fields keep their previous value.
        assert_eq!(config.output_path, AppConfig::default().output_path);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"email": "a@b.fr"}"#).unwrap();
        assert!(ConfigFile::load(&path).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(ConfigFile::load(Path::new("/nonexistent/email-qr.json")).is_err());
    }

    #[test]
    fn invalid_value_is_invalid_input() {
        let file = ConfigFile {
            fill_color: Some("not-a-color".into()),
            ..ConfigFile::default()
        };
        let err = file.apply(&mut AppConfig::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
