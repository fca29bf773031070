//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use image::Rgb;
use image_engine::{EcLevel, MAX_BORDER, MAX_MODULE_SIZE};

use crate::config::AppConfig;
use crate::config::validation::parse_color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EcLevelArg {
    Low,
    Medium,
    Quartile,
    High,
}

impl From<EcLevelArg> for EcLevel {
    fn from(arg: EcLevelArg) -> Self {
        match arg {
            EcLevelArg::Low => EcLevel::L,
            EcLevelArg::Medium => EcLevel::M,
            EcLevelArg::Quartile => EcLevel::Q,
            EcLevelArg::High => EcLevel::H,
        }
    }
}

/// Generate a QR code that opens a pre-filled email.
///
/// Every option is optional: unset values come from the config file, then
/// `EMAIL_QR_*` environment variables, then the French recruitment defaults.
#[derive(Debug, Parser)]
#[command(name = "email-qr", version)]
pub struct Cli {
    /// Recipient email address
    #[arg(short, long)]
    pub email: Option<String>,

    /// Subject of the email
    #[arg(short, long)]
    pub subject: Option<String>,

    /// Email body (default: French recruitment text)
    #[arg(short, long)]
    pub body: Option<String>,

    /// Logo image (PNG or JPEG) placed at the center of the code
    #[arg(short, long)]
    pub logo: Option<PathBuf>,

    /// Output image path (default: email_qr.png)
    #[arg(short, long, conflicts_with = "no_save")]
    pub output: Option<PathBuf>,

    /// Do not write the image to disk
    #[arg(long)]
    pub no_save: bool,

    /// Error correction level
    #[arg(long, value_enum)]
    pub ec_level: Option<EcLevelArg>,

    /// Smallest QR version; larger versions are used when the link does not fit
    #[arg(long, value_parser = clap::value_parser!(i16).range(1..=40))]
    pub min_version: Option<i16>,

    /// Pixels per QR module
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_MODULE_SIZE)))]
    pub module_size: Option<u32>,

    /// Quiet zone width in modules
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=i64::from(MAX_BORDER)))]
    pub border: Option<u32>,

    /// Module color (#rrggbb or name)
    #[arg(long, value_parser = parse_color)]
    pub fill_color: Option<Rgb<u8>>,

    /// Background color (#rrggbb or name)
    #[arg(long, value_parser = parse_color)]
    pub back_color: Option<Rgb<u8>>,

    /// Logo box side as a share of the image side, at most 0.3
    #[arg(long)]
    pub logo_ratio: Option<f32>,

    /// Print the QR code to the terminal
    #[arg(long)]
    pub preview: bool,

    /// JSON config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Override `config` with every flag given on the command line.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(v) = &self.email {
            config.recipient = v.clone();
        }
        if let Some(v) = &self.subject {
            config.subject = v.clone();
        }
        if let Some(v) = &self.body {
            config.body = v.clone();
        }
        if let Some(v) = &self.logo {
            config.logo_path = Some(v.clone());
        }
        if let Some(v) = &self.output {
            config.output_path = Some(v.clone());
        }
        if self.no_save {
            config.output_path = None;
        }
        if let Some(v) = self.ec_level {
            config.ec_level = v.into();
        }
        if let Some(v) = self.min_version {
            config.min_version = v;
        }
        if let Some(v) = self.module_size {
            config.module_size = v;
        }
        if let Some(v) = self.border {
            config.border = v;
        }
        if let Some(v) = self.fill_color {
            config.fill_color = v;
        }
        if let Some(v) = self.back_color {
            config.back_color = v;
        }
        if let Some(v) = self.logo_ratio {
            config.logo_ratio = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_flags_keep_config() {
        let cli = Cli::try_parse_from(["email-qr"]).unwrap();
        let mut config = AppConfig::default();
        cli.apply(&mut config);
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from([
            "email-qr",
            "--email",
            "etude@example.com",
            "-s",
            "Participation",
            "--logo",
            "logo.png",
            "--ec-level",
            "quartile",
            "--fill-color",
            "#112233",
            "--no-save",
        ])
        .unwrap();
        let mut config = AppConfig::default();
        cli.apply(&mut config);

        assert_eq!(config.recipient, "etude@example.com");
        assert_eq!(config.subject, "Participation");
        assert_eq!(config.logo_path, Some(PathBuf::from("logo.png")));
        assert_eq!(config.ec_level, EcLevel::Q);
        assert_eq!(config.fill_color, Rgb([0x11, 0x22, 0x33]));
        assert_eq!(config.output_path, None);
    }

    #[test]
    fn rejects_out_of_range_version() {
        assert!(Cli::try_parse_from(["email-qr", "--min-version", "41"]).is_err());
    }

    #[test]
    fn rejects_oversized_render_options() {
        assert!(Cli::try_parse_from(["email-qr", "--module-size", "101"]).is_err());
        assert!(Cli::try_parse_from(["email-qr", "--border", "65"]).is_err());
        assert!(Cli::try_parse_from(["email-qr", "--module-size", "100", "--border", "64"]).is_ok());
    }

    #[test]
    fn output_conflicts_with_no_save() {
        assert!(Cli::try_parse_from(["email-qr", "-o", "a.png", "--no-save"]).is_err());
    }

    #[test]
    fn rejects_bad_color() {
        assert!(Cli::try_parse_from(["email-qr", "--back-color", "#zz0000"]).is_err());
    }
}
