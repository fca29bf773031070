//! Pre-filled email QR codes.
//!
//! Builds a `mailto:` link, encodes it as a QR code with high error
//! correction, optionally stamps a logo in the middle, and saves the image.

pub mod cli;
pub mod composer;
pub mod config;
pub mod error;
pub mod output;

pub use composer::{ComposerOptions, GenerateRequest, LogoSource, OutputArtifact, generate};
pub use error::{ComposerError, ErrorKind};

use tracing::info;

use cli::Cli;
use config::{AppConfig, ConfigFile};

/// Resolve configuration from every layer and generate the QR code.
///
/// Precedence: command-line flags, config file, `EMAIL_QR_*` environment,
/// defaults.
pub fn run(cli: &Cli) -> anyhow::Result<OutputArtifact> {
    config::load_dotenv();

    let mut config = AppConfig::load()?;
    if let Some(path) = &cli.config {
        ConfigFile::load(path)?.apply(&mut config)?;
        info!("Loaded config file {}", path.display());
    }
    cli.apply(&mut config);

    let request = config.to_request()?;
    let artifact = generate(&request)?;

    if cli.preview {
        println!("{}", image_engine::render_text(&artifact.symbol));
    }
    println!("{}", artifact.uri);
    match &artifact.path {
        Some(path) => info!("QR code saved as {}", path.display()),
        None => info!("QR code not saved"),
    }

    Ok(artifact)
}

/// Process exit code for an error returned by [`run`].
pub fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<ComposerError>()
        .map_or(1, |e| e.kind().exit_code())
}
