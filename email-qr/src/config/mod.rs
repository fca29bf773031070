//! Configuration: defaults, `.env` + environment overrides, JSON config file,
//! and validation.

pub mod app_config;
pub mod file;
pub mod validation;

pub use app_config::AppConfig;
pub use file::ConfigFile;

/// Load `.env` from the first candidate path that exists.
pub fn load_dotenv() {
    let candidates = [".env", "../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::debug!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::debug!("No .env file found, using system environment variables");
}
