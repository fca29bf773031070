//! Image utilities for printable QR codes.
//!
//! Provides QR symbol encoding and rasterisation, aspect-preserving logo
//! resizing, and centered logo compositing.

pub mod compose;
pub mod qr;
pub mod resize;

// Re-exports for convenience
pub use compose::{Region, overlay, overlay_centered};
pub use qr::{QrSymbol, RenderOptions, encode_symbol, read_modules, render_symbol, render_text};
pub use qrcode::EcLevel;
pub use resize::fit_within;

/// Highest normal QR version.
pub const MAX_VERSION: i16 = 40;

/// Largest accepted module side in pixels.
pub const MAX_MODULE_SIZE: u32 = 100;

/// Widest accepted quiet zone in modules.
pub const MAX_BORDER: u32 = 64;

/// Errors that can occur while producing a QR image.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Data too long for a QR code at error correction {ec_level:?} ({len} bytes)")]
    DataTooLong { len: usize, ec_level: EcLevel },

    #[error("Invalid QR version {0} (expected 1-40)")]
    InvalidVersion(i16),

    #[error("Rendered image too large: {modules} modules with border {border} at {module_size} px")]
    ImageTooLarge {
        modules: usize,
        module_size: u32,
        border: u32,
    },

    #[error("QR encode error: {0}")]
    Encode(String),
}

/// Result type alias for image-engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Share of codewords an error correction level can restore.
pub fn recovery_capacity(level: EcLevel) -> f32 {
    match level {
        EcLevel::L => 0.07,
        EcLevel::M => 0.15,
        EcLevel::Q => 0.25,
        EcLevel::H => 0.30,
    }
}
