//! Persisting the generated image.
//!
//! The image is encoded into a temporary file next to the destination and
//! renamed into place only once fully flushed, so a failed write never leaves
//! a truncated artifact behind.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::{ImageFormat, RgbImage};
use tempfile::Builder;
use tracing::{debug, info};

use crate::error::{ComposerError, Result};

/// Pick the output format from the file extension.
pub fn output_format(path: &Path) -> Result<ImageFormat> {
    let format = ImageFormat::from_path(path).map_err(|_| {
        ComposerError::InvalidInput(format!(
            "unsupported output extension for {}",
            path.display()
        ))
    })?;
    if !format.writing_enabled() {
        return Err(ComposerError::InvalidInput(format!(
            "writing {format:?} images is not supported ({})",
            path.display()
        )));
    }
    Ok(format)
}

/// Write `image` to `path`, creating parent directories as needed.
pub fn save_image(image: &RgbImage, path: &Path) -> Result<()> {
    let format = output_format(path)?;
    let write_err = |source| ComposerError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(write_err)?;

    // Same mode as a plain create so the umask decides who can read it.
    #[cfg_attr(not(unix), allow(unused_mut))]
    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let mut tmp = builder.tempfile_in(dir).map_err(write_err)?;
    debug!(tmp = %tmp.path().display(), ?format, "Encoding image");

    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        image
            .write_to(&mut writer, format)
            .map_err(|source| ComposerError::ImageEncode {
                path: path.to_path_buf(),
                source,
            })?;
        writer.flush().map_err(write_err)?;
    }
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    info!(path = %path.display(), "QR code saved");
    Ok(())
}
