use std::io::Write;
use std::path::Path;
use std::process::Command;

use crate::codec::{extension_for, save};
use crate::error::ImageError;
use crate::pixels::PixelBuffer;

/// Shows `image` with an external viewer program.
///
/// The image is written to a temporary file inside `dir`, which is removed
/// once the viewer exits.
pub fn display(image: &PixelBuffer, viewer: &str, dir: &Path) -> Result<(), ImageError> {
    let mut file = tempfile::Builder::new()
        .prefix("temporary")
        .suffix(&format!(".{}", extension_for(image.channel_count())))
        .tempfile_in(dir)?;
    file.write_all(save(image).as_bytes())?;
    file.flush()?;

    log::debug!("running {} on {}", viewer, file.path().display());
    let status = Command::new(viewer).arg(file.path()).status()?;
    if !status.success() {
        log::warn!("{} exited with {}", viewer, status);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_viewer_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let image = PixelBuffer::allocate(1, 1, 1, 255).unwrap();
        let result = display(&image, "pnmfilt-no-such-viewer", dir.path());
        assert!(matches!(result, Err(ImageError::Io(_))));
        // temporary file is gone either way
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_viewer_receives_file() {
        let dir = tempfile::tempdir().unwrap();
        let image = PixelBuffer::allocate(2, 2, 3, 255).unwrap();
        display(&image, "true", dir.path()).unwrap();
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
