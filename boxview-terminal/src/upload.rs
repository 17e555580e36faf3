/// Dieline upload: accepts PNG files only and decodes them for the texture binder
use image::{DynamicImage, ImageFormat};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("unsupported image format: only PNG dielines are accepted")]
    UnsupportedFormat,

    #[error("failed to decode PNG: {0}")]
    Decode(#[from] image::ImageError),
}

/// Decode an in-memory dieline, rejecting anything that is not a PNG
pub fn decode_dieline(bytes: &[u8]) -> Result<DynamicImage, UploadError> {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Png) => {}
        _ => return Err(UploadError::UnsupportedFormat),
    }
    Ok(image::load_from_memory_with_format(bytes, ImageFormat::Png)?)
}

/// Read and decode a dieline file
pub fn load_dieline(path: &Path) -> Result<Arc<DynamicImage>, UploadError> {
    let bytes = std::fs::read(path).map_err(|source| UploadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let image = decode_dieline(&bytes)?;
    info!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "dieline loaded"
    );
    Ok(Arc::new(image))
}
