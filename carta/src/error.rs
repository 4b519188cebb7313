//! Error types used by the crate.

use carta_format::CartaFormatError;
use image::ImageError;
use thiserror::Error;

/// Carta error type.
#[derive(Debug, Error)]
pub enum CartaError {
    /// Error reading or writing a tile file.
    #[error("tile file error: {0}")]
    Format(#[from] CartaFormatError),
    /// Error decoding the OSM source.
    #[error("failed to decode map source: {0}")]
    Source(#[from] osmpbf::Error),
    /// Error encoding the output image.
    #[error("image error: {0}")]
    Image(#[from] ImageError),
    /// Color string is not `#RRGGBB` or `#RRGGBBAA`.
    #[error("invalid color: {0:?}")]
    InvalidColor(String),
    /// Error reading/writing data to the FS.
    #[error("i/o error: {0}")]
    FsIo(#[from] std::io::Error),
}
