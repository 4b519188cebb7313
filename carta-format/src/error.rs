//! Error type of the tile file reader and writer.

use carta_types::error::CartaTypesError;
use thiserror::Error;

/// Errors of reading and writing tile files.
#[derive(Debug, Error)]
pub enum CartaFormatError {
    /// Writing the output failed. The partially written output is not a valid tile file.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The data being read is not a valid tile file.
    #[error("malformed tile file: {0}")]
    Malformed(String),

    /// Format version of the file is not supported by this reader.
    #[error("unsupported format version: {0}")]
    UnsupportedVersion(u64),

    /// Requested tile is not present in the file.
    #[error("tile {0} not found")]
    TileNotFound(u32),

    /// Too many items in a tile to be represented with the fixed width count fields.
    #[error("{0} overflows the tile block header")]
    Overflow(&'static str),
}

impl From<CartaTypesError> for CartaFormatError {
    fn from(value: CartaTypesError) -> Self {
        Self::Malformed(value.to_string())
    }
}
