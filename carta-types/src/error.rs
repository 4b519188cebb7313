//! Error type used by the crate.

use thiserror::Error;

/// Error enum.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CartaTypesError {
    /// Byte value does not correspond to any geometry type.
    #[error("unknown geometry type code: {0}")]
    UnknownGeometryType(u8),
}
