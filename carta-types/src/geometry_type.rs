//! See documentation for [`GeometryType`].
use serde::{Deserialize, Serialize};

use crate::error::CartaTypesError;
use crate::Coordinate;

/// The way the coordinate list of a feature is interpreted.
///
/// The discriminant is the byte stored in feature records of the tile file.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum GeometryType {
    /// Single position. Standalone nodes are always encoded as points.
    Point = 1,
    /// Open line through all the coordinates.
    Polyline = 2,
    /// Closed ring, the last coordinate repeats the first one.
    Polygon = 3,
}

impl GeometryType {
    /// Selects geometry type for a list of coordinates taken from a way: closed rings are
    /// polygons, everything else is a polyline.
    ///
    /// A single coordinate is considered a closed ring, as its first and last elements are the
    /// same.
    pub fn for_way(coordinates: &[Coordinate]) -> Self {
        match (coordinates.first(), coordinates.last()) {
            (Some(first), Some(last)) if first == last => GeometryType::Polygon,
            _ => GeometryType::Polyline,
        }
    }

    /// Byte representation of the type.
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for GeometryType {
    type Error = CartaTypesError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(GeometryType::Point),
            2 => Ok(GeometryType::Polyline),
            3 => Ok(GeometryType::Polygon),
            v => Err(CartaTypesError::UnknownGeometryType(v)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_ring_is_polygon() {
        let a = Coordinate::new(1.0, 2.0);
        let b = Coordinate::new(1.5, 2.0);
        let c = Coordinate::new(1.5, 2.5);

        assert_eq!(GeometryType::for_way(&[a, b, c, a]), GeometryType::Polygon);
        assert_eq!(GeometryType::for_way(&[a, b, c]), GeometryType::Polyline);
        assert_eq!(GeometryType::for_way(&[a, b]), GeometryType::Polyline);
    }

    #[test]
    fn byte_conversion() {
        for t in [
            GeometryType::Point,
            GeometryType::Polyline,
            GeometryType::Polygon,
        ] {
            assert_eq!(GeometryType::try_from(t.as_u8()), Ok(t));
        }

        assert_eq!(
            GeometryType::try_from(0),
            Err(CartaTypesError::UnknownGeometryType(0))
        );
    }
}
