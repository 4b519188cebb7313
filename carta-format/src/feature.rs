use carta_types::{Coordinate, GeometryType};
use serde::{Deserialize, Serialize};

use crate::PropEnum;

/// Feature built by the writer for one tile, before it is serialized.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureData {
    /// Id of the feature, unique and increasing across the whole file.
    pub id: u64,
    /// Geometry type.
    pub geometry_type: GeometryType,
    /// Coordinates of the feature that belong to the tile.
    pub coordinates: Vec<Coordinate>,
    /// Property codes.
    pub properties: Vec<PropEnum>,
    /// Position of the property slot holding the name of the feature.
    pub label_offset: Option<i32>,
}

/// Feature read back from a tile file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapFeatureData {
    /// Id of the feature.
    pub id: u64,
    /// Label offset as stored in the feature record.
    pub label_offset: Option<i32>,
    /// Geometry type.
    pub geometry_type: GeometryType,
    /// Coordinates of the feature.
    pub coordinates: Vec<Coordinate>,
    /// Property codes in the order they were encoded.
    pub properties: Vec<PropEnum>,
}

impl MapFeatureData {
    /// Returns true if the feature has the given property.
    pub fn has_property(&self, property: PropEnum) -> bool {
        self.properties.contains(&property)
    }
}
