//! Classification of map features into drawable shapes.

use carta_format::{MapFeatureData, PropEnum};
use carta_types::{GeometryType, Point2d, Projection, Rect, WebMercator};
use serde::{Deserialize, Serialize};

use crate::render::ShapeQueue;

/// Kind of an area feature.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeoFeatureKind {
    /// Grassland, farmland and other open areas.
    Plain,
    /// Woods and orchards.
    Forest,
    /// Bare rock and scree.
    Mountains,
    /// Sand and beaches.
    Desert,
    /// Lakes and reservoirs.
    Water,
    /// Built-up areas.
    Residential,
    /// Natural area of unknown type.
    Unknown,
}

/// What a feature is drawn as.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    /// Major road.
    Road,
    /// River, stream or other water line.
    Waterway,
    /// Country border.
    Border,
    /// City, town or smaller settlement.
    PopulatedPlace,
    /// Railway line.
    Railway,
    /// Area feature.
    GeoFeature(GeoFeatureKind),
}

impl ShapeKind {
    /// Drawing order of the shape. Shapes with lower index are drawn first.
    pub fn z_index(&self) -> i32 {
        match self {
            ShapeKind::GeoFeature(kind) => match kind {
                GeoFeatureKind::Plain
                | GeoFeatureKind::Desert
                | GeoFeatureKind::Mountains
                | GeoFeatureKind::Unknown => 10,
                GeoFeatureKind::Forest => 11,
                GeoFeatureKind::Residential => 12,
                GeoFeatureKind::Water => 13,
            },
            ShapeKind::Railway => 15,
            ShapeKind::Waterway => 16,
            ShapeKind::Road => 20,
            ShapeKind::Border => 30,
            ShapeKind::PopulatedPlace => 40,
        }
    }
}

/// Classified feature with its points in projected space.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    /// Kind of the shape.
    pub kind: ShapeKind,
    /// Geometry type of the source feature.
    pub geometry_type: GeometryType,
    /// Projected points.
    pub points: Vec<Point2d>,
}

impl Shape {
    /// Bounding rectangle of the shape points.
    pub fn bounding_rect(&self) -> Option<Rect> {
        Rect::from_points(self.points.iter())
    }
}

/// Decides what the feature should be drawn as and returns the shape kind with its z-index.
///
/// Properties are checked one by one in the order they are stored. When several properties
/// produce a shape kind, the last one wins.
pub fn classify(feature: &MapFeatureData) -> Option<(ShapeKind, i32)> {
    let mut result = None;
    for property in &feature.properties {
        if let Some(kind) = classify_property(feature, *property) {
            result = Some(kind);
        }
    }

    result.map(|kind| (kind, kind.z_index()))
}

fn classify_property(feature: &MapFeatureData, property: PropEnum) -> Option<ShapeKind> {
    use PropEnum as P;

    let is_polygon = feature.geometry_type == GeometryType::Polygon;

    if property.is_between(P::HighwayMotorway, P::HighwayRoad) {
        Some(ShapeKind::Road)
    } else if matches!(property, P::Water | P::Waterway) {
        Some(ShapeKind::Waterway)
    } else if property == P::BoundaryAdministrative && feature.has_property(P::AdminLevel2) {
        Some(ShapeKind::Border)
    } else if matches!(
        property,
        P::PlaceCity | P::PlaceTown | P::PlaceLocality | P::PlaceHamlet
    ) && feature.geometry_type == GeometryType::Point
    {
        Some(ShapeKind::PopulatedPlace)
    } else if property == P::Railway {
        Some(ShapeKind::Railway)
    } else if is_polygon && property.is_between(P::Natural, P::NaturalWater) {
        Some(ShapeKind::GeoFeature(natural_kind(property)))
    } else if matches!(property, P::BoundaryForest | P::LanduseForest | P::LanduseOrchard) {
        Some(ShapeKind::GeoFeature(GeoFeatureKind::Forest))
    } else if is_polygon && property.is_between(P::LanduseResidential, P::LanduseBrownfield) {
        Some(ShapeKind::GeoFeature(GeoFeatureKind::Residential))
    } else if is_polygon && property.is_between(P::LanduseFarm, P::LanduseAllotments) {
        Some(ShapeKind::GeoFeature(GeoFeatureKind::Plain))
    } else if is_polygon && matches!(property, P::LanduseReservoir | P::LanduseBasin) {
        Some(ShapeKind::GeoFeature(GeoFeatureKind::Water))
    } else if is_polygon && matches!(property, P::Building | P::Leisure | P::Amenity) {
        Some(ShapeKind::GeoFeature(GeoFeatureKind::Residential))
    } else {
        None
    }
}

fn natural_kind(property: PropEnum) -> GeoFeatureKind {
    use PropEnum as P;

    match property {
        P::NaturalFell
        | P::NaturalGrassland
        | P::NaturalHeath
        | P::NaturalMoor
        | P::NaturalScrub
        | P::NaturalWetland => GeoFeatureKind::Plain,
        P::NaturalWood | P::NaturalTreeRow => GeoFeatureKind::Forest,
        P::NaturalBareRock | P::NaturalRock | P::NaturalScree => GeoFeatureKind::Mountains,
        P::NaturalBeach | P::NaturalSand => GeoFeatureKind::Desert,
        P::NaturalWater => GeoFeatureKind::Water,
        _ => GeoFeatureKind::Unknown,
    }
}

/// Collects classified shapes of features into a render queue and tracks their bounds.
pub struct Tessellator<P = WebMercator> {
    projection: P,
    queue: ShapeQueue,
    bbox: Option<Rect>,
}

impl Default for Tessellator {
    fn default() -> Self {
        Self::new(WebMercator::default())
    }
}

impl<P: Projection> Tessellator<P> {
    /// Creates an empty tessellator projecting coordinates with the given projection.
    pub fn new(projection: P) -> Self {
        Self {
            projection,
            queue: ShapeQueue::new(),
            bbox: None,
        }
    }

    /// Classifies the feature and adds its shape to the queue. Returns false if the feature is
    /// not drawn.
    pub fn tessellate(&mut self, feature: &MapFeatureData) -> bool {
        let Some((kind, z_index)) = classify(feature) else {
            return false;
        };

        let points: Vec<Point2d> = feature
            .coordinates
            .iter()
            .filter_map(|c| self.projection.project(c))
            .collect();
        if points.len() < feature.coordinates.len() {
            log::trace!(
                "Feature {} has {} coordinates outside of the projection",
                feature.id,
                feature.coordinates.len() - points.len()
            );
        }

        let shape = Shape {
            kind,
            geometry_type: feature.geometry_type,
            points,
        };

        if let Some(shape_bbox) = shape.bounding_rect() {
            self.bbox = Some(match self.bbox {
                Some(bbox) => bbox.merge(shape_bbox),
                None => shape_bbox,
            });
        }

        self.queue.push(shape, z_index);
        true
    }

    /// Bounding box of all shapes added so far.
    pub fn bounding_box(&self) -> Option<Rect> {
        self.bbox
    }

    /// Returns the collected shapes and their bounding box.
    pub fn finish(self) -> (ShapeQueue, Option<Rect>) {
        (self.queue, self.bbox)
    }
}
