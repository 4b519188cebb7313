//! Conversion of geographic coordinates into a cartesian space.

use crate::{Coordinate, Datum, Point2d};

/// Projection from geographic coordinates into 2d cartesian points.
pub trait Projection {
    /// Projects the coordinate. Returns `None` if the coordinate cannot be represented in the
    /// target space (e.g. poles in Web Mercator).
    fn project(&self, input: &Coordinate) -> Option<Point2d>;
}

/// Latitude limit of Web Mercator in degrees. At this latitude the projected square world is
/// exactly as tall as it is wide.
pub const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_779_806_59;

/// Spherical Web Mercator (EPSG:3857). X grows to the east, Y grows to the north, both in meters.
///
/// Coordinates further from the equator than [`MAX_MERCATOR_LATITUDE`] are not projected.
#[derive(Debug, Copy, Clone, Default)]
pub struct WebMercator {
    datum: Datum,
}

impl WebMercator {
    /// Creates a projection using the given datum.
    pub fn new(datum: Datum) -> Self {
        Self { datum }
    }
}

impl Projection for WebMercator {
    fn project(&self, input: &Coordinate) -> Option<Point2d> {
        if !(-MAX_MERCATOR_LATITUDE..=MAX_MERCATOR_LATITUDE).contains(&input.lat()) {
            return None;
        }

        let x = self.datum.semimajor() * input.lon_rad();
        let y = self.datum.semimajor()
            * (std::f64::consts::FRAC_PI_4 + input.lat_rad() / 2.0)
                .tan()
                .ln();

        if x.is_finite() && y.is_finite() {
            Some(Point2d::new(x, y))
        } else {
            None
        }
    }
}
