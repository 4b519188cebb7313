//! Basic geometric types used by the `carta` encoder and renderer.
//!
//! * [`Coordinate`] is a geographic position (latitude and longitude in degrees) as it comes
//!   from the map source and as it is stored in the tile file.
//! * [`Point2d`] is a position in the projected (screen) space the renderer works in.
//! * [`Rect`] is an axis aligned rectangle used for bounding boxes in both spaces.
//! * [`GeometryType`] tells how the coordinates of a feature should be interpreted.
//!
//! Geographic coordinates are converted into the projected space with a [`Projection`], the only
//! provided implementation being [`WebMercator`].

mod coordinate;
pub use coordinate::Coordinate;

mod datum;
pub use datum::Datum;

pub mod error;

mod geometry_type;
pub use geometry_type::GeometryType;

mod point;
pub use point::Point2d;

pub mod projection;
pub use projection::{Projection, WebMercator};

mod rect;
pub use rect::Rect;
