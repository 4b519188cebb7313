//! Partitioning of the globe into a regular grid of tiles.
//!
//! The grid cells are [`TILE_SIZE_DEGREES`] wide in both directions. Rows are counted from the
//! south pole and columns from the antimeridian, so tile `0` is the cell with its south-west
//! corner at `(-90, -180)`.

use carta_types::{Coordinate, Rect};

/// Size of a tile side in degrees.
pub const TILE_SIZE_DEGREES: f64 = 0.1;

/// Number of tile rows (latitude bands).
pub const ROWS: u32 = 1800;

/// Number of tile columns (longitude bands).
pub const COLUMNS: u32 = 3600;

/// Returns id of the tile the coordinate belongs to.
///
/// Every coordinate maps to exactly one tile. Coordinates on the north edge (`lat == 90`) and the
/// east edge (`lon == 180`) of the world go into the last row and column, values outside of the
/// valid range are clamped into it, and NaN is treated as the minimum.
pub fn tile_id(coordinate: &Coordinate) -> u32 {
    let row = band_index(coordinate.lat() + 90.0, ROWS);
    let col = band_index(coordinate.lon() + 180.0, COLUMNS);

    row * COLUMNS + col
}

fn band_index(offset: f64, count: u32) -> u32 {
    // `as` saturates and maps NaN to 0.
    let index = (offset / TILE_SIZE_DEGREES).floor() as i64;
    index.clamp(0, count as i64 - 1) as u32
}

/// Geographic extent of a tile: X is longitude and Y is latitude, in degrees.
pub fn tile_bounds(tile_id: u32) -> Rect {
    let row = tile_id / COLUMNS;
    let col = tile_id % COLUMNS;

    let lat_min = row as f64 * TILE_SIZE_DEGREES - 90.0;
    let lon_min = col as f64 * TILE_SIZE_DEGREES - 180.0;

    Rect::new(
        lon_min,
        lat_min,
        lon_min + TILE_SIZE_DEGREES,
        lat_min + TILE_SIZE_DEGREES,
    )
}
