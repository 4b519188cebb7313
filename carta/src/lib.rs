//! Carta converts OpenStreetMap extracts into a compact tile partitioned binary map and renders
//! such maps into raster images.
//!
//! # Encoding
//!
//! An `.osm.pbf` file is read by [`source::read_pbf`]. Its blocks are decoded in parallel and the
//! entities are collected into a [`MapData`](carta_format::MapData) (see [`ingest`]), which is then
//! written by the [`carta_format`] tile writer. [`encode_pbf`] does all of it in one call.
//!
//! # Rendering
//!
//! Features of a tile file are read back with [`MapReader`](carta_format::MapReader) and classified
//! by the [`Tessellator`](tessellate::Tessellator): every feature either becomes a [`Shape`]
//! (a road, a river, a forest, etc.) with a z-index, or is ignored. Shapes are then drawn in the
//! z-index order by [`render()`] on a [`Canvas`](render::Canvas). [`render_file`] does the whole
//! thing and saves the result as a PNG file.
//!
//! The same steps are available from the command line with the `carta` binary:
//!
//! ```text
//! carta encode --input monaco.osm.pbf --output monaco.bin
//! carta render --input monaco.bin --output monaco.png --width 2048 --height 2048
//! ```

mod color;
pub use color::Color;

pub mod error;
pub use error::CartaError;

pub mod ingest;

mod pipeline;
pub use pipeline::{encode_pbf, render_file, render_map, RenderSummary};

pub mod render;
pub use render::{render, RenderOptions};

pub mod source;

pub mod tessellate;
pub use tessellate::{classify, Shape, ShapeKind, Tessellator};

pub use carta_format;
pub use carta_types;
