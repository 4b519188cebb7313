//! Tile partitioned binary map format.
//!
//! Map entities ([`Node`]s and [`Way`]s) are grouped into tiles of a regular grid (see
//! [`tiling`]). For every tile the [`TileWriter`] builds a list of features: a part of a way that
//! lies inside the tile or a standalone node. Tags of the entities are reduced to the
//! [`PropEnum`] vocabulary. The result is a single file with a header and an offset table that
//! allows [`MapReader`] to decode any tile without reading the others.
//!
//! ```
//! use carta_format::{MapData, MapReader, Node, TileWriter, Way};
//! use carta_types::Coordinate;
//!
//! let nodes = vec![
//!     Node::new(1, Coordinate::new(10.01, 20.01), vec![]),
//!     Node::new(2, Coordinate::new(10.02, 20.02), vec![]),
//! ];
//! let ways = vec![Way::new(1, vec![1, 2], vec![("highway".into(), "primary".into())])];
//! let map = MapData::from_entities(nodes, ways);
//!
//! let (bytes, summary) = TileWriter::new(&map).encode().unwrap();
//! assert_eq!(summary.features, 1);
//!
//! let reader = MapReader::new(bytes).unwrap();
//! assert_eq!(reader.features().unwrap().len(), 1);
//! ```

mod entity;
pub use entity::{MapData, Node, Way};

pub mod error;
pub use error::CartaFormatError;

mod feature;
pub use feature::{FeatureData, MapFeatureData};

pub mod layout;

pub mod property;
pub use property::PropEnum;

mod reader;
pub use reader::{MapReader, TileBlock, TileBlockHeader};

pub mod tiling;

mod writer;
pub use writer::{encode_to_file, EncodeSummary, FeatureIdCounter, TileWriter};
