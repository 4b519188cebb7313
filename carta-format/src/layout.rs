//! Sizes of the fixed width structures of a tile file.
//!
//! ```text
//! file        := header offset_table tile_block*
//! header      := version:u64 tile_count:u32
//! offset_table:= (tile_id:u32 offset:u64){tile_count}
//! tile_block  := block_header feature_record* coordinate* property_entry* char*
//! ```
//!
//! All integers are little-endian.

/// Version written into the header by this crate.
pub const FORMAT_VERSION: u64 = 1;

/// Size of the global header.
pub const FILE_HEADER_SIZE: usize = 8 + 4;

/// Size of one entry of the offset table.
pub const OFFSET_ENTRY_SIZE: usize = 4 + 8;

/// Size of a tile block header: four counts followed by three section offsets.
pub const BLOCK_HEADER_SIZE: usize = 4 * 4 + 8 * 3;

/// Position of the coordinates section offset inside a tile block header.
pub const COORDINATES_OFFSET_FIELD: usize = 16;

/// Position of the properties section offset inside a tile block header.
pub const PROPERTIES_OFFSET_FIELD: usize = 24;

/// Position of the characters section offset inside a tile block header.
pub const CHARACTERS_OFFSET_FIELD: usize = 32;

/// Size of a feature record: id, label offset, geometry type, then coordinate and property
/// ranges.
pub const FEATURE_RECORD_SIZE: usize = 8 + 4 + 1 + 4 * 4;

/// Size of a coordinate: latitude and longitude.
pub const COORDINATE_SIZE: usize = 8 + 8;

/// Size of a property entry: character offset and length.
pub const PROPERTY_ENTRY_SIZE: usize = 4 + 4;

/// Size of one character unit (UTF-16 code unit).
pub const CHAR_SIZE: usize = 2;

/// Label offset stored for features without a label.
pub const NO_LABEL: i32 = -1;
