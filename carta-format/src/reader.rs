//! Reading of tile files produced by [`TileWriter`](crate::TileWriter).
//!
//! [`MapReader`] only parses the header and the offset table when created. Tile blocks are
//! decoded on request, jumping straight to the block through the offset table.

use std::path::Path;

use bytes::{Buf, Bytes};
use carta_types::{Coordinate, GeometryType};

use crate::error::CartaFormatError;
use crate::feature::MapFeatureData;
use crate::layout::*;
use crate::property::PropEnum;

/// Header of a tile block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileBlockHeader {
    /// Number of features in the block.
    pub feature_count: u32,
    /// Number of coordinates in the block.
    pub coordinate_count: u32,
    /// Number of property codes in the block.
    pub property_count: u32,
    /// Character count field. Always zero in files written by this crate.
    pub character_count: u32,
    /// Absolute position of the coordinates section.
    pub coordinates_offset: u64,
    /// Absolute position of the property entries section.
    pub properties_offset: u64,
    /// Absolute position of the characters section.
    pub characters_offset: u64,
}

/// Decoded tile block.
#[derive(Debug, Clone, PartialEq)]
pub struct TileBlock {
    /// Id of the tile.
    pub tile_id: u32,
    /// Block header.
    pub header: TileBlockHeader,
    /// Features of the tile in file order.
    pub features: Vec<MapFeatureData>,
}

#[derive(Debug, Clone, Copy)]
struct FeatureRecord {
    id: u64,
    label_offset: i32,
    geometry_type: u8,
    coordinate_offset: u32,
    coordinate_count: u32,
    property_offset: u32,
    property_count: u32,
}

/// Random access reader of a tile file.
#[derive(Debug, Clone)]
pub struct MapReader {
    data: Bytes,
    version: u64,
    tiles: Vec<(u32, u64)>,
}

impl MapReader {
    /// Parses the header and the offset table of the file contents.
    pub fn new(data: impl Into<Bytes>) -> Result<Self, CartaFormatError> {
        let data = data.into();
        let mut buf = data.clone();

        ensure(&buf, FILE_HEADER_SIZE, "file header")?;
        let version = buf.get_u64_le();
        if version != FORMAT_VERSION {
            return Err(CartaFormatError::UnsupportedVersion(version));
        }

        let tile_count = buf.get_u32_le() as usize;
        ensure(&buf, tile_count * OFFSET_ENTRY_SIZE, "offset table")?;

        let mut tiles = Vec::with_capacity(tile_count);
        for _ in 0..tile_count {
            let id = buf.get_u32_le();
            let offset = buf.get_u64_le();
            tiles.push((id, offset));
        }

        Ok(Self {
            data,
            version,
            tiles,
        })
    }

    /// Reads the whole file into memory and parses its header.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CartaFormatError> {
        let data = std::fs::read(path)?;
        Self::new(data)
    }

    /// Format version of the file.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Ids of the tiles in the order of the offset table.
    pub fn tile_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.tiles.iter().map(|(id, _)| *id)
    }

    /// Number of tiles in the file.
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Reads the block of the tile with the given id.
    pub fn read_tile(&self, tile_id: u32) -> Result<TileBlock, CartaFormatError> {
        let offset = self
            .tiles
            .iter()
            .find(|(id, _)| *id == tile_id)
            .map(|(_, offset)| *offset)
            .ok_or(CartaFormatError::TileNotFound(tile_id))?;

        self.read_block(tile_id, offset)
    }

    /// Reads all tile blocks in the order of the offset table.
    pub fn tiles(&self) -> impl Iterator<Item = Result<TileBlock, CartaFormatError>> + '_ {
        self.tiles
            .iter()
            .map(|(id, offset)| self.read_block(*id, *offset))
    }

    /// Reads all features of the file.
    pub fn features(&self) -> Result<Vec<MapFeatureData>, CartaFormatError> {
        let mut features = vec![];
        for tile in self.tiles() {
            features.extend(tile?.features);
        }

        Ok(features)
    }

    fn slice_from(&self, offset: u64, what: &str) -> Result<Bytes, CartaFormatError> {
        let offset = usize::try_from(offset)
            .ok()
            .filter(|offset| *offset <= self.data.len())
            .ok_or_else(|| {
                CartaFormatError::Malformed(format!("{what} offset {offset} is out of bounds"))
            })?;

        Ok(self.data.slice(offset..))
    }

    fn read_block(&self, tile_id: u32, offset: u64) -> Result<TileBlock, CartaFormatError> {
        let mut buf = self.slice_from(offset, "tile block")?;

        ensure(&buf, BLOCK_HEADER_SIZE, "tile block header")?;
        let header = TileBlockHeader {
            feature_count: buf.get_u32_le(),
            coordinate_count: buf.get_u32_le(),
            property_count: buf.get_u32_le(),
            character_count: buf.get_u32_le(),
            coordinates_offset: buf.get_u64_le(),
            properties_offset: buf.get_u64_le(),
            characters_offset: buf.get_u64_le(),
        };

        ensure(
            &buf,
            header.feature_count as usize * FEATURE_RECORD_SIZE,
            "feature records",
        )?;
        let records: Vec<FeatureRecord> = (0..header.feature_count)
            .map(|_| FeatureRecord {
                id: buf.get_u64_le(),
                label_offset: buf.get_i32_le(),
                geometry_type: buf.get_u8(),
                coordinate_offset: buf.get_u32_le(),
                coordinate_count: buf.get_u32_le(),
                property_offset: buf.get_u32_le(),
                property_count: buf.get_u32_le(),
            })
            .collect();

        let coordinates = self.read_coordinates(&header)?;
        let properties = self.read_properties(&header)?;

        let mut features = Vec::with_capacity(records.len());
        for record in records {
            features.push(MapFeatureData {
                id: record.id,
                label_offset: (record.label_offset != NO_LABEL).then_some(record.label_offset),
                geometry_type: GeometryType::try_from(record.geometry_type)?,
                coordinates: sub_range(
                    &coordinates,
                    record.coordinate_offset,
                    record.coordinate_count,
                    "coordinate",
                )?
                .to_vec(),
                properties: sub_range(
                    &properties,
                    record.property_offset,
                    record.property_count,
                    "property",
                )?
                .to_vec(),
            });
        }

        Ok(TileBlock {
            tile_id,
            header,
            features,
        })
    }

    fn read_coordinates(
        &self,
        header: &TileBlockHeader,
    ) -> Result<Vec<Coordinate>, CartaFormatError> {
        let mut buf = self.slice_from(header.coordinates_offset, "coordinates section")?;
        let count = header.coordinate_count as usize;
        ensure(&buf, count * COORDINATE_SIZE, "coordinates section")?;

        Ok((0..count)
            .map(|_| {
                let lat = buf.get_f64_le();
                let lon = buf.get_f64_le();
                Coordinate::new(lat, lon)
            })
            .collect())
    }

    fn read_properties(&self, header: &TileBlockHeader) -> Result<Vec<PropEnum>, CartaFormatError> {
        let mut entries = self.slice_from(header.properties_offset, "properties section")?;
        let count = header.property_count as usize;
        ensure(&entries, count * PROPERTY_ENTRY_SIZE, "properties section")?;

        let chars = self.slice_from(header.characters_offset, "characters section")?;

        let mut properties = Vec::with_capacity(count);
        for _ in 0..count {
            let char_offset = entries.get_u32_le() as usize;
            let length = entries.get_u32_le() as usize;

            let start = char_offset * CHAR_SIZE;
            let end = start + length * CHAR_SIZE;
            if end > chars.len() {
                return Err(CartaFormatError::Malformed(format!(
                    "property text {char_offset}+{length} is out of the characters section"
                )));
            }

            let mut text_buf = chars.slice(start..end);
            let units: Vec<u16> = (0..length).map(|_| text_buf.get_u16_le()).collect();
            properties.push(parse_property(&units)?);
        }

        Ok(properties)
    }
}

fn parse_property(units: &[u16]) -> Result<PropEnum, CartaFormatError> {
    let text = String::from_utf16(units)
        .map_err(|_| CartaFormatError::Malformed("property text is not valid UTF-16".into()))?;
    let code: u16 = text
        .parse()
        .map_err(|_| CartaFormatError::Malformed(format!("invalid property code: {text:?}")))?;

    PropEnum::from_code(code)
        .ok_or_else(|| CartaFormatError::Malformed(format!("unknown property code: {code}")))
}

fn sub_range<'a, T>(
    items: &'a [T],
    offset: u32,
    count: u32,
    what: &str,
) -> Result<&'a [T], CartaFormatError> {
    let start = offset as usize;
    let end = start + count as usize;
    items.get(start..end).ok_or_else(|| {
        CartaFormatError::Malformed(format!(
            "{what} range {start}..{end} is out of the tile ({} items)",
            items.len()
        ))
    })
}

fn ensure(buf: &impl Buf, size: usize, what: &str) -> Result<(), CartaFormatError> {
    if buf.remaining() < size {
        Err(CartaFormatError::Malformed(format!(
            "unexpected end of data in {what}: {size} bytes expected, {} left",
            buf.remaining()
        )))
    } else {
        Ok(())
    }
}
