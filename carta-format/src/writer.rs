//! Encoding of map entities into a tile file.
//!
//! The writer goes through the tiles one by one. For every tile it builds the list of features
//! (one per way crossing the tile and one per standalone node) and serializes it as a tile block.
//! Block headers contain the absolute positions of the sections that follow the feature records,
//! and the file header contains the position of every block. Those values are not known when the
//! fields are written, so the fields are reserved with zeros and backfilled once the referenced
//! content has been written. The whole file is staged in memory and streamed to the output in a
//! single pass, so the output does not need to support seeking.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use ahash::{AHashMap, AHashSet};
use bytes::{BufMut, Bytes, BytesMut};
use carta_types::{Coordinate, GeometryType};

use crate::entity::MapData;
use crate::error::CartaFormatError;
use crate::feature::FeatureData;
use crate::layout::*;
use crate::property::{self, PropEnum};
use crate::tiling::{tile_bounds, tile_id};

const NAME_KEY: &str = "name";

/// Source of feature ids for one encoding run.
///
/// Ids start from zero and are handed out in the order features are built, so they are
/// strictly increasing across the file. Candidates that are later discarded keep their ids, so
/// the ids in the file may have gaps.
#[derive(Debug, Default)]
pub struct FeatureIdCounter {
    next: u64,
}

impl FeatureIdCounter {
    /// Creates a counter starting from zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next id.
    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Reserves `count` consecutive ids and returns the first one.
    pub fn reserve(&mut self, count: u64) -> u64 {
        let first = self.next;
        self.next += count;
        first
    }

    /// Number of ids handed out so far.
    pub fn count(&self) -> u64 {
        self.next
    }
}

/// Statistics of an encoding run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EncodeSummary {
    /// Number of tile blocks.
    pub tiles: usize,
    /// Number of features in all tiles.
    pub features: u64,
    /// Number of coordinates in all tiles.
    pub coordinates: u64,
    /// Number of property codes in all tiles.
    pub properties: u64,
    /// Size of the file in bytes.
    pub bytes: u64,
}

/// Encodes [`MapData`] into a tile file.
#[derive(Debug)]
pub struct TileWriter<'a> {
    map: &'a MapData,
    tile_ways: AHashMap<u32, Vec<usize>>,
}

#[derive(Debug, Default)]
struct TileState {
    used_nodes: AHashSet<i64>,
    features: Vec<FeatureData>,
    property_count: usize,
}

impl TileState {
    fn retain(
        &mut self,
        id: u64,
        geometry_type: GeometryType,
        coordinates: Vec<Coordinate>,
        properties: Vec<PropEnum>,
        label_offset: Option<i32>,
    ) {
        self.property_count += properties.len();
        self.features.push(FeatureData {
            id,
            geometry_type,
            coordinates,
            properties,
            label_offset,
        });
    }
}

impl<'a> TileWriter<'a> {
    /// Creates a writer for the map.
    pub fn new(map: &'a MapData) -> Self {
        // A way produces a feature only in the tiles its nodes are in, so instead of testing
        // every way against every tile, each tile gets the list of ways that touch it. Lists
        // keep the order of the ways in the map.
        let mut tile_ways: AHashMap<u32, Vec<usize>> = AHashMap::new();
        for (index, way) in map.ways().iter().enumerate() {
            let mut tiles: Vec<u32> = way
                .node_ids
                .iter()
                .filter_map(|id| map.node(*id))
                .map(|node| tile_id(&node.coordinate))
                .collect();
            tiles.sort_unstable();
            tiles.dedup();

            for tile in tiles {
                tile_ways.entry(tile).or_default().push(index);
            }
        }

        Self { map, tile_ways }
    }

    /// Builds the features of one tile: first the parts of the ways inside the tile, then the
    /// nodes of the tile that are not part of any of those ways.
    pub fn build_tile(
        &self,
        tile: u32,
        ids: &mut FeatureIdCounter,
    ) -> Result<Vec<FeatureData>, CartaFormatError> {
        let mut state = TileState::default();

        // Every way is a feature candidate on every tile pass and takes an id even if none of its
        // nodes are in the tile. Ways that miss the tile are skipped through the index, but
        // their ids are still consumed.
        let first_way_id = ids.reserve(self.map.ways().len() as u64);

        for &way_index in self.tile_ways.get(&tile).into_iter().flatten() {
            let way = &self.map.ways()[way_index];

            let (mut properties, label_offset) = encode_tags(&way.tags, state.property_count)?;

            let mut coordinates = Vec::with_capacity(way.node_ids.len());
            for node in way.node_ids.iter().filter_map(|id| self.map.node(*id)) {
                if tile_id(&node.coordinate) != tile {
                    continue;
                }

                coordinates.push(node.coordinate);
                state.used_nodes.insert(node.id);

                for property in node
                    .tags
                    .iter()
                    .filter_map(|(key, value)| property::encode(key, value))
                {
                    if !properties.contains(&property) {
                        properties.push(property);
                    }
                }
            }

            if coordinates.is_empty() {
                continue;
            }

            let geometry_type = GeometryType::for_way(&coordinates);
            state.retain(
                first_way_id + way_index as u64,
                geometry_type,
                coordinates,
                properties,
                label_offset,
            );
        }

        for node_id in self.map.tiles().get(&tile).into_iter().flatten() {
            if state.used_nodes.contains(node_id) {
                continue;
            }

            let Some(node) = self.map.node(*node_id) else {
                continue;
            };

            let (properties, label_offset) = encode_tags(&node.tags, state.property_count)?;
            state.retain(
                ids.next_id(),
                GeometryType::Point,
                vec![node.coordinate],
                properties,
                label_offset,
            );
        }

        Ok(state.features)
    }

    /// Encodes the whole map into memory.
    pub fn encode(&self) -> Result<(Bytes, EncodeSummary), CartaFormatError> {
        let tiles = self.map.tiles();
        let mut ids = FeatureIdCounter::new();
        let mut summary = EncodeSummary {
            tiles: tiles.len(),
            ..Default::default()
        };

        let mut buf = BytesMut::with_capacity(FILE_HEADER_SIZE + OFFSET_ENTRY_SIZE * tiles.len());
        buf.put_u64_le(FORMAT_VERSION);
        buf.put_u32_le(to_u32(tiles.len(), "tile count")?);

        let mut tile_offsets = Vec::with_capacity(tiles.len());
        for &tile in tiles.keys() {
            buf.put_u32_le(tile);
            tile_offsets.push(Reservation::u64(&mut buf));
        }

        for (&tile, tile_offset) in tiles.keys().zip(tile_offsets) {
            let block_offset = buf.len() as u64;
            tile_offset.fill(&mut buf, block_offset);

            let features = self.build_tile(tile, &mut ids)?;
            let block = write_block(&mut buf, &features)?;
            let bounds = tile_bounds(tile);
            log::debug!(
                "Tile {tile} (lat {:.1}..{:.1}, lon {:.1}..{:.1}): {} features, {} coordinates, {} properties",
                bounds.y_min(),
                bounds.y_max(),
                bounds.x_min(),
                bounds.x_max(),
                features.len(),
                block.coordinates,
                block.properties
            );

            summary.features += features.len() as u64;
            summary.coordinates += block.coordinates as u64;
            summary.properties += block.properties as u64;
        }

        summary.bytes = buf.len() as u64;
        Ok((buf.freeze(), summary))
    }

    /// Encodes the map and writes it into `out`.
    pub fn write<W: Write>(&self, out: &mut W) -> Result<EncodeSummary, CartaFormatError> {
        let (bytes, summary) = self.encode()?;
        out.write_all(&bytes)?;
        out.flush()?;

        Ok(summary)
    }
}

/// Encodes the map into a file at `path`.
///
/// If anything goes wrong the partially written file is removed.
pub fn encode_to_file(
    map: &MapData,
    path: impl AsRef<Path>,
) -> Result<EncodeSummary, CartaFormatError> {
    let path = path.as_ref();
    let result = File::create(path)
        .map_err(CartaFormatError::from)
        .and_then(|file| TileWriter::new(map).write(&mut BufWriter::new(file)));

    match result {
        Ok(summary) => {
            log::info!(
                "Written {} tiles with {} features ({} bytes) to {}",
                summary.tiles,
                summary.features,
                summary.bytes,
                path.display()
            );
            Ok(summary)
        }
        Err(e) => {
            if let Err(remove_err) = std::fs::remove_file(path) {
                log::warn!(
                    "Failed to remove incomplete file {}: {remove_err}",
                    path.display()
                );
            }
            Err(e)
        }
    }
}

/// Encodes the tags of an entity, returning the property codes and the label offset.
///
/// `tile_properties` is the number of properties of the features already retained in the tile.
fn encode_tags(
    tags: &[(String, String)],
    tile_properties: usize,
) -> Result<(Vec<PropEnum>, Option<i32>), CartaFormatError> {
    let mut label_offset = None;
    let mut properties = Vec::with_capacity(tags.len());
    for (key, value) in tags {
        if key == NAME_KEY {
            label_offset = Some(label_position(tile_properties, properties.len())?);
        }

        if let Some(property) = property::encode(key, value) {
            properties.push(property);
        }
    }

    Ok((properties, label_offset))
}

/// Label position is one past the index of the property slot, counted from the first property
/// of the tile.
fn label_position(tile_properties: usize, local_index: usize) -> Result<i32, CartaFormatError> {
    i32::try_from(tile_properties + local_index + 1)
        .map_err(|_| CartaFormatError::Overflow("label offset"))
}

fn to_u32(value: usize, what: &'static str) -> Result<u32, CartaFormatError> {
    u32::try_from(value).map_err(|_| CartaFormatError::Overflow(what))
}

/// Fixed size field whose value is written later.
struct Reservation {
    position: usize,
}

impl Reservation {
    fn u64(buf: &mut BytesMut) -> Self {
        let position = buf.len();
        buf.put_u64_le(0);
        Self { position }
    }

    fn fill(self, buf: &mut BytesMut, value: u64) {
        buf[self.position..self.position + 8].copy_from_slice(&value.to_le_bytes());
    }
}

struct BlockSummary {
    coordinates: u32,
    properties: u32,
}

fn write_block(
    buf: &mut BytesMut,
    features: &[FeatureData],
) -> Result<BlockSummary, CartaFormatError> {
    let coordinate_count = to_u32(
        features.iter().map(|f| f.coordinates.len()).sum(),
        "coordinate count",
    )?;
    let property_count = to_u32(
        features.iter().map(|f| f.properties.len()).sum(),
        "property count",
    )?;

    let block_start = buf.len();
    buf.put_u32_le(to_u32(features.len(), "feature count")?);
    buf.put_u32_le(coordinate_count);
    buf.put_u32_le(property_count);
    // Character count is not used by readers.
    buf.put_u32_le(0);

    let coordinates_section = Reservation::u64(buf);
    let properties_section = Reservation::u64(buf);
    let characters_section = Reservation::u64(buf);
    debug_assert_eq!(coordinates_section.position - block_start, COORDINATES_OFFSET_FIELD);
    debug_assert_eq!(properties_section.position - block_start, PROPERTIES_OFFSET_FIELD);
    debug_assert_eq!(characters_section.position - block_start, CHARACTERS_OFFSET_FIELD);

    let mut coordinate_offset = 0;
    let mut property_offset = 0;
    for feature in features {
        // Totals fit into u32, so do the per feature values.
        let coordinates = feature.coordinates.len() as u32;
        let properties = feature.properties.len() as u32;

        buf.put_u64_le(feature.id);
        buf.put_i32_le(feature.label_offset.unwrap_or(NO_LABEL));
        buf.put_u8(feature.geometry_type.as_u8());
        buf.put_u32_le(coordinate_offset);
        buf.put_u32_le(coordinates);
        buf.put_u32_le(property_offset);
        buf.put_u32_le(properties);

        coordinate_offset += coordinates;
        property_offset += properties;
    }

    let position = buf.len() as u64;
    coordinates_section.fill(buf, position);
    for coordinate in features.iter().flat_map(|f| &f.coordinates) {
        buf.put_f64_le(coordinate.lat());
        buf.put_f64_le(coordinate.lon());
    }

    let texts: Vec<String> = features
        .iter()
        .flat_map(|f| &f.properties)
        .map(|p| p.code().to_string())
        .collect();

    let position = buf.len() as u64;
    properties_section.fill(buf, position);
    let mut char_offset = 0u32;
    for text in &texts {
        // Decimal digits of a u16 are ASCII, one unit per byte.
        let length = text.len() as u32;
        buf.put_u32_le(char_offset);
        buf.put_u32_le(length);
        char_offset = char_offset
            .checked_add(length)
            .ok_or(CartaFormatError::Overflow("character count"))?;
    }

    let position = buf.len() as u64;
    characters_section.fill(buf, position);
    for unit in texts.iter().flat_map(|t| t.encode_utf16()) {
        buf.put_u16_le(unit);
    }

    Ok(BlockSummary {
        coordinates: coordinate_count,
        properties: property_count,
    })
}

#[cfg(test)]
mod tests {
    use bytes::Buf;

    use super::*;
    use crate::entity::{Node, Way};

    fn tags(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn node(id: i64, lat: f64, lon: f64) -> Node {
        Node::new(id, Coordinate::new(lat, lon), vec![])
    }

    #[test]
    fn motorway_in_one_tile() {
        let map = MapData::from_entities(
            [
                node(1, 10.01, 20.01),
                node(2, 10.02, 20.02),
                node(3, 10.03, 20.03),
            ],
            [Way::new(
                100,
                vec![1, 2, 3],
                tags(&[("highway", "motorway")]),
            )],
        );
        let tile = tile_id(&Coordinate::new(10.01, 20.01));
        assert_eq!(map.tiles().len(), 1);

        let writer = TileWriter::new(&map);
        let features = writer
            .build_tile(tile, &mut FeatureIdCounter::new())
            .unwrap();

        assert_eq!(features.len(), 1);
        let feature = &features[0];
        assert_eq!(feature.geometry_type, GeometryType::Polyline);
        assert_eq!(feature.properties, vec![PropEnum::HighwayMotorway]);
        assert_eq!(feature.coordinates.len(), 3);
        assert_eq!(feature.label_offset, None);
    }

    #[test]
    fn way_crossing_tiles_is_split() {
        let map = MapData::from_entities(
            [
                node(1, 10.01, 20.01),
                node(2, 10.02, 20.02),
                node(3, 10.02, 20.15),
                node(4, 10.03, 20.16),
            ],
            [Way::new(7, vec![1, 2, 3, 4], tags(&[("railway", "rail")]))],
        );
        let tile_a = tile_id(&Coordinate::new(10.01, 20.01));
        let tile_b = tile_id(&Coordinate::new(10.02, 20.15));
        assert_ne!(tile_a, tile_b);

        let writer = TileWriter::new(&map);
        let mut ids = FeatureIdCounter::new();
        let a = writer.build_tile(tile_a, &mut ids).unwrap();
        let b = writer.build_tile(tile_b, &mut ids).unwrap();

        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 1);
        assert_ne!(a[0].id, b[0].id);
        assert_eq!(
            a[0].coordinates,
            vec![Coordinate::new(10.01, 20.01), Coordinate::new(10.02, 20.02)]
        );
        assert_eq!(
            b[0].coordinates,
            vec![Coordinate::new(10.02, 20.15), Coordinate::new(10.03, 20.16)]
        );
        assert_eq!(a[0].properties, vec![PropEnum::Railway]);
        assert_eq!(b[0].properties, vec![PropEnum::Railway]);
    }

    #[test]
    fn closed_way_is_polygon() {
        let map = MapData::from_entities(
            [
                node(1, 10.01, 20.01),
                node(2, 10.02, 20.01),
                node(3, 10.02, 20.02),
            ],
            [Way::new(1, vec![1, 2, 3, 1], tags(&[("building", "yes")]))],
        );
        let tile = tile_id(&Coordinate::new(10.01, 20.01));
        let features = TileWriter::new(&map)
            .build_tile(tile, &mut FeatureIdCounter::new())
            .unwrap();

        assert_eq!(features.len(), 1);
        assert_eq!(features[0].geometry_type, GeometryType::Polygon);
        assert_eq!(features[0].coordinates.len(), 4);
    }

    #[test]
    fn closed_way_cut_by_tile_border_is_polyline() {
        let map = MapData::from_entities(
            [
                node(1, 10.01, 20.01),
                node(2, 10.02, 20.15),
                node(3, 10.05, 20.02),
                node(4, 10.06, 20.03),
            ],
            [Way::new(1, vec![1, 2, 3, 4, 1], vec![])],
        );
        let tile = tile_id(&Coordinate::new(10.01, 20.01));
        let features = TileWriter::new(&map)
            .build_tile(tile, &mut FeatureIdCounter::new())
            .unwrap();

        // Nodes 1, 3, 4, 1 are in the tile, the first and the last are the same.
        assert_eq!(features[0].geometry_type, GeometryType::Polygon);

        let map = MapData::from_entities(
            [
                node(1, 10.01, 20.15),
                node(2, 10.02, 20.01),
                node(3, 10.05, 20.02),
            ],
            [Way::new(1, vec![1, 2, 3, 1], vec![])],
        );
        let tile = tile_id(&Coordinate::new(10.02, 20.01));
        let features = TileWriter::new(&map)
            .build_tile(tile, &mut FeatureIdCounter::new())
            .unwrap();
        assert_eq!(features[0].geometry_type, GeometryType::Polyline);
        assert_eq!(features[0].coordinates.len(), 2);
    }

    #[test]
    fn standalone_nodes_become_points() {
        let mut place = node(5, 10.05, 20.05);
        place.tags = tags(&[("place", "town"), ("name", "Springfield")]);

        let map = MapData::from_entities(
            [node(1, 10.01, 20.01), node(2, 10.02, 20.02), place],
            [Way::new(1, vec![1, 2], tags(&[("highway", "primary")]))],
        );
        let tile = tile_id(&Coordinate::new(10.01, 20.01));
        let features = TileWriter::new(&map)
            .build_tile(tile, &mut FeatureIdCounter::new())
            .unwrap();

        assert_eq!(features.len(), 2);
        let point = &features[1];
        assert_eq!(point.geometry_type, GeometryType::Point);
        assert_eq!(point.coordinates, vec![Coordinate::new(10.05, 20.05)]);
        assert_eq!(point.properties, vec![PropEnum::PlaceTown]);
        // One property of the way before it, one property of the node before the name tag.
        assert_eq!(point.label_offset, Some(3));
    }

    #[test]
    fn label_position_is_recorded_for_dropped_name() {
        let map = MapData::from_entities(
            [node(1, 10.01, 20.01), node(2, 10.02, 20.02)],
            [Way::new(
                1,
                vec![1, 2],
                tags(&[
                    ("highway", "residential"),
                    ("surface", "asphalt"),
                    ("name", "Elm Street"),
                ]),
            )],
        );
        let tile = tile_id(&Coordinate::new(10.01, 20.01));
        let features = TileWriter::new(&map)
            .build_tile(tile, &mut FeatureIdCounter::new())
            .unwrap();

        assert_eq!(features[0].properties, vec![PropEnum::HighwayResidential]);
        // No properties before the way, one property before the name tag.
        assert_eq!(features[0].label_offset, Some(2));
    }

    #[test]
    fn node_tags_are_merged_without_duplicates() {
        let mut crossing = node(2, 10.02, 20.02);
        crossing.tags = tags(&[("highway", "primary"), ("railway", "level_crossing")]);

        let map = MapData::from_entities(
            [node(1, 10.01, 20.01), crossing, node(3, 10.03, 20.03)],
            [Way::new(
                1,
                vec![1, 2, 3],
                tags(&[("highway", "primary"), ("highway", "primary")]),
            )],
        );
        let tile = tile_id(&Coordinate::new(10.01, 20.01));
        let features = TileWriter::new(&map)
            .build_tile(tile, &mut FeatureIdCounter::new())
            .unwrap();

        // Duplicates among way tags are kept, node tags are only added when missing.
        assert_eq!(
            features[0].properties,
            vec![
                PropEnum::HighwayPrimary,
                PropEnum::HighwayPrimary,
                PropEnum::Railway
            ]
        );
        // The crossing node is part of the way, so it is not emitted as a point.
        assert_eq!(features.len(), 1);
    }

    #[test]
    fn missing_nodes_are_skipped() {
        let map = MapData::from_entities(
            [node(1, 10.01, 20.01), node(2, 10.02, 20.02)],
            [
                Way::new(1, vec![1, 99, 2], vec![]),
                Way::new(2, vec![98, 99], vec![]),
            ],
        );
        let tile = tile_id(&Coordinate::new(10.01, 20.01));
        let features = TileWriter::new(&map)
            .build_tile(tile, &mut FeatureIdCounter::new())
            .unwrap();

        assert_eq!(features.len(), 1);
        assert_eq!(features[0].coordinates.len(), 2);
    }

    #[test]
    fn file_header_and_offset_table() {
        let map = MapData::from_entities(
            [node(1, 10.01, 20.01), node(2, 10.02, 20.15)],
            [],
        );
        let (bytes, summary) = TileWriter::new(&map).encode().unwrap();
        assert_eq!(summary.tiles, 2);
        assert_eq!(summary.features, 2);
        assert_eq!(summary.bytes, bytes.len() as u64);

        let mut header = &bytes[..];
        assert_eq!(header.get_u64_le(), FORMAT_VERSION);
        assert_eq!(header.get_u32_le(), 2);

        let mut previous_offset = 0;
        for expected_tile in map.tiles().keys() {
            assert_eq!(header.get_u32_le(), *expected_tile);
            let offset = header.get_u64_le();
            assert!(offset > previous_offset);
            assert!(offset < bytes.len() as u64);
            previous_offset = offset;
        }

        let first_block = FILE_HEADER_SIZE + 2 * OFFSET_ENTRY_SIZE;
        let mut table = &bytes[FILE_HEADER_SIZE + 4..];
        assert_eq!(table.get_u64_le(), first_block as u64);
    }

    #[test]
    fn block_sections_are_backfilled() {
        let mut town = node(3, 10.05, 20.05);
        town.tags = tags(&[("place", "city")]);
        let map = MapData::from_entities(
            [node(1, 10.01, 20.01), node(2, 10.02, 20.02), town],
            [Way::new(
                1,
                vec![1, 2],
                tags(&[("highway", "motorway"), ("building", "yes")]),
            )],
        );
        let (bytes, _) = TileWriter::new(&map).encode().unwrap();

        let block_start = FILE_HEADER_SIZE + OFFSET_ENTRY_SIZE;
        let mut header = &bytes[block_start..];
        assert_eq!(header.get_u32_le(), 2);
        assert_eq!(header.get_u32_le(), 3);
        assert_eq!(header.get_u32_le(), 3);
        assert_eq!(header.get_u32_le(), 0);

        let section = |field: usize| (&bytes[block_start + field..]).get_u64_le() as usize;
        let coordinates = section(COORDINATES_OFFSET_FIELD);
        let properties = section(PROPERTIES_OFFSET_FIELD);
        let characters = section(CHARACTERS_OFFSET_FIELD);

        assert_eq!(
            coordinates,
            block_start + BLOCK_HEADER_SIZE + 2 * FEATURE_RECORD_SIZE
        );
        assert_eq!(properties, coordinates + 3 * COORDINATE_SIZE);
        assert_eq!(characters, properties + 3 * PROPERTY_ENTRY_SIZE);

        // "10", "110", "41"
        assert_eq!(bytes.len(), characters + 7 * CHAR_SIZE);

        let mut entries = &bytes[properties..characters];
        assert_eq!((entries.get_u32_le(), entries.get_u32_le()), (0, 2));
        assert_eq!((entries.get_u32_le(), entries.get_u32_le()), (2, 3));
        assert_eq!((entries.get_u32_le(), entries.get_u32_le()), (5, 2));

        let mut chars = &bytes[characters..];
        let text: Vec<u16> = (0..7).map(|_| chars.get_u16_le()).collect();
        assert_eq!(String::from_utf16(&text).unwrap(), "1011041");
    }

    #[test]
    fn ids_are_increasing_across_tiles() {
        let nodes: Vec<Node> = (0..50)
            .map(|i| node(i, 10.0 + i as f64 * 0.031, 20.0 + i as f64 * 0.017))
            .collect();
        let ways = vec![
            Way::new(1, (0..50).collect(), tags(&[("waterway", "river")])),
            Way::new(2, (10..30).collect(), tags(&[("highway", "trunk")])),
        ];
        let map = MapData::from_entities(nodes, ways);
        let writer = TileWriter::new(&map);

        let mut ids = FeatureIdCounter::new();
        let mut all = vec![];
        for tile in map.tiles().keys() {
            all.extend(writer.build_tile(*tile, &mut ids).unwrap());
        }

        assert!(all.windows(2).all(|w| w[0].id < w[1].id));
        // All nodes belong to the river, so only way candidates take ids.
        assert_eq!(ids.count(), (map.tiles().len() * map.ways().len()) as u64);
    }

    #[test]
    fn discarded_way_candidates_keep_their_ids() {
        // Node 1 is alone in its tile, the way only touches the next tile to the east.
        let map = MapData::from_entities(
            [
                node(1, 10.05, 20.05),
                node(2, 10.05, 20.15),
                node(3, 10.06, 20.16),
            ],
            [Way::new(1, vec![2, 3], tags(&[("highway", "primary")]))],
        );
        let (bytes, summary) = TileWriter::new(&map).encode().unwrap();
        assert_eq!(summary.features, 2);

        let features = crate::MapReader::new(bytes).unwrap().features().unwrap();
        let ids: Vec<u64> = features.iter().map(|f| f.id).collect();
        // The way takes id 0 in the first tile and is discarded there.
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(features[0].geometry_type, GeometryType::Point);
        assert_eq!(features[1].geometry_type, GeometryType::Polyline);
    }

    #[test]
    fn every_way_takes_an_id_in_every_tile() {
        let map = MapData::from_entities(
            [node(1, 10.05, 20.05), node(2, 10.05, 20.15)],
            [
                Way::new(1, vec![1], vec![]),
                Way::new(2, vec![2], vec![]),
            ],
        );
        let writer = TileWriter::new(&map);
        let tiles: Vec<u32> = map.tiles().keys().copied().collect();

        let mut ids = FeatureIdCounter::new();
        let first = writer.build_tile(tiles[0], &mut ids).unwrap();
        let second = writer.build_tile(tiles[1], &mut ids).unwrap();

        assert_eq!(first.iter().map(|f| f.id).collect::<Vec<_>>(), vec![0]);
        assert_eq!(second.iter().map(|f| f.id).collect::<Vec<_>>(), vec![3]);
        assert_eq!(ids.count(), 4);
    }

    #[test]
    fn write_to_file() {
        let path = std::env::temp_dir().join(format!("carta-writer-{}.bin", std::process::id()));
        let map = MapData::from_entities([node(1, 1.0, 1.0)], []);

        let summary = encode_to_file(&map, &path).unwrap();
        let written = std::fs::read(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(summary.bytes, written.len() as u64);
    }

    #[test]
    fn write_error_aborts() {
        struct FailingWriter;
        impl Write for FailingWriter {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("disk full"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let map = MapData::from_entities([node(1, 1.0, 1.0)], []);
        let result = TileWriter::new(&map).write(&mut FailingWriter);
        assert!(matches!(result, Err(CartaFormatError::Io(_))));
    }
}
