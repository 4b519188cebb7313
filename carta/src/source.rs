//! Reading of OpenStreetMap `.osm.pbf` extracts.

use std::path::Path;

use carta_format::{MapData, Node, Way};
use carta_types::Coordinate;
use osmpbf::{BlobDecode, BlobReader, PrimitiveBlock};
use rayon::prelude::*;

use crate::error::CartaError;
use crate::ingest::{ingest, DecodedBlock, PrimitiveGroup};

/// Reads all nodes and ways of a `.osm.pbf` file.
///
/// Blobs of the file are decoded in parallel. Relations are not used by the tile format and are
/// skipped.
pub fn read_pbf(path: impl AsRef<Path>) -> Result<MapData, CartaError> {
    let path = path.as_ref();
    log::info!("Reading map source {}", path.display());

    let reader = BlobReader::from_path(path)?;
    ingest(reader.par_bridge().map(|blob| {
        let blob = blob?;
        Ok(match blob.decode()? {
            BlobDecode::OsmData(block) => DecodedBlock::Primitive(decode_block(&block)),
            BlobDecode::OsmHeader(_) => DecodedBlock::Other,
            BlobDecode::Unknown(kind) => {
                log::debug!("Skipping blob of unknown type {kind}");
                DecodedBlock::Other
            }
        })
    }))
}

fn decode_block(block: &PrimitiveBlock) -> Vec<PrimitiveGroup> {
    let mut groups = vec![];
    for group in block.groups() {
        let mut nodes: Vec<Node> = group
            .nodes()
            .map(|node| {
                Node::new(
                    node.id(),
                    Coordinate::new(node.lat(), node.lon()),
                    owned_tags(node.tags()),
                )
            })
            .collect();
        nodes.extend(group.dense_nodes().map(|node| {
            Node::new(
                node.id(),
                Coordinate::new(node.lat(), node.lon()),
                owned_tags(node.tags()),
            )
        }));

        let ways: Vec<Way> = group
            .ways()
            .map(|way| Way::new(way.id(), way.refs().collect(), owned_tags(way.tags())))
            .collect();

        if !nodes.is_empty() {
            groups.push(PrimitiveGroup::Nodes(nodes));
        }
        if !ways.is_empty() {
            groups.push(PrimitiveGroup::Ways(ways));
        }
    }

    groups
}

fn owned_tags<'a>(tags: impl Iterator<Item = (&'a str, &'a str)>) -> Vec<(String, String)> {
    tags.map(|(key, value)| (key.to_owned(), value.to_owned()))
        .collect()
}
