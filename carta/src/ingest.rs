//! Collecting of decoded map entities into [`MapData`].
//!
//! Map sources are split into independent blocks (see [`source`](crate::source)). Blocks are
//! consumed in parallel: every worker accumulates the entities of the blocks it processes into its
//! own node map and way list, and the partial results are merged when workers finish. Nothing is
//! shared between workers while they run, so no locking is needed.

use ahash::AHashMap;
use carta_format::{MapData, Node, Way};
use rayon::prelude::*;

use crate::error::CartaError;

/// Block of a map source after decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedBlock {
    /// Block with map entities.
    Primitive(Vec<PrimitiveGroup>),
    /// Any other block (file header, unknown extensions). Ignored.
    Other,
}

/// Group of entities of the same type inside a block.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveGroup {
    /// Nodes.
    Nodes(Vec<Node>),
    /// Ways.
    Ways(Vec<Way>),
}

#[derive(Debug, Default)]
struct Partial {
    nodes: AHashMap<i64, Node>,
    ways: Vec<Way>,
}

impl Partial {
    fn add_block(mut self, block: DecodedBlock) -> Self {
        let DecodedBlock::Primitive(groups) = block else {
            log::trace!("Skipping non-primitive block");
            return self;
        };

        for group in groups {
            match group {
                PrimitiveGroup::Nodes(nodes) => {
                    self.nodes.extend(nodes.into_iter().map(|n| (n.id, n)));
                }
                PrimitiveGroup::Ways(ways) => self.ways.extend(ways),
            }
        }

        self
    }

    fn merge(mut self, mut other: Self) -> Self {
        if self.nodes.len() < other.nodes.len() {
            std::mem::swap(&mut self.nodes, &mut other.nodes);
        }
        self.nodes.extend(other.nodes);
        self.ways.append(&mut other.ways);

        self
    }
}

/// Collects entities from a parallel stream of decoded blocks.
///
/// Blocks may come in any order. If the same node id appears more than once, one of the nodes is
/// kept. The first error of the stream aborts ingestion.
pub fn ingest<I>(blocks: I) -> Result<MapData, CartaError>
where
    I: ParallelIterator<Item = Result<DecodedBlock, CartaError>>,
{
    let partial = blocks
        .try_fold(Partial::default, |partial, block| Ok::<_, CartaError>(partial.add_block(block?)))
        .try_reduce(Partial::default, |a, b| Ok(a.merge(b)))?;

    let map = MapData::new(partial.nodes, partial.ways);
    log::info!(
        "Ingested {} nodes in {} tiles and {} ways",
        map.nodes().len(),
        map.tiles().len(),
        map.ways().len()
    );

    Ok(map)
}

/// Collects entities from already decoded blocks.
pub fn ingest_blocks(blocks: Vec<DecodedBlock>) -> MapData {
    let partial = blocks
        .into_par_iter()
        .fold(Partial::default, Partial::add_block)
        .reduce(Partial::default, Partial::merge);

    MapData::new(partial.nodes, partial.ways)
}
