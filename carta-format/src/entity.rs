//! Map entities as they come from the map source.

use std::collections::BTreeMap;

use ahash::AHashMap;
use carta_types::Coordinate;
use serde::{Deserialize, Serialize};

use crate::tiling::tile_id;

/// Single point of the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Id of the node, unique among all nodes of the source.
    pub id: i64,
    /// Position of the node.
    pub coordinate: Coordinate,
    /// Tags of the node in source order.
    pub tags: Vec<(String, String)>,
}

impl Node {
    /// Creates a new node.
    pub fn new(id: i64, coordinate: Coordinate, tags: Vec<(String, String)>) -> Self {
        Self {
            id,
            coordinate,
            tags,
        }
    }
}

/// Ordered list of nodes, e.g. a road or a building outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Way {
    /// Id of the way.
    pub id: i64,
    /// Ids of the nodes the way goes through.
    pub node_ids: Vec<i64>,
    /// Tags of the way in source order.
    pub tags: Vec<(String, String)>,
}

impl Way {
    /// Creates a new way.
    pub fn new(id: i64, node_ids: Vec<i64>, tags: Vec<(String, String)>) -> Self {
        Self { id, node_ids, tags }
    }
}

/// All entities of a map, with nodes grouped by the tile they belong to.
#[derive(Debug, Clone, Default)]
pub struct MapData {
    nodes: AHashMap<i64, Node>,
    tiles: BTreeMap<u32, Vec<i64>>,
    ways: Vec<Way>,
}

impl MapData {
    /// Groups the nodes into tiles and creates the map.
    ///
    /// Node ids inside every tile are sorted, so the result does not depend on the iteration
    /// order of the node map.
    pub fn new(nodes: AHashMap<i64, Node>, ways: Vec<Way>) -> Self {
        let mut tiles: BTreeMap<u32, Vec<i64>> = BTreeMap::new();
        for node in nodes.values() {
            tiles
                .entry(tile_id(&node.coordinate))
                .or_default()
                .push(node.id);
        }

        for ids in tiles.values_mut() {
            ids.sort_unstable();
        }

        Self { nodes, tiles, ways }
    }

    /// Creates the map from lists of entities. Later nodes replace earlier ones with the same id.
    pub fn from_entities(
        nodes: impl IntoIterator<Item = Node>,
        ways: impl IntoIterator<Item = Way>,
    ) -> Self {
        let nodes = nodes.into_iter().map(|n| (n.id, n)).collect();
        Self::new(nodes, ways.into_iter().collect())
    }

    /// Node by its id.
    pub fn node(&self, id: i64) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// All nodes by their ids.
    pub fn nodes(&self) -> &AHashMap<i64, Node> {
        &self.nodes
    }

    /// Ids of the nodes in every tile, by ascending tile id.
    pub fn tiles(&self) -> &BTreeMap<u32, Vec<i64>> {
        &self.tiles
    }

    /// All ways.
    pub fn ways(&self) -> &[Way] {
        &self.ways
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn nodes_are_partitioned_into_tiles() {
        let nodes: Vec<Node> = (0..200)
            .map(|i| {
                Node::new(
                    i,
                    Coordinate::new(50.0 + i as f64 * 0.013, 10.0 - i as f64 * 0.007),
                    vec![],
                )
            })
            .collect();
        let map = MapData::from_entities(nodes.clone(), vec![]);

        let mut seen = HashSet::new();
        for (tile, ids) in map.tiles() {
            for id in ids {
                assert!(seen.insert(*id), "node {id} is in more than one tile");
                let node = map.node(*id).unwrap();
                assert_eq!(tile_id(&node.coordinate), *tile);
            }
        }

        assert_eq!(seen.len(), nodes.len());
    }

    #[test]
    fn later_node_wins() {
        let map = MapData::from_entities(
            [
                Node::new(1, Coordinate::new(1.0, 1.0), vec![]),
                Node::new(1, Coordinate::new(2.0, 2.0), vec![]),
            ],
            [],
        );

        assert_eq!(map.nodes().len(), 1);
        assert_eq!(map.node(1).unwrap().coordinate, Coordinate::new(2.0, 2.0));
        assert_eq!(map.tiles().values().map(Vec::len).sum::<usize>(), 1);
    }
}
