//! 节点到输入/输出弧的邻接索引，加载图时一次性建立。
use indexmap::IndexMap;
use indexmap::map::Entry;
use smallvec::SmallVec;

use crate::net::ids::{ArcId, NodeId};
use crate::net::index_vec::{Idx, IndexVec};
use crate::net::structure::{Arc, Node};

type ArcRow = SmallVec<[ArcId; 4]>;

#[derive(Clone, Debug, Default)]
pub struct Incidence {
    lookup: IndexMap<String, NodeId>,
    incoming: IndexVec<NodeId, ArcRow>,
    outgoing: IndexVec<NodeId, ArcRow>,
}

impl Incidence {
    pub fn build(nodes: &IndexVec<NodeId, Node>, arcs: &IndexVec<ArcId, Arc>) -> Self {
        let mut lookup = IndexMap::with_capacity(nodes.len());
        for (node_id, node) in nodes.iter_enumerated() {
            match lookup.entry(node.id().to_owned()) {
                Entry::Vacant(slot) => {
                    slot.insert(node_id);
                }
                Entry::Occupied(_) => {
                    log::warn!("duplicate node id '{}', keeping first declaration", node.id());
                }
            }
        }

        let mut incoming: Vec<ArcRow> = vec![ArcRow::new(); nodes.len()];
        let mut outgoing: Vec<ArcRow> = vec![ArcRow::new(); nodes.len()];

        for (arc_id, arc) in arcs.iter_enumerated() {
            match lookup.get(&arc.source) {
                Some(source) => outgoing[source.index()].push(arc_id),
                None => log::warn!("arc '{}' starts at unknown node '{}'", arc.id, arc.source),
            }
            match lookup.get(&arc.target) {
                Some(target) => incoming[target.index()].push(arc_id),
                None => log::warn!("arc '{}' ends at unknown node '{}'", arc.id, arc.target),
            }
        }

        Self {
            lookup,
            incoming: IndexVec::from(incoming),
            outgoing: IndexVec::from(outgoing),
        }
    }

    pub fn node_id(&self, id: &str) -> Option<NodeId> {
        self.lookup.get(id).copied()
    }

    pub fn incoming(&self, node: NodeId) -> &[ArcId] {
        self.incoming.get(node).map(|row| row.as_slice()).unwrap_or(&[])
    }

    pub fn outgoing(&self, node: NodeId) -> &[ArcId] {
        self.outgoing.get(node).map(|row| row.as_slice()).unwrap_or(&[])
    }
}
