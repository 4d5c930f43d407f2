//! 网的静态结构元素：库所、迁移、弧与图。
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::gateway::GatewayKind;
use crate::net::ids::{ArcId, NodeId};
use crate::net::incidence::Incidence;
use crate::net::index_vec::IndexVec;
use crate::net::marking::Marking;

pub type Weight = u64;

fn default_weight() -> Weight {
    1
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Debug)]
pub struct Place {
    pub id: String,
    #[serde(default, alias = "text")]
    pub label: String,
    /// Declared initial marking of this place.
    #[serde(default)]
    pub tokens: Weight,
}

impl Place {
    pub fn new(id: impl Into<String>, label: impl Into<String>, tokens: Weight) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            tokens,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Transition {
    pub id: String,
    #[serde(default, alias = "text")]
    pub label: String,
    #[serde(
        default,
        alias = "gatewayType",
        skip_serializing_if = "Option::is_none"
    )]
    pub gateway: Option<GatewayKind>,
}

impl Transition {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            gateway: None,
        }
    }

    pub fn new_gateway(id: impl Into<String>, label: impl Into<String>, kind: GatewayKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            gateway: Some(kind),
        }
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut t = f.debug_tuple("Transition");
        t.field(&self.id);
        if let Some(kind) = self.gateway {
            t.field(&kind);
        }
        t.finish()
    }
}

/// 序列化形式按文件格式而定，见 [`crate::net::io`]。
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Node {
    Place(Place),
    Transition(Transition),
}

impl Node {
    pub fn id(&self) -> &str {
        match self {
            Node::Place(place) => &place.id,
            Node::Transition(transition) => &transition.id,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Node::Place(place) => &place.label,
            Node::Transition(transition) => &transition.label,
        }
    }

    pub fn as_place(&self) -> Option<&Place> {
        match self {
            Node::Place(place) => Some(place),
            Node::Transition(_) => None,
        }
    }

    pub fn as_transition(&self) -> Option<&Transition> {
        match self {
            Node::Transition(transition) => Some(transition),
            Node::Place(_) => None,
        }
    }
}

impl From<Place> for Node {
    fn from(place: Place) -> Self {
        Node::Place(place)
    }
}

impl From<Transition> for Node {
    fn from(transition: Transition) -> Self {
        Node::Transition(transition)
    }
}

/// 有向带权弧。`source -> target` 中一端为库所，另一端为迁移。
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Arc {
    pub id: String,
    #[serde(alias = "from")]
    pub source: String,
    #[serde(alias = "to")]
    pub target: String,
    #[serde(default = "default_weight")]
    pub weight: Weight,
}

impl Arc {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        weight: Weight,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            weight,
        }
    }
}

impl fmt::Debug for Arc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} -> {} [{}]", self.id, self.source, self.target, self.weight)
    }
}

/// 已加载的网。构造后不可变，邻接索引在构造时一次性建立。
#[derive(Clone)]
pub struct Graph {
    nodes: IndexVec<NodeId, Node>,
    arcs: IndexVec<ArcId, Arc>,
    incidence: Incidence,
}

impl Graph {
    pub fn new(nodes: Vec<Node>, arcs: Vec<Arc>) -> Self {
        let nodes = IndexVec::from(nodes);
        let arcs = IndexVec::from(arcs);
        let incidence = Incidence::build(&nodes, &arcs);
        Self {
            nodes,
            arcs,
            incidence,
        }
    }

    pub fn builder() -> GraphBuilder {
        GraphBuilder::default()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn arcs(&self) -> impl Iterator<Item = &Arc> {
        self.arcs.iter()
    }

    pub fn places(&self) -> impl Iterator<Item = &Place> {
        self.nodes.iter().filter_map(Node::as_place)
    }

    pub fn transitions(&self) -> impl Iterator<Item = &Transition> {
        self.nodes.iter().filter_map(Node::as_transition)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.incidence.node_id(id).map(|node| &self.nodes[node])
    }

    pub fn place(&self, id: &str) -> Option<&Place> {
        self.node(id).and_then(Node::as_place)
    }

    pub fn transition(&self, id: &str) -> Option<&Transition> {
        self.node(id).and_then(Node::as_transition)
    }

    /// Arcs ending at `id`, in declared arc order.
    pub fn incoming(&self, id: &str) -> Vec<&Arc> {
        self.incidence
            .node_id(id)
            .map(|node| self.resolve(self.incidence.incoming(node)))
            .unwrap_or_default()
    }

    /// Arcs starting at `id`, in declared arc order.
    pub fn outgoing(&self, id: &str) -> Vec<&Arc> {
        self.incidence
            .node_id(id)
            .map(|node| self.resolve(self.incidence.outgoing(node)))
            .unwrap_or_default()
    }

    /// Display text for `id`; the raw id when the node has no label.
    pub fn label_of<'a>(&'a self, id: &'a str) -> &'a str {
        match self.node(id) {
            Some(node) if !node.label().is_empty() => node.label(),
            _ => id,
        }
    }

    pub fn initial_marking(&self) -> Marking {
        self.places()
            .map(|place| (place.id.clone(), place.tokens))
            .collect()
    }

    pub fn places_len(&self) -> usize {
        self.places().count()
    }

    pub fn transitions_len(&self) -> usize {
        self.transitions().count()
    }

    fn resolve(&self, ids: &[ArcId]) -> Vec<&Arc> {
        ids.iter().map(|arc| &self.arcs[*arc]).collect()
    }
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("nodes", &self.nodes)
            .field("arcs", &self.arcs)
            .finish()
    }
}

impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes && self.arcs == other.arcs
    }
}

/// 逐步构造 [`Graph`]，弧 id 自动生成为 `a0, a1, ...`。
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<Node>,
    arcs: Vec<Arc>,
}

impl GraphBuilder {
    pub fn place(mut self, id: &str, tokens: Weight) -> Self {
        self.nodes.push(Place::new(id, id, tokens).into());
        self
    }

    pub fn transition(mut self, id: &str) -> Self {
        self.nodes.push(Transition::new(id, id).into());
        self
    }

    pub fn gateway(mut self, id: &str, kind: GatewayKind) -> Self {
        self.nodes.push(Transition::new_gateway(id, id, kind).into());
        self
    }

    pub fn node(mut self, node: impl Into<Node>) -> Self {
        self.nodes.push(node.into());
        self
    }

    pub fn arc(self, source: &str, target: &str) -> Self {
        self.weighted_arc(source, target, 1)
    }

    pub fn weighted_arc(mut self, source: &str, target: &str, weight: Weight) -> Self {
        let id = format!("a{}", self.arcs.len());
        self.arcs.push(Arc::new(id, source, target, weight));
        self
    }

    pub fn build(self) -> Graph {
        Graph::new(self.nodes, self.arcs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Graph {
        Graph::builder()
            .place("p1", 2)
            .place("p2", 0)
            .transition("t1")
            .place("p3", 0)
            .weighted_arc("p1", "t1", 2)
            .arc("t1", "p2")
            .arc("t1", "p3")
            .build()
    }

    #[test]
    fn adjacency_follows_declared_arc_order() {
        let graph = sample();
        let outgoing = graph
            .outgoing("t1")
            .iter()
            .map(|arc| arc.target.as_str())
            .collect::<Vec<_>>();
        assert_eq!(outgoing, vec!["p2", "p3"]);
        assert_eq!(graph.incoming("t1").len(), 1);
        assert_eq!(graph.incoming("t1")[0].weight, 2);
        assert!(graph.incoming("missing").is_empty());
    }

    #[test]
    fn initial_marking_uses_declared_tokens() {
        let marking = sample().initial_marking();
        assert_eq!(marking.tokens("p1"), 2);
        assert_eq!(marking.tokens("p3"), 0);
        assert_eq!(marking.len(), 3);
    }

    #[test]
    fn label_falls_back_to_id() {
        let graph = Graph::new(
            vec![
                Place::new("p1", "", 0).into(),
                Place::new("p2", "Ready", 0).into(),
            ],
            vec![],
        );
        assert_eq!(graph.label_of("p1"), "p1");
        assert_eq!(graph.label_of("p2"), "Ready");
        assert_eq!(graph.label_of("nope"), "nope");
    }

    #[test]
    fn dangling_endpoint_is_indexed_on_known_side_only() {
        let graph = Graph::builder()
            .transition("t1")
            .arc("ghost", "t1")
            .build();
        assert_eq!(graph.incoming("t1").len(), 1);
        assert!(graph.outgoing("ghost").is_empty());
        assert_eq!(graph.arcs().count(), 1);
    }
}
