//! I/O 支持：图与标识的 JSON、RON 序列化接口。
use std::fs;
use std::path::Path;

use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::net::structure::{Arc, Graph, Node, Place, Transition};

#[derive(Debug, Error)]
pub enum IoError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("ron error: {0}")]
    Ron(#[from] ron::Error),
    #[error("ron syntax error: {0}")]
    RonSpanned(#[from] ron::error::SpannedError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unsupported file extension: {0:?}")]
    UnknownFormat(String),
}

/// On-disk encodings understood by [`read_graph`] and [`write_value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Json,
    Ron,
}

impl Format {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, IoError> {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "json" => Ok(Format::Json),
            "ron" => Ok(Format::Ron),
            _ => Err(IoError::UnknownFormat(ext)),
        }
    }
}

pub fn to_json_string<T>(value: &T) -> Result<String, IoError>
where
    T: Serialize,
{
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn from_json_str<T>(s: &str) -> Result<T, IoError>
where
    T: DeserializeOwned,
{
    Ok(serde_json::from_str(s)?)
}

pub fn to_ron_string<T>(value: &T) -> Result<String, IoError>
where
    T: Serialize,
{
    let mut pretty = PrettyConfig::default();
    pretty.new_line = "\n".into();
    Ok(ron::ser::to_string_pretty(value, pretty)?)
}

pub fn from_ron_str<T>(s: &str) -> Result<T, IoError>
where
    T: DeserializeOwned,
{
    Ok(ron::from_str(s)?)
}

pub fn to_string<T: Serialize>(value: &T, format: Format) -> Result<String, IoError> {
    match format {
        Format::Json => to_json_string(value),
        Format::Ron => to_ron_string(value),
    }
}

pub fn from_str<T: DeserializeOwned>(s: &str, format: Format) -> Result<T, IoError> {
    match format {
        Format::Json => from_json_str(s),
        Format::Ron => from_ron_str(s),
    }
}

/// JSON 节点以 `"type"` 字段区分库所与迁移。
#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum JsonNode {
    Place(Place),
    Transition(Transition),
}

/// RON 没有内部标签，节点写作 `Place((..))` / `Transition((..))`。
#[derive(Serialize, Deserialize)]
enum RonNode {
    Place(Place),
    Transition(Transition),
}

macro_rules! node_repr {
    ($repr:ident) => {
        impl From<$repr> for Node {
            fn from(node: $repr) -> Self {
                match node {
                    $repr::Place(place) => Node::Place(place),
                    $repr::Transition(transition) => Node::Transition(transition),
                }
            }
        }

        impl From<&Node> for $repr {
            fn from(node: &Node) -> Self {
                match node {
                    Node::Place(place) => $repr::Place(place.clone()),
                    Node::Transition(transition) => $repr::Transition(transition.clone()),
                }
            }
        }
    };
}

node_repr!(JsonNode);
node_repr!(RonNode);

#[derive(Serialize, Deserialize)]
struct GraphRepr<N> {
    #[serde(default = "Vec::new")]
    nodes: Vec<N>,
    #[serde(default, alias = "edges")]
    arcs: Vec<Arc>,
}

impl<N> GraphRepr<N> {
    fn of(graph: &Graph) -> Self
    where
        N: for<'a> From<&'a Node>,
    {
        GraphRepr {
            nodes: graph.nodes().map(N::from).collect(),
            arcs: graph.arcs().cloned().collect(),
        }
    }

    fn into_graph(self) -> Graph
    where
        N: Into<Node>,
    {
        Graph::new(self.nodes.into_iter().map(Into::into).collect(), self.arcs)
    }
}

pub fn graph_to_string(graph: &Graph, format: Format) -> Result<String, IoError> {
    match format {
        Format::Json => to_json_string(&GraphRepr::<JsonNode>::of(graph)),
        Format::Ron => to_ron_string(&GraphRepr::<RonNode>::of(graph)),
    }
}

pub fn graph_from_str(s: &str, format: Format) -> Result<Graph, IoError> {
    let graph = match format {
        Format::Json => from_json_str::<GraphRepr<JsonNode>>(s)?.into_graph(),
        Format::Ron => from_ron_str::<GraphRepr<RonNode>>(s)?.into_graph(),
    };
    Ok(graph)
}

/// Loads a graph, picking the decoder from the file extension.
pub fn read_graph<P: AsRef<Path>>(path: P) -> Result<Graph, IoError> {
    let format = Format::from_path(&path)?;
    let content = fs::read_to_string(&path)?;
    let graph = graph_from_str(&content, format)?;
    log::info!(
        "loaded graph from {}: {} places, {} transitions",
        path.as_ref().display(),
        graph.places_len(),
        graph.transitions_len()
    );
    Ok(graph)
}

pub fn write_graph<P: AsRef<Path>>(path: P, graph: &Graph, format: Format) -> Result<(), IoError> {
    write_text(path, graph_to_string(graph, format)?)
}

pub fn write_value<P: AsRef<Path>, T: Serialize>(
    path: P,
    value: &T,
    format: Format,
) -> Result<(), IoError> {
    write_text(path, to_string(value, format)?)
}

fn write_text<P: AsRef<Path>>(path: P, text: String) -> Result<(), IoError> {
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::GatewayKind;

    const GRAPH_JSON: &str = r#"{
        "nodes": [
            { "type": "place", "id": "A", "text": "Start", "tokens": 1 },
            { "type": "place", "id": "C" },
            { "type": "transition", "id": "T2", "text": "Decide", "gatewayType": "106" }
        ],
        "edges": [
            { "id": "e1", "from": "A", "to": "T2" },
            { "id": "e2", "from": "T2", "to": "C", "weight": 3 }
        ]
    }"#;

    #[test]
    fn json_graph_accepts_operator_codes_and_defaults() {
        let graph = graph_from_str(GRAPH_JSON, Format::Json).unwrap();
        assert_eq!(graph.place("A").unwrap().label, "Start");
        assert_eq!(graph.place("C").unwrap().tokens, 0);
        assert_eq!(
            graph.transition("T2").unwrap().gateway,
            Some(GatewayKind::XorJoinSplit)
        );
        assert_eq!(graph.incoming("T2")[0].weight, 1);
        assert_eq!(graph.outgoing("T2")[0].weight, 3);
    }

    #[test]
    fn unknown_operator_code_is_rejected() {
        let json = GRAPH_JSON.replace("\"106\"", "\"103\"");
        assert!(graph_from_str(&json, Format::Json).is_err());
    }

    #[test]
    fn json_graph_reserialises_with_canonical_names() {
        let graph = graph_from_str(GRAPH_JSON, Format::Json).unwrap();
        let text = graph_to_string(&graph, Format::Json).unwrap();
        assert!(text.contains("\"type\": \"transition\""));
        assert!(text.contains("\"gateway\": \"XOR-join-split\""));
        let back = graph_from_str(&text, Format::Json).unwrap();
        assert_eq!(back, graph);
        assert_eq!(back.outgoing("T2").len(), 1);
    }

    #[test]
    fn marking_survives_ron() {
        let marking = crate::net::Marking::from_iter([("A", 1), ("C", 3)]);
        let text = to_ron_string(&marking).unwrap();
        let back: crate::net::Marking = from_ron_str(&text).unwrap();
        assert_eq!(back, marking);
    }

    #[test]
    fn write_then_read_graph_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nets").join("net.json");
        let graph = graph_from_str(GRAPH_JSON, Format::Json).unwrap();
        write_graph(&path, &graph, Format::Json).unwrap();
        assert_eq!(read_graph(&path).unwrap(), graph);
    }

    #[test]
    fn ron_graph_round_trips() {
        let graph = graph_from_str(GRAPH_JSON, Format::Json).unwrap();
        let text = graph_to_string(&graph, Format::Ron).unwrap();
        assert!(text.contains("Transition("));
        let back = graph_from_str(&text, Format::Ron).unwrap();
        assert_eq!(back, graph);
        assert_eq!(back.incoming("T2")[0].source, "A");
    }

    const GRAPH_RON: &str = r#"(
        nodes: [
            Place((id: "A", text: "Start", tokens: 1)),
            Place((id: "C")),
            Transition((id: "T2", text: "Decide", gatewayType: Some("106"))),
        ],
        edges: [
            (id: "e1", from: "A", to: "T2"),
            (id: "e2", from: "T2", to: "C", weight: 3),
        ],
    )"#;

    #[test]
    fn read_graph_from_ron_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("net.ron");
        fs::write(&path, GRAPH_RON).unwrap();
        let graph = read_graph(&path).unwrap();
        assert_eq!(graph, graph_from_str(GRAPH_JSON, Format::Json).unwrap());
        assert_eq!(
            graph.transition("T2").unwrap().gateway,
            Some(GatewayKind::XorJoinSplit)
        );

        let out = dir.path().join("copy.ron");
        write_graph(&out, &graph, Format::Ron).unwrap();
        assert_eq!(read_graph(&out).unwrap(), graph);
    }

    #[test]
    fn format_is_taken_from_extension() {
        assert_eq!(Format::from_path("x.RON").unwrap(), Format::Ron);
        assert!(matches!(
            Format::from_path("x.pnml"),
            Err(IoError::UnknownFormat(_))
        ));
    }
}
