use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Separates a canonical id from its presentation suffix (`<uuid>#<suffix>`).
/// Canonical ids served by the REST API never contain this character.
pub const PRESENTATION_SEPARATOR: char = '#';

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Data,
    Calculation,
    Workflow,
    Process,
}

impl NodeKind {
    /// Classify a dotted type path such as `process.calculation.calcjob.CalcJobNode.`.
    pub fn from_type_path(node_type: &str) -> Self {
        if node_type.starts_with("process.calculation") {
            NodeKind::Calculation
        } else if node_type.starts_with("process.workflow") {
            NodeKind::Workflow
        } else if node_type == "process" || node_type.starts_with("process.") {
            NodeKind::Process
        } else {
            NodeKind::Data
        }
    }

    pub fn is_process(self) -> bool {
        !matches!(self, NodeKind::Data)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Data => "data",
            NodeKind::Calculation => "calculation",
            NodeKind::Workflow => "workflow",
            NodeKind::Process => "process",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A provenance graph node, keyed by its canonical id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub label: String,
    pub raw: NodeRaw,
}

/// Fields reported by the REST API for a node, kept as received.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NodeRaw {
    pub node_type: String,
    #[serde(default)]
    pub ctime: Option<DateTime<Utc>>,
    #[serde(default)]
    pub mtime: Option<DateTime<Utc>>,
    /// Only set when the node was reached through a link from a focal node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_label: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Node {
    pub fn new(id: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self::from_raw(
            id,
            NodeRaw {
                node_type: node_type.into(),
                ..Default::default()
            },
        )
    }

    pub fn from_raw(id: impl Into<String>, raw: NodeRaw) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::from_type_path(&raw.node_type),
            label: label_from_type_path(&raw.node_type),
            raw,
        }
    }

    pub fn with_link_label(mut self, link_label: impl Into<String>) -> Self {
        self.raw.link_label = Some(link_label.into());
        self
    }

    pub fn with_ctime(mut self, ctime: DateTime<Utc>) -> Self {
        self.raw.ctime = Some(ctime);
        self
    }

    pub fn link_label(&self) -> &str {
        self.raw.link_label.as_deref().unwrap_or("")
    }
}

/// Last non-empty segment of a dotted type path: `data.core.dict.Dict.` gives `Dict`.
pub fn label_from_type_path(node_type: &str) -> String {
    node_type
        .split('.')
        .filter(|segment| !segment.is_empty())
        .next_back()
        .unwrap_or("node")
        .to_string()
}

/// Build a rendering-unique id for a node that already appears in a view.
pub fn decorate_id(canonical: &str, suffix: &str) -> String {
    format!("{}{}{}", canonical, PRESENTATION_SEPARATOR, suffix)
}

/// Recover the canonical id from a presentation id. Canonical ids pass through unchanged.
pub fn strip_presentation(id: &str) -> &str {
    id.split_once(PRESENTATION_SEPARATOR)
        .map_or(id, |(canonical, _)| canonical)
}
