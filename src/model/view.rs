use super::{Direction, Lane, Node, strip_presentation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Side of a node an edge attaches to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HandlePosition {
    Left,
    Right,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewNodeKind {
    Focal {
        node: Node,
    },
    Neighbor {
        node: Node,
        lane: Lane,
        ordinal: usize,
        /// The node the user navigated away from to reach this view.
        came_from: bool,
    },
    /// "Load more" entry standing in for the rest of a lane.
    Placeholder {
        lane: Lane,
        count: usize,
        remainder: Vec<Node>,
    },
}

/// A positioned entry of the rendered view.
///
/// `id` is unique within the view. For graph nodes it is the canonical id, or a
/// decorated presentation id when the same node is shown more than once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViewNode {
    pub id: String,
    pub position: Position,
    #[serde(flatten)]
    pub kind: ViewNodeKind,
}

impl ViewNode {
    pub fn placeholder_id(lane: Lane) -> String {
        format!("{}-load-more", lane)
    }

    pub fn placeholder(lane: Lane, position: Position, remainder: Vec<Node>) -> Self {
        Self {
            id: Self::placeholder_id(lane),
            position,
            kind: ViewNodeKind::Placeholder {
                lane,
                count: remainder.len(),
                remainder,
            },
        }
    }

    pub fn canonical_id(&self) -> &str {
        strip_presentation(&self.id)
    }

    /// The graph node behind this entry, `None` for placeholders.
    pub fn node(&self) -> Option<&Node> {
        match &self.kind {
            ViewNodeKind::Focal { node } | ViewNodeKind::Neighbor { node, .. } => Some(node),
            ViewNodeKind::Placeholder { .. } => None,
        }
    }

    pub fn lane(&self) -> Option<Lane> {
        match &self.kind {
            ViewNodeKind::Focal { .. } => None,
            ViewNodeKind::Neighbor { lane, .. } | ViewNodeKind::Placeholder { lane, .. } => {
                Some(*lane)
            }
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.kind, ViewNodeKind::Placeholder { .. })
    }

    pub fn is_focal(&self) -> bool {
        matches!(self.kind, ViewNodeKind::Focal { .. })
    }

    pub fn came_from(&self) -> bool {
        matches!(
            self.kind,
            ViewNodeKind::Neighbor {
                came_from: true,
                ..
            }
        )
    }

    pub fn display_label(&self) -> String {
        match &self.kind {
            ViewNodeKind::Focal { node } | ViewNodeKind::Neighbor { node, .. } => {
                node.label.clone()
            }
            ViewNodeKind::Placeholder { count, .. } => format!("+{} more", count),
        }
    }
}

/// Edge between the focal node and one of its direct neighbors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViewEdge {
    pub id: String,
    /// View node id of the edge start.
    pub source: String,
    /// View node id of the edge end.
    pub target: String,
    pub link_label: String,
    pub direction: Direction,
    pub lane: Lane,
    pub ordinal: usize,
    pub source_position: HandlePosition,
    pub target_position: HandlePosition,
}

/// A complete, ready-to-render view centered on one focal node.
///
/// Breadcrumbs store these as-is, so restoring one never needs the network.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ViewGraph {
    pub focal_id: String,
    pub label: String,
    pub nodes: Vec<ViewNode>,
    pub edges: Vec<ViewEdge>,
}

/// Shown and still-hidden neighbors of one lane.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaneState {
    pub shown: Vec<Node>,
    pub remainder: Vec<Node>,
}

impl LaneState {
    pub fn has_placeholder(&self) -> bool {
        !self.remainder.is_empty()
    }
}

impl ViewGraph {
    pub fn new(focal_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            focal_id: focal_id.into(),
            label: label.into(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&ViewNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Look a node up by view id first, then by canonical id.
    pub fn find(&self, id: &str) -> Option<&ViewNode> {
        self.node(id).or_else(|| {
            let canonical = strip_presentation(id);
            self.nodes
                .iter()
                .find(|n| !n.is_placeholder() && n.canonical_id() == canonical)
        })
    }

    pub fn focal(&self) -> Option<&ViewNode> {
        self.nodes.iter().find(|n| n.is_focal())
    }

    pub fn placeholder(&self, lane: Lane) -> Option<&ViewNode> {
        self.nodes
            .iter()
            .find(|n| n.is_placeholder() && n.lane() == Some(lane))
    }

    /// Neighbor entries of a lane in ordinal order.
    pub fn lane_nodes(&self, lane: Lane) -> Vec<&ViewNode> {
        let mut nodes: Vec<_> = self
            .nodes
            .iter()
            .filter(|n| !n.is_placeholder() && n.lane() == Some(lane))
            .collect();
        nodes.sort_by_key(|n| match n.kind {
            ViewNodeKind::Neighbor { ordinal, .. } => ordinal,
            _ => 0,
        });
        nodes
    }

    pub fn lane_state(&self, lane: Lane) -> LaneState {
        let shown = self
            .lane_nodes(lane)
            .into_iter()
            .filter_map(|n| n.node().cloned())
            .collect();
        let remainder = match self.placeholder(lane).map(|p| &p.kind) {
            Some(ViewNodeKind::Placeholder { remainder, .. }) => remainder.clone(),
            _ => Vec::new(),
        };
        LaneState { shown, remainder }
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    /// Flag the neighbors whose canonical id is `previous_focal_id`.
    pub fn mark_came_from(&mut self, previous_focal_id: &str) {
        for node in &mut self.nodes {
            let matches = node.canonical_id() == previous_focal_id;
            if let ViewNodeKind::Neighbor { came_from, .. } = &mut node.kind {
                *came_from = matches;
            }
        }
    }
}
