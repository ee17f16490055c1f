//! Deterministic placement of a focal node and its neighbors.
//!
//! The focal node sits at a fixed origin. Inputs are drawn on the negative-x
//! side, outputs on the positive-x side. Each side has two columns: the
//! primary one next to the focal node and the secondary one a `lane_gap`
//! further out, so data and process lanes never overlap. Which category is
//! primary depends on the [`LayoutPolicy`].

mod ids;

pub(crate) use ids::IdAllocator;

use crate::model::{
    Direction, HandlePosition, Lane, Neighborhood, Node, NodeKind, Position, ViewEdge, ViewGraph,
    ViewNode, ViewNodeKind,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Decides which category takes the column closest to the focal node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutPolicy {
    /// Data lanes are always primary, process lanes secondary.
    #[default]
    FourLane,
    /// Around a data node the processes that created or consumed it are
    /// primary; around calculations and workflows the data lanes are.
    FocalAware,
}

impl LayoutPolicy {
    /// 0 for the primary column, 1 for the secondary one.
    pub fn column(self, focal: NodeKind, lane: Lane) -> usize {
        let process_primary = match self {
            LayoutPolicy::FourLane => false,
            LayoutPolicy::FocalAware => focal == NodeKind::Data,
        };
        if lane.is_process() == process_primary {
            0
        } else {
            1
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    pub policy: LayoutPolicy,
    /// Neighbors placed per lane before a "load more" placeholder.
    pub page_size: usize,
    pub center: Position,
    /// Horizontal distance from the focal node to the primary column.
    pub column_gap: f32,
    /// Horizontal distance from the primary column to the secondary column.
    pub lane_gap: f32,
    pub row_spacing: f32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            policy: LayoutPolicy::default(),
            page_size: DEFAULT_PAGE_SIZE,
            center: Position::new(600.0, 400.0),
            column_gap: 320.0,
            lane_gap: 240.0,
            row_spacing: 72.0,
        }
    }
}

impl LayoutOptions {
    pub fn page_size(&self) -> usize {
        self.page_size.max(1)
    }

    pub fn lane_x(&self, focal: NodeKind, lane: Lane) -> f32 {
        let column = self.policy.column(focal, lane) as f32;
        let offset = self.column_gap + self.lane_gap * column;
        match lane.direction() {
            Direction::Input => self.center.x - offset,
            Direction::Output => self.center.x + offset,
        }
    }

    /// Vertical position of slot `index` in a lane of `slots` entries, centered
    /// on the focal node. An odd lane puts its middle entry level with it.
    pub fn slot_y(&self, index: usize, slots: usize) -> f32 {
        let middle = (slots.saturating_sub(1)) as f32 / 2.0;
        self.center.y + (index as f32 - middle) * self.row_spacing
    }
}

/// Lay out `focal` and the first page of every lane of `neighborhood`.
///
/// Positions depend only on the arguments. Presentation ids for nodes shown
/// twice carry a random suffix, which never influences placement.
pub fn layout(focal: &Node, neighborhood: &Neighborhood, options: &LayoutOptions) -> ViewGraph {
    let mut view = ViewGraph::new(focal.id.clone(), focal.label.clone());
    let mut ids = IdAllocator::default();

    let focal_view_id = ids.allocate(&focal.id);
    view.nodes.push(ViewNode {
        id: focal_view_id.clone(),
        position: options.center,
        kind: ViewNodeKind::Focal {
            node: focal.clone(),
        },
    });

    let page_size = options.page_size();
    for lane in Lane::ALL {
        let all = neighborhood.lane(lane);
        let (shown, remainder) = if neighborhood.has_more(lane, page_size) {
            all.split_at(page_size)
        } else {
            (all, &[][..])
        };
        let slots = shown.len() + usize::from(!remainder.is_empty());
        let x = options.lane_x(focal.kind, lane);

        for (ordinal, node) in shown.iter().enumerate() {
            let position = Position::new(x, options.slot_y(ordinal, slots));
            let view_id = ids.allocate(&node.id);
            push_neighbor(&mut view, &focal_view_id, view_id, position, node, lane, ordinal);
        }

        if !remainder.is_empty() {
            let position = Position::new(x, options.slot_y(shown.len(), slots));
            view.nodes
                .push(ViewNode::placeholder(lane, position, remainder.to_vec()));
        }
    }

    view
}

/// Append a neighbor entry and its edge to the focal node.
pub(crate) fn push_neighbor(
    view: &mut ViewGraph,
    focal_view_id: &str,
    view_id: String,
    position: Position,
    node: &Node,
    lane: Lane,
    ordinal: usize,
) {
    view.edges
        .push(neighbor_edge(focal_view_id, &view_id, node, lane, ordinal));
    view.nodes.push(ViewNode {
        id: view_id,
        position,
        kind: ViewNodeKind::Neighbor {
            node: node.clone(),
            lane,
            ordinal,
            came_from: false,
        },
    });
}

/// Edge between the focal node and a neighbor. Inputs point at the focal
/// node, outputs away from it; both leave from the right handle and enter on
/// the left one.
pub fn neighbor_edge(
    focal_view_id: &str,
    neighbor_view_id: &str,
    node: &Node,
    lane: Lane,
    ordinal: usize,
) -> ViewEdge {
    let direction = lane.direction();
    let (source, target) = match direction {
        Direction::Input => (neighbor_view_id, focal_view_id),
        Direction::Output => (focal_view_id, neighbor_view_id),
    };

    ViewEdge {
        id: format!("{}->{}:{}", source, target, ordinal),
        source: source.to_string(),
        target: target.to_string(),
        link_label: node.link_label().to_string(),
        direction,
        lane,
        ordinal,
        source_position: HandlePosition::Right,
        target_position: HandlePosition::Left,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::strip_presentation;

    const INT: &str = "data.core.int.Int.";
    const CALC: &str = "process.calculation.calcjob.CalcJobNode.";

    fn neighborhood_with(focal: &Node, lane: Lane, count: usize) -> Neighborhood {
        let mut neighborhood = Neighborhood::new(focal.clone());
        let node_type = if lane.is_process() { CALC } else { INT };
        for i in 1..=count {
            neighborhood
                .lane_mut(lane)
                .push(Node::new(format!("{}-{}", lane, i), node_type).with_link_label(format!("l{}", i)));
        }
        neighborhood
    }

    fn placeholders(view: &ViewGraph) -> Vec<&ViewNode> {
        view.nodes.iter().filter(|n| n.is_placeholder()).collect()
    }

    #[test]
    fn test_focal_at_center() {
        let focal = Node::new("f", CALC);
        let options = LayoutOptions::default();

        let view = layout(&focal, &Neighborhood::new(focal.clone()), &options);

        assert_eq!(view.nodes.len(), 1);
        assert_eq!(view.focal().unwrap().position, options.center);
        assert_eq!(view.focal_id, "f");
        assert_eq!(view.label, "CalcJobNode");
        assert!(view.edges.is_empty());
    }

    #[test]
    fn test_no_placeholder_up_to_page_size() {
        let focal = Node::new("f", CALC);
        for count in [0, 1, 9, 10] {
            let view = layout(
                &focal,
                &neighborhood_with(&focal, Lane::InputData, count),
                &LayoutOptions::default(),
            );
            assert!(placeholders(&view).is_empty(), "count {}", count);
            assert_eq!(view.edges.len(), count);
        }
    }

    #[test]
    fn test_single_placeholder_beyond_page_size() {
        let focal = Node::new("f", CALC);
        let view = layout(
            &focal,
            &neighborhood_with(&focal, Lane::OutputData, 23),
            &LayoutOptions::default(),
        );

        let holders = placeholders(&view);
        assert_eq!(holders.len(), 1);
        match &holders[0].kind {
            ViewNodeKind::Placeholder {
                lane,
                count,
                remainder,
            } => {
                assert_eq!(*lane, Lane::OutputData);
                assert_eq!(*count, 13);
                assert_eq!(remainder.len(), 13);
                assert_eq!(remainder[0].id, "output-data-11");
            }
            other => panic!("expected placeholder, got {:?}", other),
        }
        assert_eq!(view.lane_nodes(Lane::OutputData).len(), 10);
        assert_eq!(view.edges.len(), 10);
    }

    #[test]
    fn test_inputs_left_outputs_right() {
        let focal = Node::new("f", CALC);
        let mut neighborhood = Neighborhood::new(focal.clone());
        for lane in Lane::ALL {
            let node_type = if lane.is_process() { CALC } else { INT };
            neighborhood
                .lane_mut(lane)
                .push(Node::new(lane.as_str(), node_type));
        }
        let options = LayoutOptions::default();

        let view = layout(&focal, &neighborhood, &options);

        let x = |id: &str| view.node(id).unwrap().position.x;
        assert!(x("input-data") < options.center.x);
        assert!(x("input-process") < x("input-data"));
        assert!(x("output-data") > options.center.x);
        assert!(x("output-process") > x("output-data"));
    }

    #[test]
    fn test_odd_lane_centered_on_middle_node() {
        let focal = Node::new("f", CALC);
        let options = LayoutOptions::default();

        let view = layout(&focal, &neighborhood_with(&focal, Lane::InputData, 3), &options);

        let ys: Vec<f32> = view
            .lane_nodes(Lane::InputData)
            .iter()
            .map(|n| n.position.y)
            .collect();
        assert_eq!(ys[1], options.center.y);
        assert_eq!(ys[0], options.center.y - options.row_spacing);
        assert_eq!(ys[2], options.center.y + options.row_spacing);
    }

    #[test]
    fn test_edges_point_toward_output() {
        let focal = Node::new("f", CALC);
        let mut neighborhood = Neighborhood::new(focal.clone());
        neighborhood
            .input_data
            .push(Node::new("in", INT).with_link_label("x"));
        neighborhood
            .output_data
            .push(Node::new("out", INT).with_link_label("result"));

        let view = layout(&focal, &neighborhood, &LayoutOptions::default());

        let input = view.edges.iter().find(|e| e.lane == Lane::InputData).unwrap();
        assert_eq!((input.source.as_str(), input.target.as_str()), ("in", "f"));
        assert_eq!(input.link_label, "x");
        assert_eq!(input.direction, Direction::Input);

        let output = view.edges.iter().find(|e| e.lane == Lane::OutputData).unwrap();
        assert_eq!((output.source.as_str(), output.target.as_str()), ("f", "out"));
        assert_eq!(output.source_position, HandlePosition::Right);
        assert_eq!(output.target_position, HandlePosition::Left);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let focal = Node::new("f", CALC);
        let mut neighborhood = neighborhood_with(&focal, Lane::InputData, 14);
        // A node linked both ways is drawn twice and gets a decorated id
        neighborhood.output_data.push(Node::new("input-data-1", INT));
        let options = LayoutOptions::default();

        let first = layout(&focal, &neighborhood, &options);
        let second = layout(&focal, &neighborhood, &options);

        let positions = |view: &ViewGraph| -> Vec<(String, f32, f32)> {
            view.nodes
                .iter()
                .map(|n| (n.canonical_id().to_string(), n.position.x, n.position.y))
                .collect()
        };
        let endpoints = |view: &ViewGraph| -> Vec<(String, String)> {
            view.edges
                .iter()
                .map(|e| {
                    (
                        strip_presentation(&e.source).to_string(),
                        strip_presentation(&e.target).to_string(),
                    )
                })
                .collect()
        };
        assert_eq!(positions(&first), positions(&second));
        assert_eq!(endpoints(&first), endpoints(&second));
    }

    #[test]
    fn test_duplicate_neighbor_gets_unique_view_id() {
        let focal = Node::new("f", CALC);
        let mut neighborhood = Neighborhood::new(focal.clone());
        neighborhood.input_data.push(Node::new("d", INT));
        neighborhood.output_data.push(Node::new("d", INT));

        let view = layout(&focal, &neighborhood, &LayoutOptions::default());

        let ids: Vec<_> = view.nodes.iter().map(|n| n.id.clone()).collect();
        assert_eq!(ids.len(), 3);
        assert_eq!(ids[1], "d");
        assert_ne!(ids[2], "d");
        assert_eq!(strip_presentation(&ids[2]), "d");
    }

    #[test]
    fn test_focal_aware_policy_swaps_columns_for_data_focal() {
        let data_focal = Node::new("f", INT);
        let options = LayoutOptions {
            policy: LayoutPolicy::FocalAware,
            ..Default::default()
        };

        assert!(
            options.lane_x(data_focal.kind, Lane::InputProcess)
                > options.lane_x(data_focal.kind, Lane::InputData)
        );
        assert_eq!(
            options.lane_x(NodeKind::Workflow, Lane::OutputData),
            LayoutOptions::default().lane_x(NodeKind::Workflow, Lane::OutputData)
        );
        assert_eq!(LayoutPolicy::FocalAware.column(NodeKind::Data, Lane::OutputProcess), 0);
        assert_eq!(LayoutPolicy::FourLane.column(NodeKind::Data, Lane::OutputProcess), 1);
    }
}
