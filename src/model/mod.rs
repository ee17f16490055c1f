mod lane;
mod neighborhood;
mod node;
mod view;

pub use lane::{Direction, Lane, UnknownLane};
pub use neighborhood::Neighborhood;
pub use node::{Node, NodeKind, NodeRaw, decorate_id, label_from_type_path, strip_presentation};
pub use view::{HandlePosition, LaneState, Position, ViewEdge, ViewGraph, ViewNode, ViewNodeKind};
