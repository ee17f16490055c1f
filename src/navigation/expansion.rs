use super::NavigationError;
use crate::layout::{IdAllocator, push_neighbor};
use crate::model::{Lane, Position, ViewGraph, ViewNode, ViewNodeKind};
use serde::Serialize;

/// Result of revealing one more page of a lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Expansion {
    pub lane: Lane,
    pub added: usize,
    pub remaining: usize,
}

/// Reveal the next `page_size` hidden neighbors of `lane`.
///
/// New entries take the placeholder's slot and continue downward by
/// `row_spacing`. Nothing already placed moves: the only existing entry that
/// changes is the placeholder, which moves below the new page or disappears
/// once the lane is exhausted.
pub fn load_more(
    view: &mut ViewGraph,
    lane: Lane,
    page_size: usize,
    row_spacing: f32,
) -> Result<Expansion, NavigationError> {
    let index = view
        .nodes
        .iter()
        .position(|n| n.is_placeholder() && n.lane() == Some(lane))
        .ok_or(NavigationError::NoPlaceholder(lane))?;

    let placeholder = view.nodes.remove(index);
    let anchor = placeholder.position;
    let mut remainder = match placeholder.kind {
        ViewNodeKind::Placeholder { remainder, .. } => remainder,
        _ => Vec::new(),
    };

    let take = page_size.max(1).min(remainder.len());
    let page: Vec<_> = remainder.drain(..take).collect();

    let focal_view_id = view
        .focal()
        .map(|n| n.id.clone())
        .unwrap_or_else(|| view.focal_id.clone());
    let first_ordinal = view.lane_nodes(lane).len();
    let mut ids = IdAllocator::from_view(view);

    for (offset, node) in page.iter().enumerate() {
        let position = Position::new(anchor.x, anchor.y + offset as f32 * row_spacing);
        let view_id = ids.allocate(&node.id);
        push_neighbor(
            view,
            &focal_view_id,
            view_id,
            position,
            node,
            lane,
            first_ordinal + offset,
        );
    }

    let remaining = remainder.len();
    if remaining > 0 {
        let position = Position::new(anchor.x, anchor.y + take as f32 * row_spacing);
        view.nodes
            .push(ViewNode::placeholder(lane, position, remainder));
    }

    Ok(Expansion {
        lane,
        added: take,
        remaining,
    })
}
