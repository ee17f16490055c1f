mod json;
mod markdown;

pub use json::JsonOutput;
pub use markdown::MarkdownOutput;

use crate::model::{Lane, ViewGraph, ViewNode};
use crate::navigation::{NavigationController, NavigationState};
use serde::Serialize;
use std::io::Write;

pub trait OutputFormatter {
    fn format<W: Write>(&self, report: &ViewReport<'_>, writer: &mut W) -> std::io::Result<()>;
}

/// Everything a front end needs to draw the navigator at one instant.
#[derive(Debug, Clone, Serialize)]
pub struct ViewReport<'a> {
    pub view: &'a ViewGraph,
    pub state: NavigationState,
    pub breadcrumbs: Vec<Breadcrumb>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Breadcrumb {
    pub index: usize,
    pub focal_id: String,
    pub label: String,
}

impl<'a> ViewReport<'a> {
    /// Report for a standalone view with no navigation behind it.
    pub fn new(view: &'a ViewGraph) -> Self {
        Self {
            view,
            state: NavigationState {
                focal_id: Some(view.focal_id.clone()),
                ..NavigationState::default()
            },
            breadcrumbs: Vec::new(),
        }
    }

    pub fn from_controller(controller: &'a NavigationController) -> Self {
        Self {
            view: controller.current_view(),
            state: controller.state().clone(),
            breadcrumbs: breadcrumbs(controller),
        }
    }
}

pub fn breadcrumbs(controller: &NavigationController) -> Vec<Breadcrumb> {
    controller
        .breadcrumbs()
        .labels()
        .into_iter()
        .enumerate()
        .map(|(index, (focal_id, label))| Breadcrumb {
            index,
            focal_id,
            label,
        })
        .collect()
}

/// Neighbors and placeholders in display order: lane by lane, ordinal order,
/// placeholder last. Interactive front ends number entries by this order.
pub fn selectable_nodes(view: &ViewGraph) -> Vec<&ViewNode> {
    let mut nodes = Vec::new();
    for lane in Lane::ALL {
        nodes.extend(view.lane_nodes(lane));
        nodes.extend(view.placeholder(lane));
    }
    nodes
}
