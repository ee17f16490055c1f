//! End-to-end navigation through the public library API.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use provnav::cli::OutputFormat;
use provnav::fetch::{FetchError, LinkQuery, NodeRecord};
use provnav::model::{Direction, Lane, NodeKind};
use provnav::navigation::{NavigationOptions, NavigationOutcome, NavigationPhase};
use provnav::output::ViewReport;
use provnav::{Config, NodeSource, controller_with_source, render};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

const INT: &str = "data.core.int.Int.";
const DICT: &str = "data.core.dict.Dict.";
const CALC: &str = "process.calculation.calcfunction.CalcFunctionNode.";
const WORK: &str = "process.workflow.workchain.WorkChainNode.";

/// In-memory provenance graph. Links are stored once and served from both
/// ends.
#[derive(Default)]
struct Provenance {
    nodes: HashMap<String, NodeRecord>,
    incoming: HashMap<String, Vec<NodeRecord>>,
    outgoing: HashMap<String, Vec<NodeRecord>>,
    requests: AtomicUsize,
}

impl Provenance {
    fn node(mut self, id: &str, node_type: &str) -> Self {
        self.nodes
            .insert(id.to_string(), NodeRecord::new(id, node_type));
        self
    }

    fn created(mut self, id: &str, minute: u32) -> Self {
        if let Some(record) = self.nodes.get_mut(id) {
            record.raw.ctime = Utc.with_ymd_and_hms(2024, 5, 1, 12, minute, 0).single();
        }
        self
    }

    fn link(mut self, from: &str, to: &str, label: &str) -> Self {
        let mut source = self.nodes[from].clone();
        source.raw.link_label = Some(label.to_string());
        let mut target = self.nodes[to].clone();
        target.raw.link_label = Some(label.to_string());
        self.incoming.entry(to.to_string()).or_default().push(source);
        self.outgoing.entry(from.to_string()).or_default().push(target);
        self
    }

    fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NodeSource for Provenance {
    async fn node(&self, id: &str) -> Result<NodeRecord, FetchError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.nodes
            .get(id)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(id.to_string()))
    }

    async fn links(&self, id: &str, query: &LinkQuery) -> Result<Vec<NodeRecord>, FetchError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let links = match query.direction {
            Direction::Input => self.incoming.get(id),
            Direction::Output => self.outgoing.get(id),
        };
        let prefix = query.full_type.trim_end_matches("%|");
        Ok(links
            .into_iter()
            .flatten()
            .filter(|r| r.raw.node_type.starts_with(prefix))
            .cloned()
            .collect())
    }
}

/// wf calls add(x, y) -> sum, then double(sum) -> result.
fn provenance() -> Provenance {
    Provenance::default()
        .node("wf", WORK)
        .node("x", INT)
        .node("y", INT)
        .node("add", CALC)
        .created("add", 1)
        .node("sum", INT)
        .node("double", CALC)
        .created("double", 2)
        .node("result", DICT)
        .link("wf", "add", "CALL")
        .link("wf", "double", "CALL")
        .link("x", "add", "x")
        .link("y", "add", "y")
        .link("add", "sum", "result")
        .link("sum", "double", "value")
        .link("double", "result", "result")
}

fn config() -> Config {
    Config {
        navigation: NavigationOptions::immediate(),
        ..Config::default()
    }
}

fn lane_ids(controller: &provnav::NavigationController, lane: Lane) -> Vec<String> {
    controller
        .current_view()
        .lane_nodes(lane)
        .iter()
        .map(|n| n.canonical_id().to_string())
        .collect()
}

#[tokio::test]
async fn test_walk_forward_and_jump_back() {
    let source = Arc::new(provenance());
    let mut nav = controller_with_source(&config(), source.clone());

    nav.open("add").await.unwrap();
    assert_eq!(lane_ids(&nav, Lane::InputData), vec!["x", "y"]);
    assert_eq!(lane_ids(&nav, Lane::InputProcess), vec!["wf"]);
    assert_eq!(lane_ids(&nav, Lane::OutputData), vec!["sum"]);
    let add_view = nav.current_view().clone();

    nav.on_node_selected("sum").await.unwrap();
    assert_eq!(lane_ids(&nav, Lane::InputProcess), vec!["add"]);
    assert_eq!(lane_ids(&nav, Lane::OutputProcess), vec!["double"]);

    nav.on_node_selected("double").await.unwrap();
    assert_eq!(nav.current_view().focal().unwrap().node().unwrap().kind, NodeKind::Calculation);
    let trail: Vec<_> = nav.breadcrumbs().iter().map(|v| v.focal_id.clone()).collect();
    assert_eq!(trail, vec!["add", "sum"]);

    let requests = source.requests();
    let outcome = nav.on_breadcrumb_selected(0).unwrap();
    assert_eq!(
        outcome,
        NavigationOutcome::Restored {
            focal_id: "add".to_string()
        }
    );
    assert_eq!(nav.current_view(), &add_view);
    assert_eq!(nav.breadcrumbs().len(), 1);
    assert_eq!(source.requests(), requests);
    assert_eq!(nav.state().phase, NavigationPhase::Idle);
}

#[tokio::test]
async fn test_revisit_is_served_from_cache() {
    let source = Arc::new(provenance());
    let mut nav = controller_with_source(&config(), source.clone());
    nav.open("sum").await.unwrap();
    nav.on_node_selected("add").await.unwrap();
    let requests = source.requests();

    nav.on_node_selected("sum").await.unwrap();

    assert_eq!(source.requests(), requests);
    assert_eq!(nav.current_view().focal_id, "sum");
    let came_from: Vec<_> = nav
        .current_view()
        .nodes
        .iter()
        .filter(|n| n.came_from())
        .map(|n| n.canonical_id())
        .collect();
    assert_eq!(came_from, vec!["add"]);
}

#[tokio::test]
async fn test_workflow_calls_newest_first() {
    let mut nav = controller_with_source(&config(), Arc::new(provenance()));

    nav.open("wf").await.unwrap();

    assert_eq!(lane_ids(&nav, Lane::OutputProcess), vec!["double", "add"]);
}

#[tokio::test]
async fn test_large_lane_pages_in_without_moving_nodes() {
    let mut source = provenance();
    for i in 1..=25 {
        let id = format!("out{}", i);
        source = source.node(&id, INT).link("add", &id, &format!("r{}", i));
    }
    let mut nav = controller_with_source(&config(), Arc::new(source));
    nav.open("add").await.unwrap();

    // sum plus out1..out25
    assert_eq!(nav.current_view().lane_nodes(Lane::OutputData).len(), 10);
    let first_page = nav.current_view().clone();

    let expansion = nav.on_load_more(Lane::OutputData).unwrap();
    assert_eq!((expansion.added, expansion.remaining), (10, 6));
    let expansion = nav.on_load_more(Lane::OutputData).unwrap();
    assert_eq!((expansion.added, expansion.remaining), (6, 0));

    let view = nav.current_view();
    assert_eq!(view.lane_nodes(Lane::OutputData).len(), 26);
    assert!(view.placeholder(Lane::OutputData).is_none());
    for node in first_page.nodes.iter().filter(|n| !n.is_placeholder()) {
        assert_eq!(view.node(&node.id).unwrap().position, node.position);
    }
}

#[tokio::test]
async fn test_unknown_node_keeps_current_view() {
    let mut nav = controller_with_source(&config(), Arc::new(provenance()));
    nav.open("add").await.unwrap();

    assert!(nav.navigate_to("missing").await.is_err());

    assert_eq!(nav.current_view().focal_id, "add");
    assert!(nav.breadcrumbs().is_empty());
    assert!(nav.last_error().is_some());
}

#[tokio::test]
async fn test_render_json_report() {
    let mut nav = controller_with_source(&config(), Arc::new(provenance()));
    nav.open("double").await.unwrap();
    nav.on_node_selected("result").await.unwrap();

    let json = render(&ViewReport::from_controller(&nav), OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["view"]["focal_id"], "result");
    assert_eq!(value["view"]["label"], "Dict");
    assert_eq!(value["breadcrumbs"][0]["focal_id"], "double");
    assert_eq!(value["state"]["previous_focal_id"], "double");
}
