//! Neighborhood retrieval: the REST seam, classification and ordering, and the
//! session cache.

mod cache;
mod client;
mod order;

pub use cache::GraphDataCache;
pub use client::RestSource;
pub use order::{natural_cmp, sort_lane};

use crate::model::{Direction, Lane, Neighborhood, Node, NodeRaw};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error {status} for {url}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },
    #[error("Failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },
    #[error("Node not found: {0}")]
    NotFound(String),
    #[error("Cannot build request URLs from {0}")]
    InvalidUrl(String),
}

/// A node as returned by the REST API, either as a summary or as a link entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeRecord {
    pub uuid: String,
    #[serde(flatten)]
    pub raw: NodeRaw,
}

impl NodeRecord {
    pub fn new(uuid: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            raw: NodeRaw {
                node_type: node_type.into(),
                ..Default::default()
            },
        }
    }
}

impl From<NodeRecord> for Node {
    fn from(record: NodeRecord) -> Self {
        Node::from_raw(record.uuid, record.raw)
    }
}

/// Parameters of one links query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkQuery {
    pub direction: Direction,
    pub full_type: String,
    pub orderby: String,
}

/// Where node summaries and links come from.
#[async_trait]
pub trait NodeSource: Send + Sync {
    /// Summary of a single node.
    async fn node(&self, id: &str) -> Result<NodeRecord, FetchError>;

    /// Nodes linked to `id` in the query's direction, filtered by type.
    async fn links(&self, id: &str, query: &LinkQuery) -> Result<Vec<NodeRecord>, FetchError>;
}

/// `full_type` filters and server-side ordering used for the four link queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    pub data_filter: String,
    pub process_filter: String,
    pub data_orderby: String,
    pub process_orderby: String,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            data_filter: "data.%|".to_string(),
            process_filter: "process.%|".to_string(),
            data_orderby: "label".to_string(),
            process_orderby: "-ctime".to_string(),
        }
    }
}

impl QueryOptions {
    pub fn for_lane(&self, lane: Lane) -> LinkQuery {
        let (full_type, orderby) = if lane.is_process() {
            (&self.process_filter, &self.process_orderby)
        } else {
            (&self.data_filter, &self.data_orderby)
        };
        LinkQuery {
            direction: lane.direction(),
            full_type: full_type.clone(),
            orderby: orderby.clone(),
        }
    }
}

/// Retrieves and classifies the direct links of a node.
///
/// Fetching never touches a cache; callers decide whether to keep the result.
#[derive(Clone)]
pub struct NeighborhoodFetcher {
    source: Arc<dyn NodeSource>,
    query: QueryOptions,
}

impl NeighborhoodFetcher {
    pub fn new(source: Arc<dyn NodeSource>) -> Self {
        Self {
            source,
            query: QueryOptions::default(),
        }
    }

    pub fn with_query(mut self, query: QueryOptions) -> Self {
        self.query = query;
        self
    }

    /// Fetch the focal summary and the four link categories concurrently.
    ///
    /// A failed category degrades to an empty list. A failed focal lookup fails
    /// the whole fetch.
    pub async fn fetch(&self, id: &str) -> Result<Neighborhood, FetchError> {
        let (focal, input_data, input_process, output_data, output_process) = tokio::join!(
            self.source.node(id),
            self.category(id, Lane::InputData),
            self.category(id, Lane::InputProcess),
            self.category(id, Lane::OutputData),
            self.category(id, Lane::OutputProcess),
        );

        let focal = Node::from(focal?);
        let mut neighborhood = Neighborhood::new(focal);

        // Re-bucket by each neighbor's own type so a loose server-side filter
        // cannot put a process into a data lane.
        let incoming = input_data.into_iter().chain(input_process);
        let outgoing = output_data.into_iter().chain(output_process);
        classify_into(&mut neighborhood, Direction::Input, incoming);
        classify_into(&mut neighborhood, Direction::Output, outgoing);

        for lane in Lane::ALL {
            sort_lane(lane, neighborhood.lane_mut(lane));
        }

        debug!(
            node_id = %id,
            neighbors = neighborhood.total(),
            "fetched neighborhood"
        );
        Ok(neighborhood)
    }

    async fn category(&self, id: &str, lane: Lane) -> Vec<Node> {
        let query = self.query.for_lane(lane);
        match self.source.links(id, &query).await {
            Ok(records) => records.into_iter().map(Node::from).collect(),
            Err(e) => {
                warn!(node_id = %id, category = %lane, error = %e, "link query failed, showing no neighbors");
                Vec::new()
            }
        }
    }
}

fn classify_into(
    neighborhood: &mut Neighborhood,
    direction: Direction,
    nodes: impl Iterator<Item = Node>,
) {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    for node in nodes {
        if !seen.insert((node.id.clone(), node.link_label().to_string())) {
            continue;
        }
        let lane = Lane::new(direction, node.kind.is_process());
        neighborhood.lane_mut(lane).push(node);
    }
}
