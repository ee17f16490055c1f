//! REST client for the provenance API.

use super::{FetchError, LinkQuery, NodeRecord, NodeSource};
use crate::model::Direction;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// HTTP-backed [`NodeSource`].
pub struct RestSource {
    http: Client,
    base_url: String,
}

impl RestSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `base_url` with `segments` appended, each one percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let invalid = || FetchError::InvalidUrl(self.base_url.clone());
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let endpoint = self.endpoint(segments)?;
        let url = endpoint.to_string();
        debug!(%url, "GET");

        let response = self
            .http
            .get(endpoint)
            .query(query)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| FetchError::Decode {
            url,
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl NodeSource for RestSource {
    async fn node(&self, id: &str) -> Result<NodeRecord, FetchError> {
        let envelope: NodeEnvelope = self.get(&["nodes", id], &[]).await?;
        envelope
            .into_record()
            .ok_or_else(|| FetchError::NotFound(id.to_string()))
    }

    async fn links(&self, id: &str, query: &LinkQuery) -> Result<Vec<NodeRecord>, FetchError> {
        let segments = ["nodes", id, "links", query.direction.link_segment()];
        let envelope: LinksEnvelope = self
            .get(
                &segments,
                &[
                    ("full_type", query.full_type.as_str()),
                    ("orderby", query.orderby.as_str()),
                ],
            )
            .await?;
        Ok(envelope.into_links(query.direction))
    }
}

/// Node summary, flat or wrapped as `{"data": {"nodes": [...]}}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NodeEnvelope {
    Wrapped { data: NodeList },
    Flat(NodeRecord),
}

#[derive(Debug, Deserialize)]
struct NodeList {
    nodes: Vec<NodeRecord>,
}

impl NodeEnvelope {
    fn into_record(self) -> Option<NodeRecord> {
        match self {
            NodeEnvelope::Wrapped { data } => data.nodes.into_iter().next(),
            NodeEnvelope::Flat(record) => Some(record),
        }
    }
}

/// Link listing, flat or wrapped as `{"data": {"incoming": [...]}}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LinksEnvelope {
    Wrapped { data: LinkLists },
    Flat(LinkLists),
}

#[derive(Debug, Default, Deserialize)]
struct LinkLists {
    #[serde(default)]
    incoming: Vec<NodeRecord>,
    #[serde(default)]
    outgoing: Vec<NodeRecord>,
}

impl LinksEnvelope {
    fn into_links(self, direction: Direction) -> Vec<NodeRecord> {
        let lists = match self {
            LinksEnvelope::Wrapped { data } => data,
            LinksEnvelope::Flat(lists) => lists,
        };
        match direction {
            Direction::Input => lists.incoming,
            Direction::Output => lists.outgoing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_node_summary() {
        let envelope: NodeEnvelope = serde_json::from_str(
            r#"{"uuid": "abc", "node_type": "data.core.dict.Dict.", "ctime": "2022-05-01T12:00:00+00:00", "mtime": null}"#,
        )
        .unwrap();

        let record = envelope.into_record().unwrap();
        assert_eq!(record.uuid, "abc");
        assert_eq!(record.raw.node_type, "data.core.dict.Dict.");
        assert!(record.raw.ctime.is_some());
    }

    #[test]
    fn test_wrapped_node_summary() {
        let envelope: NodeEnvelope = serde_json::from_str(
            r#"{"data": {"nodes": [{"uuid": "abc", "node_type": "process.workflow.workchain.WorkChainNode."}]}}"#,
        )
        .unwrap();

        assert_eq!(envelope.into_record().unwrap().uuid, "abc");
    }

    #[test]
    fn test_wrapped_empty_node_list() {
        let envelope: NodeEnvelope = serde_json::from_str(r#"{"data": {"nodes": []}}"#).unwrap();
        assert!(envelope.into_record().is_none());
    }

    #[test]
    fn test_links_pick_direction() {
        let body = r#"{
            "incoming": [{"uuid": "in1", "node_type": "data.core.int.Int.", "link_label": "x"}],
            "outgoing": [{"uuid": "out1", "node_type": "data.core.int.Int.", "link_label": "y"}]
        }"#;

        let incoming: LinksEnvelope = serde_json::from_str(body).unwrap();
        let records = incoming.into_links(Direction::Input);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].uuid, "in1");
        assert_eq!(records[0].raw.link_label.as_deref(), Some("x"));

        let outgoing: LinksEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(outgoing.into_links(Direction::Output)[0].uuid, "out1");
    }

    #[test]
    fn test_wrapped_links() {
        let envelope: LinksEnvelope = serde_json::from_str(
            r#"{"data": {"outgoing": [{"uuid": "o", "node_type": "data.core.int.Int."}]}}"#,
        )
        .unwrap();

        assert_eq!(envelope.into_links(Direction::Output).len(), 1);
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let source = RestSource::new("http://localhost:5000/api/v4/", Duration::from_secs(5)).unwrap();
        assert_eq!(source.base_url(), "http://localhost:5000/api/v4");
    }

    #[test]
    fn test_node_id_is_one_path_segment() {
        let source = RestSource::new("http://localhost:5000/api/v4", Duration::from_secs(5)).unwrap();

        let url = source.endpoint(&["nodes", "a/b?c", "links", "incoming"]).unwrap();

        assert_eq!(
            url.as_str(),
            "http://localhost:5000/api/v4/nodes/a%2Fb%3Fc/links/incoming"
        );
    }
}
