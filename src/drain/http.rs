//! HTTP/JSON drain service adapter.

use super::{DrainError, DrainRequest, DrainedNode, NodeDrainer};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Drain adapter for a service exposing:
/// - POST /v1/drain: select and drain nodes, blocking until drained
/// - POST /v1/purge: remove nodes from the cluster
pub struct HttpNodeDrainer {
    base_url: String,
    client: Arc<Client>,
    request_timeout: Duration,
}

impl HttpNodeDrainer {
    pub fn new(base_url: String, client: Arc<Client>, request_timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            request_timeout,
        }
    }

    async fn check(response: Response, op: &str) -> Result<Response, DrainError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        // 409/422 mean the service could not find or drain enough nodes.
        if status.as_u16() == 409 || status.as_u16() == 422 {
            return Err(DrainError::Selection(body));
        }
        Err(DrainError::Upstream {
            status: status.as_u16(),
            message: format!("{} failed: {}", op, body),
        })
    }
}

#[derive(Serialize)]
struct DrainBody<'a> {
    group: &'a str,
    eligible_instance_ids: Vec<&'a str>,
    count: u32,
    deadline_seconds: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    node_class: Option<&'a str>,
    ignore_system_jobs: bool,
}

#[derive(Deserialize)]
struct DrainResponse {
    nodes: Vec<DrainedNode>,
}

#[derive(Serialize)]
struct PurgeBody<'a> {
    node_ids: Vec<&'a str>,
}

#[async_trait]
impl NodeDrainer for HttpNodeDrainer {
    async fn select_and_drain(
        &self,
        request: &DrainRequest,
    ) -> Result<Vec<DrainedNode>, DrainError> {
        let url = format!("{}/v1/drain", self.base_url);
        let body = DrainBody {
            group: &request.group,
            eligible_instance_ids: request
                .eligible_instance_ids
                .iter()
                .map(String::as_str)
                .collect(),
            count: request.count,
            deadline_seconds: request.deadline.as_secs(),
            node_class: request.node_class.as_deref(),
            ignore_system_jobs: request.ignore_system_jobs,
        };

        // The call blocks while draining, so the HTTP timeout covers the deadline too.
        let response = self
            .client
            .post(&url)
            .timeout(self.request_timeout + request.deadline)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DrainError::DeadlineExceeded(request.deadline)
                } else {
                    DrainError::Network(e.to_string())
                }
            })?;

        let response = Self::check(response, "drain").await?;
        let parsed: DrainResponse = response.json().await.map_err(|e| {
            DrainError::InvalidResponse(format!("Failed to parse drain response: {}", e))
        })?;

        Ok(parsed.nodes)
    }

    async fn purge(&self, nodes: &[DrainedNode]) -> Result<(), DrainError> {
        if nodes.is_empty() {
            return Ok(());
        }

        let url = format!("{}/v1/purge", self.base_url);
        let response = self
            .client
            .post(&url)
            .timeout(self.request_timeout)
            .json(&PurgeBody {
                node_ids: nodes.iter().map(|n| n.node_id.as_str()).collect(),
            })
            .send()
            .await
            .map_err(|e| DrainError::Network(e.to_string()))?;

        Self::check(response, "purge").await?;
        Ok(())
    }
}
