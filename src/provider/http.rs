//! HTTP/JSON provider adapter.

use super::{ActivityFilter, ActivityRecord, GroupProvider, GroupSnapshot, ProviderError};
use crate::config::ProviderSettings;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Provider adapter speaking JSON to a group-management gateway.
///
/// Handles the gateway API calls:
/// - Describe via GET /v1/groups?name=
/// - Activity history via GET /v1/activities?group=
/// - Resize via POST /v1/groups/desired-capacity
/// - Terminate via POST /v1/instances/terminate
///
/// Region is sent on every request; static credentials, when configured,
/// go as basic auth with the session token in its own header.
pub struct HttpGroupProvider {
    /// Base URL (e.g., "http://127.0.0.1:4566")
    base_url: String,
    /// Shared HTTP client for connection pooling
    client: Arc<Client>,
    settings: ProviderSettings,
    request_timeout: Duration,
}

impl HttpGroupProvider {
    pub fn new(
        base_url: String,
        client: Arc<Client>,
        settings: ProviderSettings,
        request_timeout: Duration,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            settings,
            request_timeout,
        }
    }

    pub fn region(&self) -> &str {
        &self.settings.region
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        let mut req = req
            .timeout(self.request_timeout)
            .header("x-region", &self.settings.region);

        if let Some(creds) = &self.settings.credentials {
            req = req.basic_auth(&creds.access_key_id, Some(&creds.secret_access_key));
            if let Some(token) = &creds.session_token {
                req = req.header("x-amz-security-token", token);
            }
        }

        req
    }

    async fn send(&self, req: RequestBuilder, op: &str) -> Result<Response, ProviderError> {
        let response = self.authorize(req).send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(self.request_timeout.as_millis() as u64)
            } else {
                ProviderError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.is_empty() {
                format!("{} failed: {}", op, status)
            } else {
                format!("{} failed: {}", op, body)
            };
            return Err(ProviderError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    async fn parse<T: for<'de> Deserialize<'de>>(
        response: Response,
        what: &str,
    ) -> Result<T, ProviderError> {
        let body = response.text().await.map_err(|e| {
            ProviderError::InvalidResponse(format!("Failed to read response body: {}", e))
        })?;

        serde_json::from_str(&body).map_err(|e| {
            ProviderError::InvalidResponse(format!("Failed to parse {} response: {}", what, e))
        })
    }
}

#[derive(Deserialize)]
struct DescribeGroupsResponse {
    groups: Vec<GroupSnapshot>,
}

#[derive(Deserialize)]
struct DescribeActivitiesResponse {
    #[serde(default)]
    activities: Vec<ActivityRecord>,
}

#[derive(Serialize)]
struct SetDesiredCapacityRequest<'a> {
    group_name: &'a str,
    desired_capacity: u32,
    honor_cooldown: bool,
}

#[derive(Serialize)]
struct TerminateInstanceRequest<'a> {
    instance_id: &'a str,
    should_decrement_desired_capacity: bool,
}

#[async_trait]
impl GroupProvider for HttpGroupProvider {
    async fn describe_groups(&self, name: &str) -> Result<Vec<GroupSnapshot>, ProviderError> {
        let url = format!("{}/v1/groups", self.base_url);
        let req = self.client.get(&url).query(&[("name", name)]);

        let response = self.send(req, "describe groups").await?;
        let parsed: DescribeGroupsResponse = Self::parse(response, "describe groups").await?;
        Ok(parsed.groups)
    }

    async fn describe_activities(
        &self,
        name: &str,
        filter: ActivityFilter,
    ) -> Result<Vec<ActivityRecord>, ProviderError> {
        let url = format!("{}/v1/activities", self.base_url);
        let mut req = self.client.get(&url).query(&[("group", name)]);
        if let Some(max) = filter.max_records {
            req = req.query(&[("max_records", max)]);
        }

        let response = self.send(req, "describe activities").await?;
        let parsed: DescribeActivitiesResponse =
            Self::parse(response, "describe activities").await?;
        Ok(parsed.activities)
    }

    async fn set_desired_capacity(&self, name: &str, capacity: u32) -> Result<(), ProviderError> {
        let url = format!("{}/v1/groups/desired-capacity", self.base_url);
        let req = self.client.post(&url).json(&SetDesiredCapacityRequest {
            group_name: name,
            desired_capacity: capacity,
            honor_cooldown: false,
        });

        self.send(req, "set desired capacity").await?;
        Ok(())
    }

    async fn terminate_instance_decrementing(
        &self,
        instance_id: &str,
    ) -> Result<(), ProviderError> {
        let url = format!("{}/v1/instances/terminate", self.base_url);
        let req = self.client.post(&url).json(&TerminateInstanceRequest {
            instance_id,
            should_decrement_desired_capacity: true,
        });

        self.send(req, "terminate instance").await?;
        Ok(())
    }
}
