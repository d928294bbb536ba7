// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP adapters for a hosted database + functions platform.
//!
//! The job record is read and patched through the platform's REST layer
//! (`/rest/v1/{table}`), and generation is started by invoking a function
//! (`/functions/v1/{name}`). Adapters handed out by one [`HttpPlatform`]
//! share its client and so its connection pool.

use crate::store::{RecordStore, StoreError};
use crate::trigger::{JobTrigger, TriggerError};
use async_trait::async_trait;
use gw_core::{JobId, JobStatus};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Connection settings for the hosted platform
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Table holding one row per report
    pub table: String,
    /// Column carrying the raw status string
    pub column: String,
    /// Function that runs the generation pipeline
    pub function: String,
    pub timeout: Duration,
}

impl PlatformConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            table: "reports".to_string(),
            column: "status".to_string(),
            function: "generate-report".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => req.header("apikey", key).bearer_auth(key),
            None => req,
        }
    }
}

/// One configured client for the platform, handing out the adapters
#[derive(Clone)]
pub struct HttpPlatform {
    client: reqwest::Client,
    config: Arc<PlatformConfig>,
}

impl HttpPlatform {
    pub fn new(config: PlatformConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config: Arc::new(config) })
    }

    pub fn store(&self) -> HttpRecordStore {
        HttpRecordStore { platform: self.clone() }
    }

    pub fn trigger(&self) -> HttpJobTrigger {
        HttpJobTrigger { platform: self.clone() }
    }

    fn url(&self, path: &str) -> String {
        self.config.endpoint(path)
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, reqwest::Error> {
        self.config.authorize(req).send().await
    }
}

/// Split a response into its body, or a status error for non-2xx codes.
async fn body_or_status(resp: reqwest::Response) -> Result<String, (u16, String)> {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    if status.is_success() {
        Ok(body)
    } else {
        Err((status.as_u16(), body.trim().to_string()))
    }
}

/// Record store backed by the platform's REST layer
#[derive(Clone)]
pub struct HttpRecordStore {
    platform: HttpPlatform,
}

impl HttpRecordStore {
    fn table_url(&self) -> String {
        self.platform.url(&format!("rest/v1/{}", self.platform.config.table))
    }

    fn row_filter(job_id: &JobId) -> (&'static str, String) {
        ("id", format!("eq.{}", job_id))
    }
}

#[async_trait]
impl RecordStore for HttpRecordStore {
    async fn read_status(&self, job_id: &JobId) -> Result<Option<String>, StoreError> {
        let column = &self.platform.config.column;
        let req = self
            .platform
            .client
            .get(self.table_url())
            .query(&[Self::row_filter(job_id), ("select", column.clone())]);
        let resp =
            self.platform.send(req).await.map_err(|e| StoreError::Request(e.to_string()))?;
        let body = body_or_status(resp)
            .await
            .map_err(|(status, body)| StoreError::Status { status, body })?;

        let rows: Vec<serde_json::Map<String, Value>> =
            serde_json::from_str(&body).map_err(|e| StoreError::InvalidResponse(e.to_string()))?;
        let row = rows.into_iter().next().ok_or_else(|| StoreError::NotFound(job_id.to_string()))?;
        match row.get(column) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(StoreError::InvalidResponse(format!(
                "column '{}' is not a string: {}",
                column, other
            ))),
        }
    }

    async fn reset_status(&self, job_id: &JobId) -> Result<(), StoreError> {
        let mut patch = serde_json::Map::new();
        patch.insert(
            self.platform.config.column.clone(),
            Value::String(JobStatus::PREPARING.to_string()),
        );
        let req = self
            .platform
            .client
            .patch(self.table_url())
            .query(&[Self::row_filter(job_id)])
            .header("Prefer", "return=minimal")
            .json(&patch);
        let resp =
            self.platform.send(req).await.map_err(|e| StoreError::Request(e.to_string()))?;
        body_or_status(resp).await.map_err(|(status, body)| StoreError::Status { status, body })?;
        tracing::info!(job = %job_id, "status reset to preparing");
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TriggerBody<'a> {
    report_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    resume_from_step: Option<u32>,
}

/// Trigger that invokes the generation function
#[derive(Clone)]
pub struct HttpJobTrigger {
    platform: HttpPlatform,
}

#[async_trait]
impl JobTrigger for HttpJobTrigger {
    async fn trigger(&self, job_id: &JobId, resume_from: Option<u32>) -> Result<(), TriggerError> {
        let url = self.platform.url(&format!("functions/v1/{}", self.platform.config.function));
        let body = TriggerBody { report_id: job_id.as_str(), resume_from_step: resume_from };
        let req = self.platform.client.post(url).json(&body);
        let resp =
            self.platform.send(req).await.map_err(|e| TriggerError::Request(e.to_string()))?;
        body_or_status(resp)
            .await
            .map_err(|(status, body)| TriggerError::Status { status, body })?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
