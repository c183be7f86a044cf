use std::time::Duration;

use crawl_monitor_core::{JobHandle, JobParameters, JobSnapshot};
use futures_util::StreamExt;
use monitor_logging::monitor_trace;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Url;

use crate::types::{CreateJobRequest, CreateJobResponse, StatusResponse};
use crate::{ApiError, FailureKind};

/// Paths of the engine's job endpoints, relative to the server base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRoutes {
    pub create_job: String,
    /// The job id is appended as one more path segment.
    pub status_prefix: String,
}

impl Default for ApiRoutes {
    fn default() -> Self {
        Self {
            create_job: "/jobs".to_string(),
            status_prefix: "/jobs/status".to_string(),
        }
    }
}

impl ApiRoutes {
    /// Routes served by the vendor import studio deployment.
    pub fn vendor_import() -> Self {
        Self {
            create_job: "/api/crawl/start".to_string(),
            status_prefix: "/api/crawl/status".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub routes: ApiRoutes,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_body_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            routes: ApiRoutes::default(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_body_bytes: 256 * 1024,
        }
    }
}

/// HTTP contract of the remote job engine.
#[async_trait::async_trait]
pub trait JobApi: Send + Sync {
    async fn create_job(&self, params: &JobParameters) -> Result<JobHandle, ApiError>;

    async fn fetch_status(&self, job: &JobHandle) -> Result<JobSnapshot, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestJobApi {
    settings: ClientSettings,
    client: reqwest::Client,
}

impl ReqwestJobApi {
    pub fn new(settings: ClientSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let raw = format!("{}{}", self.settings.base_url.trim_end_matches('/'), path);
        Url::parse(&raw).map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    fn status_endpoint(&self, job: &JobHandle) -> Result<Url, ApiError> {
        let mut url = self.endpoint(self.settings.routes.status_prefix.trim_end_matches('/'))?;
        url.path_segments_mut()
            .map_err(|()| ApiError::new(FailureKind::InvalidUrl, "base url cannot carry a path"))?
            .push(job.job_id());
        Ok(url)
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, ApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let max_bytes = self.settings.max_body_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(ApiError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(ApiError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl JobApi for ReqwestJobApi {
    async fn create_job(&self, params: &JobParameters) -> Result<JobHandle, ApiError> {
        let url = self.endpoint(&self.settings.routes.create_job)?;
        let body = serde_json::to_vec(&CreateJobRequest {
            vendor_name: params.vendor_name(),
            base_url: params.base_url(),
            start_urls: params.start_urls(),
            page_limit: params.page_limit(),
        })
        .map_err(|err| ApiError::new(FailureKind::MalformedBody, err.to_string()))?;

        monitor_trace!("POST {} ({} bytes)", url, body.len());
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let bytes = self.read_body(response).await?;
        let parsed: CreateJobResponse = serde_json::from_slice(&bytes)
            .map_err(|err| ApiError::new(FailureKind::MalformedBody, err.to_string()))?;
        match parsed.session_id {
            Some(id) if !id.trim().is_empty() => Ok(JobHandle::new(id)),
            _ => Err(ApiError::new(
                FailureKind::MalformedBody,
                "response has no session_id",
            )),
        }
    }

    async fn fetch_status(&self, job: &JobHandle) -> Result<JobSnapshot, ApiError> {
        let url = self.status_endpoint(job)?;
        monitor_trace!("GET {}", url);
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let bytes = self.read_body(response).await?;
        let parsed: StatusResponse = serde_json::from_slice(&bytes)
            .map_err(|err| ApiError::new(FailureKind::MalformedBody, err.to_string()))?;
        Ok(parsed.into())
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_builder() {
        return ApiError::new(FailureKind::InvalidUrl, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
