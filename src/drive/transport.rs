// Nimbus Drive Rust Library for Cloud File Storage
// Copyright 2024 Nimbus Drive, Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! HTTP transport: one request/response exchange per call.
//!
//! [`Transport`] is the only seam between the SDK and the network. It raises
//! [`DriveError`] values solely for connection-level faults (network error,
//! timeout); HTTP 4xx/5xx responses come back with their status so the
//! caller can run them through [`classify`](crate::drive::error::classify).

use crate::drive::error::DriveError;
use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

/// Per-client request deadline unless overridden per call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Optional parts of an API request.
#[derive(Debug, Default)]
pub struct RequestOpts {
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub headers: HashMap<String, String>,
    pub timeout: Option<Duration>,
}

/// Status, headers and raw body of one exchange.
#[derive(Debug)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body parsed as JSON, or `None` when empty or not JSON.
    pub fn json(&self) -> Option<Value> {
        serde_json::from_slice(&self.body).ok()
    }

    /// Deserializes the body into `T`. A body that does not decode is a
    /// server-side fault, not caller input, so it surfaces as Generic.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, DriveError> {
        serde_json::from_slice(&self.body)
            .map_err(|e| DriveError::generic(format!("malformed response body: {e}")))
    }
}

/// A single request/response exchange against the Drive API or a storage
/// endpoint.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs one exchange against the API at `path` (relative to the base
    /// URL). Returns the response whatever its status; errs only on
    /// connection faults.
    async fn request(
        &self,
        method: Method,
        path: &str,
        opts: RequestOpts,
    ) -> Result<ApiResponse, DriveError>;

    /// Raw byte PUT to an arbitrary absolute URL, used for the upload byte
    /// transfer. Same fault contract as [`Transport::request`].
    async fn put_raw(
        &self,
        url: &str,
        body: Bytes,
        headers: HashMap<String, String>,
        timeout: Option<Duration>,
    ) -> Result<ApiResponse, DriveError>;
}

/// [`Transport`] implementation over a shared `reqwest` connection pool.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    http_client: reqwest::Client,
    base_url: Url,
    token: Option<String>,
    default_timeout: Duration,
}

impl HttpTransport {
    pub fn new(
        base_url: Url,
        token: Option<String>,
        default_timeout: Duration,
    ) -> Result<Self, DriveError> {
        let user_agent = format!(
            "NimbusDrive ({}; {}) nimbusdrive-rs/{}",
            std::env::consts::OS,
            std::env::consts::ARCH,
            env!("CARGO_PKG_VERSION")
        );

        let http_client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| DriveError::validation(format!("http client setup failed: {e}")))?;

        Ok(Self {
            http_client,
            base_url,
            token,
            default_timeout,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, DriveError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| DriveError::validation(format!("invalid request path {path:?}: {e}")))
    }

    async fn read_response(resp: reqwest::Response) -> Result<ApiResponse, DriveError> {
        let status = resp.status().as_u16();
        let headers = resp.headers().clone();
        let body = resp.bytes().await.map_err(map_transport_error)?;
        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(
        &self,
        method: Method,
        path: &str,
        opts: RequestOpts,
    ) -> Result<ApiResponse, DriveError> {
        let url = self.endpoint(path)?;

        let mut req = self
            .http_client
            .request(method.clone(), url)
            .timeout(opts.timeout.unwrap_or(self.default_timeout));

        if !opts.query.is_empty() {
            req = req.query(&opts.query);
        }
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        for (name, value) in &opts.headers {
            req = req.header(name, value);
        }
        if let Some(body) = &opts.body {
            req = req.json(body);
        }

        let resp = req.send().await.map_err(map_transport_error)?;
        let resp = Self::read_response(resp).await?;
        log::debug!("{method} {path} -> {}", resp.status);
        Ok(resp)
    }

    async fn put_raw(
        &self,
        url: &str,
        body: Bytes,
        headers: HashMap<String, String>,
        timeout: Option<Duration>,
    ) -> Result<ApiResponse, DriveError> {
        let mut req = self
            .http_client
            .put(url)
            .timeout(timeout.unwrap_or(self.default_timeout));

        for (name, value) in &headers {
            req = req.header(name, value);
        }
        req = req.body(body);

        let resp = req.send().await.map_err(map_transport_error)?;
        Self::read_response(resp).await
    }
}

fn map_transport_error(e: reqwest::Error) -> DriveError {
    if e.is_timeout() {
        DriveError::timeout(format!("request timed out: {e}"))
    } else {
        DriveError::network(format!("network error: {e}"))
    }
}
