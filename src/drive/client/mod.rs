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

//! Drive client to perform file and folder operations.

use crate::drive::error::{DriveError, classify};
use crate::drive::transport::{DEFAULT_TIMEOUT, HttpTransport, RequestOpts, Transport};
use crate::drive::types::ApiEnvelope;
use http::Method;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

mod folders;
mod upload;

/// Builder manufacturing a [`DriveClient`] from a base URL and credentials.
#[derive(Debug)]
pub struct DriveClientBuilder {
    base_url: String,
    token: Option<String>,
    timeout: Duration,
}

impl DriveClientBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        DriveClientBuilder {
            base_url: base_url.into(),
            token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Bearer token attached to every API request. Without one, requests go
    /// out anonymously and the backend will answer 401.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Per-request deadline; defaults to 30 seconds. Individual calls can
    /// still override it.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<DriveClient, DriveError> {
        let base_url = Url::parse(&self.base_url)
            .map_err(|e| DriveError::validation(format!("invalid base URL: {e}")))?;
        let transport = HttpTransport::new(base_url, self.token, self.timeout)?;
        Ok(DriveClient {
            transport: Arc::new(transport),
        })
    }
}

/// Async client for the Nimbus Drive HTTP API.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct DriveClient {
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for DriveClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriveClient").finish_non_exhaustive()
    }
}

impl DriveClient {
    /// Returns a builder for a client talking to `base_url`.
    ///
    /// # Examples
    ///
    /// ```
    /// use nimbusdrive::drive::client::DriveClient;
    ///
    /// let client = DriveClient::builder("https://api.nimbusdrive.io")
    ///     .token("access-token")
    ///     .build()
    ///     .unwrap();
    /// ```
    pub fn builder(base_url: impl Into<String>) -> DriveClientBuilder {
        DriveClientBuilder::new(base_url)
    }

    /// Builds a client over a caller-supplied transport. This is the seam
    /// used to script exchanges in tests.
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        DriveClient { transport }
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// One API exchange: non-2xx responses are classified into a
    /// [`DriveError`], successful bodies are unwrapped from the `data`
    /// envelope.
    pub(crate) async fn api_request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        opts: RequestOpts,
    ) -> Result<T, DriveError> {
        let resp = self.transport.request(method, path, opts).await?;
        if !resp.is_success() {
            return Err(classify(resp.status, resp.json().as_ref(), &resp.headers));
        }
        let envelope: ApiEnvelope<T> = resp.parse()?;
        Ok(envelope.data)
    }

    /// Like [`Self::api_request`] but for calls whose response body carries
    /// no payload worth parsing.
    pub(crate) async fn api_request_empty(
        &self,
        method: Method,
        path: &str,
        opts: RequestOpts,
    ) -> Result<(), DriveError> {
        let resp = self.transport.request(method, path, opts).await?;
        if !resp.is_success() {
            return Err(classify(resp.status, resp.json().as_ref(), &resp.headers));
        }
        Ok(())
    }
}
