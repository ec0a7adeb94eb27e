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

//! Scripted in-memory transport shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, HeaderName, Method};
use nimbusdrive::drive::client::DriveClient;
use nimbusdrive::drive::error::DriveError;
use nimbusdrive::drive::transport::{ApiResponse, RequestOpts, Transport};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What a scripted endpoint answers with.
pub enum Reply {
    Json(u16, Value),
    WithHeaders(u16, Value, Vec<(&'static str, String)>),
    Fault(DriveError),
}

/// One recorded transport invocation: method, path-or-url, JSON body.
#[derive(Clone, Debug)]
pub struct Call {
    pub method: String,
    pub target: String,
    pub body: Option<Value>,
    pub query: Vec<(String, String)>,
    /// Headers attached to a byte transfer; empty for API calls.
    pub headers: HashMap<String, String>,
}

type ApiResponder = Box<dyn FnMut(Option<&Value>) -> Option<Reply> + Send>;
type PutResponder = Box<dyn FnMut(&str) -> Option<Reply> + Send>;

/// In-memory backend: answers the upload protocol and folder endpoints with
/// plausible defaults, records every call, and lets tests override any
/// endpoint with a responder. `put_raw` tracks how many byte transfers are
/// in flight at once so scheduler tests can assert the concurrency cap.
pub struct MockTransport {
    calls: Mutex<Vec<Call>>,
    api_responders: Mutex<HashMap<String, ApiResponder>>,
    put_responder: Mutex<Option<PutResponder>>,
    put_delay: Duration,
    active_puts: AtomicUsize,
    peak_puts: AtomicUsize,
    seq: AtomicUsize,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Self::with_put_delay(Duration::ZERO)
    }

    /// Each byte transfer sleeps for `delay`, forcing group members to
    /// overlap so the in-flight peak is observable.
    pub fn with_put_delay(delay: Duration) -> Arc<Self> {
        // Honors RUST_LOG so failing runs can show the SDK's log lines.
        let _ = env_logger::builder().is_test(true).try_init();
        Arc::new(MockTransport {
            calls: Mutex::new(Vec::new()),
            api_responders: Mutex::new(HashMap::new()),
            put_responder: Mutex::new(None),
            put_delay: delay,
            active_puts: AtomicUsize::new(0),
            peak_puts: AtomicUsize::new(0),
            seq: AtomicUsize::new(0),
        })
    }

    /// Scripts `path`. The responder may return `None` to fall through to
    /// the default behavior for that call.
    pub fn on(
        self: &Arc<Self>,
        path: &str,
        responder: impl FnMut(Option<&Value>) -> Option<Reply> + Send + 'static,
    ) {
        self.api_responders
            .lock()
            .unwrap()
            .insert(path.to_string(), Box::new(responder));
    }

    /// Scripts the byte-transfer endpoint.
    pub fn on_put(
        self: &Arc<Self>,
        responder: impl FnMut(&str) -> Option<Reply> + Send + 'static,
    ) {
        *self.put_responder.lock().unwrap() = Some(Box::new(responder));
    }

    pub fn client(self: &Arc<Self>) -> DriveClient {
        DriveClient::with_transport(self.clone())
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_to(&self, target_prefix: &str) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.target.starts_with(target_prefix))
            .collect()
    }

    pub fn peak_concurrent_puts(&self) -> usize {
        self.peak_puts.load(Ordering::SeqCst)
    }

    fn record(&self, method: &Method, target: &str, opts: &RequestOpts) {
        self.calls.lock().unwrap().push(Call {
            method: method.to_string(),
            target: target.to_string(),
            body: opts.body.clone(),
            query: opts.query.clone(),
            headers: HashMap::new(),
        });
    }

    fn default_api_reply(&self, method: &Method, path: &str, body: Option<&Value>) -> Reply {
        let field = |key: &str| -> Value {
            body.and_then(|b| b.get(key)).cloned().unwrap_or(Value::Null)
        };

        match (method.as_str(), path) {
            ("POST", "/v1/upload/presign") => {
                let n = self.seq.fetch_add(1, Ordering::SeqCst);
                Reply::Json(
                    200,
                    json!({"data": {
                        "uploadUrl": format!("https://storage.test/obj/{n}"),
                        "transferKey": format!("tk-{n}"),
                        "headers": {"x-storage-node": "node-a"},
                    }}),
                )
            }
            ("POST", "/v1/upload/complete") => Reply::Json(
                200,
                json!({"data": {
                    "id": format!("file-{}", field("key").as_str().unwrap_or("?")),
                    "filename": field("filename"),
                    "size": field("size"),
                    "type": field("type"),
                    "folderId": field("folderId"),
                }}),
            ),
            ("POST", "/v1/folders") => Reply::Json(
                201,
                json!({"data": {
                    "id": "fold-1",
                    "name": field("name"),
                    "parentId": field("parentId"),
                }}),
            ),
            ("DELETE", p) if p.starts_with("/v1/folders/") => {
                Reply::Json(200, json!({"data": null}))
            }
            ("GET", "/v1/files") => Reply::Json(
                200,
                json!({"data": {"files": [], "page": 1, "perPage": 50, "total": 0}}),
            ),
            _ => Reply::Json(404, json!({"message": "no such endpoint"})),
        }
    }

    fn into_response(reply: Reply) -> Result<ApiResponse, DriveError> {
        match reply {
            Reply::Json(status, body) => Ok(ApiResponse {
                status,
                headers: HeaderMap::new(),
                body: Bytes::from(serde_json::to_vec(&body).unwrap()),
            }),
            Reply::WithHeaders(status, body, header_pairs) => {
                let mut headers = HeaderMap::new();
                for (name, value) in header_pairs {
                    headers.insert(
                        HeaderName::from_bytes(name.as_bytes()).unwrap(),
                        value.parse().unwrap(),
                    );
                }
                Ok(ApiResponse {
                    status,
                    headers,
                    body: Bytes::from(serde_json::to_vec(&body).unwrap()),
                })
            }
            Reply::Fault(e) => Err(e),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn request(
        &self,
        method: Method,
        path: &str,
        opts: RequestOpts,
    ) -> Result<ApiResponse, DriveError> {
        self.record(&method, path, &opts);

        let scripted = {
            let mut responders = self.api_responders.lock().unwrap();
            responders
                .get_mut(path)
                .and_then(|r| r(opts.body.as_ref()))
        };

        let reply = match scripted {
            Some(r) => r,
            None => self.default_api_reply(&method, path, opts.body.as_ref()),
        };
        Self::into_response(reply)
    }

    async fn put_raw(
        &self,
        url: &str,
        _body: Bytes,
        headers: HashMap<String, String>,
        _timeout: Option<Duration>,
    ) -> Result<ApiResponse, DriveError> {
        self.calls.lock().unwrap().push(Call {
            method: Method::PUT.to_string(),
            target: url.to_string(),
            body: None,
            query: Vec::new(),
            headers,
        });

        let active = self.active_puts.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_puts.fetch_max(active, Ordering::SeqCst);
        if !self.put_delay.is_zero() {
            tokio::time::sleep(self.put_delay).await;
        }
        self.active_puts.fetch_sub(1, Ordering::SeqCst);

        let scripted = {
            let mut responder = self.put_responder.lock().unwrap();
            responder.as_mut().and_then(|r| r(url))
        };

        let reply = scripted.unwrap_or(Reply::Json(200, json!({})));
        Self::into_response(reply)
    }
}
