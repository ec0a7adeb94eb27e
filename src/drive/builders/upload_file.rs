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

//! Single-file upload request and the presign/transfer/commit pipeline.

use crate::drive::client::DriveClient;
use crate::drive::error::DriveError;
use crate::drive::media_type;
use crate::drive::transport::RequestOpts;
use crate::drive::types::{RemoteFile, TransferGrant};
use bytes::Bytes;
use http::Method;
use serde_json::json;
use std::collections::HashMap;
use std::path::PathBuf;

/// Where the bytes of an upload come from.
pub enum FileSource {
    /// Read from the local filesystem when the upload runs.
    Path(PathBuf),
    /// Already in memory.
    Buffer(Bytes),
}

type ProgressSink = Box<dyn Fn(u8) + Send + Sync>;

/// One upload request: source bytes plus naming and placement metadata.
///
/// Immutable once handed to [`DriveClient::upload`] or a batch. The filename
/// is derived from the path's base name for path sources and mandatory for
/// buffer sources; the content type falls back to the extension table.
///
/// ```no_run
/// use nimbusdrive::drive::builders::UploadFile;
///
/// let req = UploadFile::from_bytes("hello world".as_bytes().to_vec())
///     .filename("hello.txt")
///     .folder_id("f-123");
/// ```
pub struct UploadFile {
    source: FileSource,
    filename: Option<String>,
    content_type: Option<String>,
    folder_id: String,
    progress: Option<ProgressSink>,
}

impl UploadFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::new(FileSource::Path(path.into()))
    }

    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        Self::new(FileSource::Buffer(bytes.into()))
    }

    fn new(source: FileSource) -> Self {
        UploadFile {
            source,
            filename: None,
            content_type: None,
            folder_id: String::new(),
            progress: None,
        }
    }

    /// Overrides the filename; required for buffer sources.
    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Overrides the content type derived from the filename extension.
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Target folder; the default empty string means the root folder.
    pub fn folder_id(mut self, folder_id: impl Into<String>) -> Self {
        self.folder_id = folder_id.into();
        self
    }

    /// Two-point progress sink: invoked with 0 before the byte transfer and
    /// 100 after it completes. The transport reports overall success or
    /// failure only, so there is no byte-level progress.
    pub fn progress(mut self, sink: impl Fn(u8) + Send + Sync + 'static) -> Self {
        self.progress = Some(Box::new(sink));
        self
    }

    /// Label used to reconcile batch outcomes against the input list.
    pub(crate) fn label(&self) -> String {
        if let Some(name) = &self.filename {
            return name.clone();
        }
        match &self.source {
            FileSource::Path(p) => p.display().to_string(),
            FileSource::Buffer(_) => String::from("(unnamed buffer)"),
        }
    }

    /// Runs the three-step upload pipeline. Steps are strictly sequential
    /// and none is retried: the first failure surfaces to the caller.
    pub(crate) async fn run(self, client: &DriveClient) -> Result<RemoteFile, DriveError> {
        let UploadFile {
            source,
            filename,
            content_type,
            folder_id,
            progress,
        } = self;

        // Step 1: resolve the source. Invalid requests fail here, before any
        // network call.
        let resolved = resolve_source(source, filename, content_type).await?;

        // Step 2: acquire a single-use transfer grant.
        let grant: TransferGrant = client
            .api_request(
                Method::POST,
                "/v1/upload/presign",
                RequestOpts {
                    body: Some(json!({
                        "filename": resolved.filename,
                        "fileType": resolved.content_type,
                        "size": resolved.size,
                        "folderId": folder_id,
                    })),
                    ..Default::default()
                },
            )
            .await?;

        // Step 3: transfer the bytes to the granted URL. Any fault is an
        // Upload-kind error and the commit is never attempted; the grant is
        // spent either way.
        if let Some(sink) = &progress {
            sink(0);
        }
        transfer_bytes(client, &grant, &resolved).await?;
        if let Some(sink) = &progress {
            sink(100);
        }

        // Step 4: commit the transfer into a durable file record.
        client
            .api_request(
                Method::POST,
                "/v1/upload/complete",
                RequestOpts {
                    body: Some(json!({
                        "key": grant.transfer_key,
                        "filename": resolved.filename,
                        "size": resolved.size,
                        "type": resolved.content_type,
                        "folderId": folder_id,
                    })),
                    ..Default::default()
                },
            )
            .await
    }
}

struct ResolvedUpload {
    filename: String,
    content_type: String,
    size: u64,
    bytes: Bytes,
}

async fn resolve_source(
    source: FileSource,
    filename: Option<String>,
    content_type: Option<String>,
) -> Result<ResolvedUpload, DriveError> {
    let (bytes, filename) = match source {
        FileSource::Path(path) => {
            if path.as_os_str().is_empty() {
                return Err(DriveError::validation("upload path is empty"));
            }
            if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
                return Err(DriveError::validation(format!(
                    "file not found: {}",
                    path.display()
                )));
            }
            let filename = match filename {
                Some(v) => v,
                None => path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .ok_or_else(|| {
                        DriveError::validation(format!(
                            "cannot derive a filename from {}",
                            path.display()
                        ))
                    })?,
            };
            let data = tokio::fs::read(&path).await.map_err(|e| {
                DriveError::validation(format!("failed to read {}: {e}", path.display()))
            })?;
            (Bytes::from(data), filename)
        }
        FileSource::Buffer(bytes) => {
            let filename = filename.ok_or_else(|| {
                DriveError::validation("a filename is required when uploading from a buffer")
            })?;
            (bytes, filename)
        }
    };

    let content_type = content_type
        .unwrap_or_else(|| media_type::content_type_for(&filename).to_string());

    Ok(ResolvedUpload {
        size: bytes.len() as u64,
        filename,
        content_type,
        bytes,
    })
}

async fn transfer_bytes(
    client: &DriveClient,
    grant: &TransferGrant,
    resolved: &ResolvedUpload,
) -> Result<(), DriveError> {
    let mut headers: HashMap<String, String> = HashMap::new();
    headers.insert("content-type".into(), resolved.content_type.clone());
    headers.insert("content-length".into(), resolved.size.to_string());
    // The grant's extra headers win on conflict; the backend mandates them.
    headers.extend(grant.headers.clone());

    let result = client
        .transport()
        .put_raw(&grant.upload_url, resolved.bytes.clone(), headers, None)
        .await;

    let wrap = |message: String| {
        DriveError::upload(
            message,
            &resolved.filename,
            resolved.size,
            &grant.transfer_key,
        )
    };

    match result {
        Err(e) => Err(wrap(e.message)),
        Ok(resp) if resp.status >= 400 => Err(wrap(format!(
            "byte transfer failed with status {}",
            resp.status
        ))),
        Ok(_) => Ok(()),
    }
}
