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

//! Wire types of the Drive API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Envelope wrapping every successful JSON response body.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiEnvelope<T> {
    pub data: T,
}

/// Canonical file record returned by the backend after a committed upload.
///
/// Owned by the backend; the client only reads it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFile {
    pub id: String,
    pub filename: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub content_type: String,
    /// Parent folder identifier; empty string denotes the root folder.
    #[serde(default)]
    pub folder_id: String,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub share_token: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Single-use authorization to transfer bytes directly to storage.
///
/// Issued by `POST /v1/upload/presign` and consumed by exactly one byte
/// transfer. After a failed transfer the grant is dead; a fresh presign is
/// required, never an automatic retry.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferGrant {
    pub upload_url: String,
    /// Opaque backend-assigned key correlating this grant with its commit.
    pub transfer_key: String,
    /// Extra headers the storage endpoint requires on the byte transfer.
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

/// A folder in the user's file tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub parent_id: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// One page of a folder listing.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilePage {
    pub files: Vec<RemoteFile>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
}

impl FilePage {
    /// Whether another page follows this one.
    pub fn has_more(&self) -> bool {
        let seen = u64::from(self.page) * u64::from(self.per_page);
        seen < self.total
    }
}
