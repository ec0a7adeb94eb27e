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

use crate::drive::client::DriveClient;
use crate::drive::error::DriveError;
use crate::drive::transport::RequestOpts;
use crate::drive::types::{FilePage, Folder};
use http::Method;
use serde_json::json;

impl DriveClient {
    /// Creates a folder under `parent_id`; empty string means the root.
    pub async fn create_folder(
        &self,
        name: &str,
        parent_id: &str,
    ) -> Result<Folder, DriveError> {
        if name.is_empty() {
            return Err(DriveError::validation("folder name cannot be empty"));
        }
        self.api_request(
            Method::POST,
            "/v1/folders",
            RequestOpts {
                body: Some(json!({ "name": name, "parentId": parent_id })),
                ..Default::default()
            },
        )
        .await
    }

    /// Deletes a folder by id.
    pub async fn delete_folder(&self, id: &str) -> Result<(), DriveError> {
        if id.is_empty() {
            return Err(DriveError::validation("folder id cannot be empty"));
        }
        self.api_request_empty(
            Method::DELETE,
            &format!("/v1/folders/{id}"),
            RequestOpts::default(),
        )
        .await
    }

    /// Lists one page of the files in `folder_id` (empty string = root).
    /// Pages start at 1.
    pub async fn list_files(
        &self,
        folder_id: &str,
        page: u32,
        per_page: u32,
    ) -> Result<FilePage, DriveError> {
        self.api_request(
            Method::GET,
            "/v1/files",
            RequestOpts {
                query: vec![
                    ("folderId".into(), folder_id.into()),
                    ("page".into(), page.max(1).to_string()),
                    ("perPage".into(), per_page.to_string()),
                ],
                ..Default::default()
            },
        )
        .await
    }
}
