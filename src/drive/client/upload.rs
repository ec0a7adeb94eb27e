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

use crate::drive::builders::{UploadBatch, UploadFile};
use crate::drive::client::DriveClient;
use crate::drive::error::DriveError;
use crate::drive::types::RemoteFile;

impl DriveClient {
    /// Uploads one file through the presign → transfer → commit pipeline.
    ///
    /// The three steps run strictly in order and none is retried; the first
    /// failure surfaces as a [`DriveError`]. Uploading the same source twice
    /// creates two distinct backend files.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use nimbusdrive::drive::client::DriveClient;
    /// # use nimbusdrive::drive::builders::UploadFile;
    /// # async fn example(client: DriveClient) {
    /// let file = client
    ///     .upload(
    ///         UploadFile::from_path("report.pdf")
    ///             .folder_id("f-42")
    ///             .progress(|pct| println!("{pct}%")),
    ///     )
    ///     .await
    ///     .unwrap();
    /// println!("committed as {}", file.id);
    /// # }
    /// ```
    pub async fn upload(&self, request: UploadFile) -> Result<RemoteFile, DriveError> {
        request.run(self).await
    }

    /// Returns a batch builder for uploading `requests` under a shared
    /// concurrency cap. See [`UploadBatch`] for the scheduling contract.
    pub fn upload_batch(&self, requests: Vec<UploadFile>) -> UploadBatch {
        UploadBatch::new(self.clone(), requests)
    }
}
