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

//! Batch upload scheduler: bounded concurrency, per-item outcome isolation.

use crate::drive::builders::UploadFile;
use crate::drive::client::DriveClient;
use crate::drive::error::DriveError;
use crate::drive::types::RemoteFile;
use futures_util::StreamExt;
use futures_util::stream::FuturesUnordered;

/// Default number of concurrently in-flight uploads in a batch.
pub const DEFAULT_BATCH_CONCURRENCY: usize = 3;

/// A committed file together with the label of the request that produced it.
#[derive(Clone, Debug, PartialEq)]
pub struct UploadedItem {
    pub file: RemoteFile,
    pub label: String,
}

/// A failed request's label and failure message.
#[derive(Clone, Debug, PartialEq)]
pub struct FailedItem {
    pub label: String,
    pub message: String,
}

/// Per-item results of a batch upload.
///
/// The two lists partition the submitted requests one-to-one; entries appear
/// in completion order, which differs from submission order whenever real
/// transfer timing interleaves.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub successful: Vec<UploadedItem>,
    pub failed: Vec<FailedItem>,
}

type ItemSink = Box<dyn FnMut(&Result<RemoteFile, DriveError>) + Send>;
type ProgressSink = Box<dyn FnMut(u8, usize, usize) + Send>;

/// Builder for uploading an ordered list of files under a concurrency cap.
///
/// The input is split into consecutive groups of the cap's size. Groups run
/// strictly in order: every item of a group settles before the next group
/// starts, so peak concurrency is exactly the cap. Within a group all items
/// run concurrently and each one's failure is recorded without touching its
/// siblings. A single slow item therefore delays the start of the next
/// group; that chunked-wait policy is deliberate and keeps scheduling
/// deterministic.
///
/// ```no_run
/// # use nimbusdrive::drive::client::DriveClient;
/// # use nimbusdrive::drive::builders::UploadFile;
/// # async fn example(client: DriveClient) {
/// let outcome = client
///     .upload_batch(vec![
///         UploadFile::from_path("a.png"),
///         UploadFile::from_path("b.png"),
///     ])
///     .concurrency(2)
///     .on_progress(|pct, done, total| println!("{pct}% ({done}/{total})"))
///     .send()
///     .await;
/// assert_eq!(outcome.successful.len() + outcome.failed.len(), 2);
/// # }
/// ```
pub struct UploadBatch {
    client: DriveClient,
    requests: Vec<UploadFile>,
    concurrency: usize,
    on_item_complete: Option<ItemSink>,
    on_progress: Option<ProgressSink>,
}

impl UploadBatch {
    pub(crate) fn new(client: DriveClient, requests: Vec<UploadFile>) -> Self {
        UploadBatch {
            client,
            requests,
            concurrency: DEFAULT_BATCH_CONCURRENCY,
            on_item_complete: None,
            on_progress: None,
        }
    }

    /// Concurrency cap; values below 1 are clamped to 1.
    pub fn concurrency(mut self, limit: usize) -> Self {
        self.concurrency = limit.max(1);
        self
    }

    /// Fires once per item, immediately after it settles, in completion
    /// order.
    pub fn on_item_complete(
        mut self,
        sink: impl FnMut(&Result<RemoteFile, DriveError>) + Send + 'static,
    ) -> Self {
        self.on_item_complete = Some(Box::new(sink));
        self
    }

    /// Fires once per item completion with the rounded percentage of items
    /// done, the running completed count and the fixed total.
    pub fn on_progress(mut self, sink: impl FnMut(u8, usize, usize) + Send + 'static) -> Self {
        self.on_progress = Some(Box::new(sink));
        self
    }

    /// Runs the batch to completion. Individual failures are captured into
    /// the outcome before each group's join point, so this never fails as a
    /// whole.
    pub async fn send(self) -> BatchOutcome {
        let UploadBatch {
            client,
            mut requests,
            concurrency,
            mut on_item_complete,
            mut on_progress,
        } = self;

        let total = requests.len();
        let mut outcome = BatchOutcome::default();
        let mut completed = 0usize;

        while !requests.is_empty() {
            let take = concurrency.min(requests.len());
            let group: Vec<UploadFile> = requests.drain(..take).collect();

            let mut wave = FuturesUnordered::new();
            for request in group {
                let label = request.label();
                let client = &client;
                wave.push(async move { (label, client.upload(request).await) });
            }

            // Completions are drained here, one at a time, so the FnMut
            // sinks run without any locking even though the wave itself is
            // concurrent.
            while let Some((label, result)) = wave.next().await {
                completed += 1;
                if let Some(sink) = on_item_complete.as_mut() {
                    sink(&result);
                }
                if let Some(sink) = on_progress.as_mut() {
                    let pct = ((completed as f64 / total as f64) * 100.0).round() as u8;
                    sink(pct, completed, total);
                }
                match result {
                    Ok(file) => outcome.successful.push(UploadedItem { file, label }),
                    Err(e) => {
                        log::warn!("batch item {label:?} failed: {e}");
                        outcome.failed.push(FailedItem {
                            label,
                            message: e.message,
                        });
                    }
                }
            }
        }

        outcome
    }
}
