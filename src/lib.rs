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

//! # Nimbus Drive Rust SDK (`nimbusdrive`)
//!
//! This crate provides a strongly-typed, async-first client for the Nimbus
//! Drive cloud file-storage HTTP API.
//!
//! Uploads go through a three-step protocol that the SDK drives for you:
//! the client asks the backend for a single-use transfer grant (a presigned
//! URL plus an opaque transfer key), PUTs the file bytes to that URL, and
//! then commits the transfer so the backend registers a durable file record.
//! Batches of files are scheduled under a bounded concurrency cap with
//! per-item outcome isolation: one failed file never aborts its siblings.
//!
//! ## Basic Usage
//!
//! ```no_run
//! use nimbusdrive::drive::client::DriveClient;
//! use nimbusdrive::drive::builders::UploadFile;
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = DriveClient::builder("https://api.nimbusdrive.io")
//!         .token("access-token")
//!         .build()
//!         .expect("client configuration");
//!
//!     let file = client
//!         .upload(UploadFile::from_path("photos/cat.jpg"))
//!         .await
//!         .expect("upload failed");
//!
//!     println!("uploaded {} ({} bytes)", file.filename, file.size);
//! }
//! ```
//!
//! ## Features
//! - Async/await throughout via [`tokio`]
//! - Typed error taxonomy mapped from HTTP status codes, surfaced as
//!   `Result<T, DriveError>`
//! - Batch uploads with progress and completion callbacks
//!
//! ## Design
//! - [`drive::transport::Transport`] is the single seam to the network; the
//!   bundled [`drive::transport::HttpTransport`] implements it with `reqwest`
//! - [`drive::error::classify`] maps every non-2xx response to exactly one
//!   [`drive::error::DriveError`] kind
//! - Upload orchestration lives in [`drive::builders::UploadFile`] and
//!   [`drive::builders::UploadBatch`]

#![allow(clippy::result_large_err)]
pub mod drive;
