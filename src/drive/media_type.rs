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

//! Filename-extension to content-type lookup.

use lazy_static::lazy_static;
use std::collections::HashMap;

/// Content type used when the extension is unknown or missing.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

lazy_static! {
    static ref MEDIA_TYPES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("txt", "text/plain");
        m.insert("csv", "text/csv");
        m.insert("html", "text/html");
        m.insert("css", "text/css");
        m.insert("js", "text/javascript");
        m.insert("json", "application/json");
        m.insert("xml", "application/xml");
        m.insert("pdf", "application/pdf");
        m.insert("zip", "application/zip");
        m.insert("gz", "application/gzip");
        m.insert("tar", "application/x-tar");
        m.insert("doc", "application/msword");
        m.insert(
            "docx",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        );
        m.insert("xls", "application/vnd.ms-excel");
        m.insert(
            "xlsx",
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        );
        m.insert("png", "image/png");
        m.insert("jpg", "image/jpeg");
        m.insert("jpeg", "image/jpeg");
        m.insert("gif", "image/gif");
        m.insert("webp", "image/webp");
        m.insert("svg", "image/svg+xml");
        m.insert("mp3", "audio/mpeg");
        m.insert("wav", "audio/wav");
        m.insert("mp4", "video/mp4");
        m.insert("mov", "video/quicktime");
        m.insert("webm", "video/webm");
        m
    };
}

/// Derives a content type from a filename's extension.
///
/// The table is process-wide, immutable and read-only, so it is safe to
/// share across concurrent uploads. Unknown extensions fall back to
/// [`DEFAULT_CONTENT_TYPE`].
pub fn content_type_for(filename: &str) -> &'static str {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .and_then(|ext| MEDIA_TYPES.get(ext.as_str()).copied())
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}
