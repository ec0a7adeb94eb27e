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

//! Error definitions for Drive API operations and the status-code mapper.

use http::HeaderMap;
use serde_json::{Value, json};

/// Semantic failure category of a [`DriveError`].
///
/// Callers can match on the kind to pick a recovery strategy:
/// `Authentication` and `Validation` are not retryable by the library (fix
/// credentials or input), `RateLimit` is retryable after
/// [`DriveError::retry_after`] seconds, `Network`/`Timeout` are retryable
/// with backoff, and `Upload` is retryable by resubmitting the whole upload
/// (transfer grants are single-use, so a fresh presign is mandatory).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Authentication,
    NotFound,
    Validation,
    RateLimit,
    LimitExceeded,
    Upload,
    Network,
    Timeout,
    Generic,
}

/// Error value surfaced by every Drive API operation.
///
/// A single tagged type rather than an error hierarchy: the `kind`
/// discriminant supports exhaustive matching and the kind-specific fields
/// (`retry_after`, `details`) are optional.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct DriveError {
    pub kind: ErrorKind,
    pub message: String,
    /// HTTP status the error was derived from; `None` for failures raised
    /// before or below the HTTP layer (validation, network, timeout).
    pub status_code: Option<u16>,
    /// Machine-readable code string, when the mapping fixes one.
    pub code: Option<String>,
    /// Seconds until retry is permitted, on `RateLimit` errors only.
    pub retry_after: Option<u64>,
    /// Structured context: the backend's `details` payload on `Validation`,
    /// or `{filename, size, transferKey}` on `Upload`.
    pub details: Option<Value>,
}

impl DriveError {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status_code: None,
            code: None,
            retry_after: None,
            details: None,
        }
    }

    /// Input was rejected before any network call was made.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Connection-level failure with no HTTP status available.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, message)
    }

    /// The configured deadline elapsed before the exchange completed.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    /// Failure that fits no other category, such as a success response whose
    /// body cannot be decoded.
    pub fn generic(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Generic, message)
    }

    /// Byte-transfer step failed. Carries the in-flight object's identity so
    /// the caller can diagnose which transfer died without re-uploading.
    pub fn upload(
        message: impl Into<String>,
        filename: &str,
        size: u64,
        transfer_key: &str,
    ) -> Self {
        let mut e = Self::new(ErrorKind::Upload, message);
        e.details = Some(json!({
            "filename": filename,
            "size": size,
            "transferKey": transfer_key,
        }));
        e
    }

    /// Seconds to wait before retrying, present on `RateLimit` errors when
    /// the backend sent a parseable `retry-after` header.
    pub fn retry_after(&self) -> Option<u64> {
        self.retry_after
    }
}

/// Maps a non-2xx response to exactly one [`DriveError`].
///
/// Pure and total: every status code maps to one kind and no input makes it
/// panic. The human message comes from `body.message`, then `body.error`,
/// then a generated string carrying the status code.
pub fn classify(status: u16, body: Option<&Value>, headers: &HeaderMap) -> DriveError {
    let message = extract_message(status, body);

    match status {
        401 => DriveError {
            status_code: Some(status),
            ..DriveError::new(ErrorKind::Authentication, message)
        },
        404 => DriveError {
            status_code: Some(status),
            ..DriveError::new(ErrorKind::NotFound, message)
        },
        400 => DriveError {
            status_code: Some(status),
            details: body.and_then(|b| b.get("details")).cloned(),
            ..DriveError::new(ErrorKind::Validation, message)
        },
        429 => DriveError {
            status_code: Some(status),
            retry_after: parse_retry_after(headers),
            ..DriveError::new(ErrorKind::RateLimit, message)
        },
        403 if message.to_lowercase().contains("limit") => DriveError {
            status_code: Some(status),
            ..DriveError::new(ErrorKind::LimitExceeded, message)
        },
        403 => DriveError {
            status_code: Some(status),
            code: Some("FORBIDDEN".to_string()),
            ..DriveError::new(ErrorKind::Generic, message)
        },
        _ => DriveError {
            status_code: Some(status),
            ..DriveError::new(ErrorKind::Generic, message)
        },
    }
}

fn extract_message(status: u16, body: Option<&Value>) -> String {
    body.and_then(|b| b.get("message"))
        .and_then(Value::as_str)
        .or_else(|| body.and_then(|b| b.get("error")).and_then(Value::as_str))
        .map(String::from)
        .unwrap_or_else(|| format!("request failed with status {status}"))
}

fn parse_retry_after(headers: &HeaderMap) -> Option<u64> {
    headers
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::quickcheck;

    fn classify_status(status: u16) -> DriveError {
        classify(status, None, &HeaderMap::new())
    }

    #[test]
    fn status_table() {
        assert_eq!(classify_status(401).kind, ErrorKind::Authentication);
        assert_eq!(classify_status(404).kind, ErrorKind::NotFound);
        assert_eq!(classify_status(400).kind, ErrorKind::Validation);
        assert_eq!(classify_status(429).kind, ErrorKind::RateLimit);
        assert_eq!(classify_status(500).kind, ErrorKind::Generic);
        assert_eq!(classify_status(503).kind, ErrorKind::Generic);
        assert_eq!(classify_status(503).status_code, Some(503));
    }

    #[test]
    fn message_fallback_chain() {
        let body = json!({"message": "broke", "error": "ignored"});
        assert_eq!(classify(500, Some(&body), &HeaderMap::new()).message, "broke");

        let body = json!({"error": "secondary"});
        assert_eq!(
            classify(500, Some(&body), &HeaderMap::new()).message,
            "secondary"
        );

        let e = classify_status(502);
        assert!(e.message.contains("502"));
    }

    #[test]
    fn forbidden_splits_on_limit_substring() {
        let body = json!({"message": "Storage LIMIT exceeded"});
        let e = classify(403, Some(&body), &HeaderMap::new());
        assert_eq!(e.kind, ErrorKind::LimitExceeded);
        assert_eq!(e.code, None);

        let body = json!({"message": "access denied"});
        let e = classify(403, Some(&body), &HeaderMap::new());
        assert_eq!(e.kind, ErrorKind::Generic);
        assert_eq!(e.code.as_deref(), Some("FORBIDDEN"));
    }

    #[test]
    fn rate_limit_retry_after_header() {
        let mut headers = HeaderMap::new();
        headers.insert("retry-after", "120".parse().unwrap());
        let e = classify(429, None, &headers);
        assert_eq!(e.kind, ErrorKind::RateLimit);
        assert_eq!(e.retry_after(), Some(120));

        let mut headers = HeaderMap::new();
        headers.insert("retry-after", "soon".parse().unwrap());
        assert_eq!(classify(429, None, &headers).retry_after(), None);

        assert_eq!(classify_status(429).retry_after(), None);
    }

    #[test]
    fn validation_carries_details() {
        let body = json!({"message": "bad folder", "details": {"field": "folderId"}});
        let e = classify(400, Some(&body), &HeaderMap::new());
        assert_eq!(e.kind, ErrorKind::Validation);
        assert_eq!(e.details, Some(json!({"field": "folderId"})));
    }

    #[test]
    fn upload_error_details_shape() {
        let e = DriveError::upload("transfer died", "a.txt", 12, "tk-1");
        assert_eq!(e.kind, ErrorKind::Upload);
        assert_eq!(e.status_code, None);
        assert_eq!(
            e.details,
            Some(json!({"filename": "a.txt", "size": 12, "transferKey": "tk-1"}))
        );
    }

    #[test]
    fn fixed_constructors_carry_no_status() {
        assert_eq!(DriveError::network("down").status_code, None);
        assert_eq!(DriveError::timeout("slow").status_code, None);
        assert_eq!(DriveError::network("down").kind, ErrorKind::Network);
        assert_eq!(DriveError::timeout("slow").kind, ErrorKind::Timeout);
    }

    #[test]
    fn classify_is_deterministic() {
        fn prop(status: u16) -> bool {
            classify_status(status) == classify_status(status)
        }
        quickcheck(prop as fn(u16) -> bool);
    }
}
