//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data.
//! `BatchClient` builds `HttpRequest` values and parses `HttpResponse`
//! values without touching the network; `RequestClient` (or any other host)
//! executes the actual I/O in between. This keeps status handling and body
//! parsing deterministic and testable without a server.
//!
//! All fields use owned types so requests can be queued or moved across
//! tasks without lifetime concerns.

use crate::types::PdfFile;

/// HTTP method for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Request payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpBody {
    /// Serialized JSON document, sent with `content-type: application/json`.
    Json(String),
    /// A single-file multipart form. `field` is the form field name.
    Multipart { field: String, file: PdfFile },
}

impl HttpBody {
    pub fn as_json(&self) -> Option<&str> {
        match self {
            HttpBody::Json(body) => Some(body),
            HttpBody::Multipart { .. } => None,
        }
    }
}

/// An HTTP request described as plain data.
///
/// Built by `BatchClient::build_*` methods. `url` is always absolute.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<HttpBody>,
}

/// An HTTP response described as plain data.
///
/// Constructed by the host after executing an `HttpRequest`, then passed
/// to `BatchClient::parse_*` methods.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
