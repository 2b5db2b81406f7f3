//! Client core for the batch-vault notes distribution service.
//!
//! # Overview
//! Manages batches and their students over the backend's REST API, uploads
//! the PDF a batch should receive, and composes the WhatsApp deep link that
//! delivers each student's copy.
//!
//! # Design
//! - `BatchClient` builds `HttpRequest` values and parses `HttpResponse`
//!   values without touching the network (host-does-IO pattern).
//! - `RequestClient` is the reqwest-backed host that executes those requests.
//! - `LinkComposer` is pure apart from the injected `LinkOpener`.
//! - Every address derives from one `BackendConfig` passed in at construction.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod link;
pub mod transport;
pub mod types;

pub use client::BatchClient;
pub use config::BackendConfig;
pub use error::ApiError;
pub use http::{HttpBody, HttpMethod, HttpRequest, HttpResponse};
pub use link::{sanitize_phone, LinkComposer, LinkOpener, SystemBrowser};
pub use transport::RequestClient;
pub use types::{Batch, Id, NewBatch, NewStudent, PdfFile, Student, UploadReport};
