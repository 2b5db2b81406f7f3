//! Domain DTOs for the batch-vault API.
//!
//! # Design
//! These types mirror the backend's schema but are defined independently of
//! the mock-server crate. Integration tests catch any schema drift between
//! the two.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Backend-assigned identifier for batches and students.
pub type Id = i64;

/// A named group of students sharing a distributed PDF.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Batch {
    pub id: Id,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub students: Vec<Student>,
}

/// A recipient belonging to one batch. `phone` is stored exactly as entered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Student {
    pub id: Id,
    pub name: String,
    pub phone: String,
    /// File reference of this student's generated PDF, absolute or relative
    /// to the backend root. `None` until a PDF has been uploaded.
    #[serde(default)]
    pub pdf_url: Option<String>,
}

/// Request payload for creating a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBatch {
    pub name: String,
}

/// Request payload for adding a student to a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStudent {
    pub name: String,
    pub phone: String,
}

/// A PDF selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl PdfFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: "application/pdf".to_string(),
            bytes,
        }
    }
}

/// Body returned by a successful upload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadReport {
    pub message: String,
    #[serde(default)]
    pub count: u32,
}
