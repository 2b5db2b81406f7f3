//! Stateless HTTP request builder and response parser for the batch-vault API.
//!
//! # Design
//! `BatchClient` holds only the API root and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The host executes the actual HTTP round-trip in between.
//!
//! Every `parse_*` classifies the status before touching the body:
//! `get_batch` treats any failure as `NotFound`, `upload_pdf` surfaces the
//! server's `message`, and the rest map 404 to `NotFound` and anything else
//! to `HttpError`.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::BackendConfig;
use crate::error::{ApiError, UPLOAD_FAILED_MESSAGE};
use crate::http::{HttpBody, HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Batch, Id, NewBatch, NewStudent, PdfFile, Student, UploadReport};

/// Multipart field name the backend reads the uploaded PDF from.
pub const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Clone)]
pub struct BatchClient {
    api_base: String,
}

impl BatchClient {
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            api_base: config.api_base(),
        }
    }

    pub fn build_list_batches(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}/batches/", self.api_base),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create_batch(&self, name: &str) -> Result<HttpRequest, ApiError> {
        let input = NewBatch {
            name: name.to_string(),
        };
        json_request(format!("{}/batches/", self.api_base), &input)
    }

    pub fn build_get_batch(&self, id: Id) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}/batches/{id}", self.api_base),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_add_student(
        &self,
        batch_id: Id,
        name: &str,
        phone: &str,
    ) -> Result<HttpRequest, ApiError> {
        let input = NewStudent {
            name: name.to_string(),
            phone: phone.to_string(),
        };
        json_request(
            format!("{}/batches/{batch_id}/students/", self.api_base),
            &input,
        )
    }

    pub fn build_upload_pdf(&self, batch_id: Id, file: PdfFile) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}/batches/{batch_id}/upload_pdf", self.api_base),
            headers: Vec::new(),
            body: Some(HttpBody::Multipart {
                field: UPLOAD_FIELD.to_string(),
                file,
            }),
        }
    }

    pub fn parse_list_batches(&self, response: HttpResponse) -> Result<Vec<Batch>, ApiError> {
        check_status(&response)?;
        parse_body(&response)
    }

    pub fn parse_create_batch(&self, response: HttpResponse) -> Result<Batch, ApiError> {
        check_status(&response)?;
        parse_body(&response)
    }

    /// Any non-2xx response means the batch is not available, whatever the body.
    pub fn parse_get_batch(&self, response: HttpResponse) -> Result<Batch, ApiError> {
        if !response.is_success() {
            return Err(ApiError::NotFound);
        }
        parse_body(&response)
    }

    pub fn parse_add_student(&self, response: HttpResponse) -> Result<Student, ApiError> {
        check_status(&response)?;
        parse_body(&response)
    }

    pub fn parse_upload_pdf(&self, response: HttpResponse) -> Result<UploadReport, ApiError> {
        if !response.is_success() {
            return Err(ApiError::UploadFailed(upload_failure_message(&response.body)));
        }
        parse_body(&response)
    }
}

fn json_request<T: serde::Serialize>(url: String, input: &T) -> Result<HttpRequest, ApiError> {
    let body =
        serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
    Ok(HttpRequest {
        method: HttpMethod::Post,
        url,
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: Some(HttpBody::Json(body)),
    })
}

fn parse_body<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

#[derive(Deserialize)]
struct FailureBody {
    message: Option<String>,
}

/// The `message` field of an error body, or the generic fallback when the
/// body is not JSON or the field is absent or empty.
fn upload_failure_message(body: &str) -> String {
    serde_json::from_str::<FailureBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| UPLOAD_FAILED_MESSAGE.to_string())
}
