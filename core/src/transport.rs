//! Async executor pairing `BatchClient` with a `reqwest` connection.
//!
//! `RequestClient` is the I/O half of the host-does-IO split: each method
//! builds a request with `BatchClient`, performs exactly one round-trip, and
//! hands the raw response back to the matching `parse_*`. There is no retry,
//! cache or shared mutable state; concurrent calls complete in any order.

use reqwest::multipart::{Form, Part};
use tracing::{debug, instrument, warn};

use crate::client::BatchClient;
use crate::config::BackendConfig;
use crate::error::ApiError;
use crate::http::{HttpBody, HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Batch, Id, PdfFile, Student, UploadReport};

#[derive(Debug, Clone)]
pub struct RequestClient {
    http: reqwest::Client,
    client: BatchClient,
}

impl RequestClient {
    pub fn new(config: &BackendConfig) -> Self {
        Self::with_http_client(config, reqwest::Client::new())
    }

    /// Use a preconfigured `reqwest::Client` (proxies, timeouts, TLS roots).
    pub fn with_http_client(config: &BackendConfig, http: reqwest::Client) -> Self {
        Self {
            http,
            client: BatchClient::new(config),
        }
    }

    #[instrument(skip(self))]
    pub async fn list_batches(&self) -> Result<Vec<Batch>, ApiError> {
        let response = self.execute(self.client.build_list_batches()).await?;
        self.client.parse_list_batches(response)
    }

    #[instrument(skip(self))]
    pub async fn create_batch(&self, name: &str) -> Result<Batch, ApiError> {
        let request = self.client.build_create_batch(name)?;
        let response = self.execute(request).await?;
        self.client.parse_create_batch(response)
    }

    #[instrument(skip(self))]
    pub async fn get_batch(&self, id: Id) -> Result<Batch, ApiError> {
        let response = self.execute(self.client.build_get_batch(id)).await?;
        self.client.parse_get_batch(response)
    }

    #[instrument(skip(self, phone))]
    pub async fn add_student(
        &self,
        batch_id: Id,
        name: &str,
        phone: &str,
    ) -> Result<Student, ApiError> {
        let request = self.client.build_add_student(batch_id, name, phone)?;
        let response = self.execute(request).await?;
        self.client.parse_add_student(response)
    }

    #[instrument(skip(self, file), fields(file_name = %file.file_name, size = file.bytes.len()))]
    pub async fn upload_pdf(&self, batch_id: Id, file: PdfFile) -> Result<UploadReport, ApiError> {
        let response = self
            .execute(self.client.build_upload_pdf(batch_id, file))
            .await?;
        self.client.parse_upload_pdf(response)
    }

    /// Perform one round-trip. Non-2xx statuses are returned as data so the
    /// parser decides how to classify them.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = ?request.method, url = %request.url, "sending request");

        let mut builder = match request.method {
            HttpMethod::Get => self.http.get(&request.url),
            HttpMethod::Post => self.http.post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match request.body {
            Some(HttpBody::Json(body)) => builder.body(body),
            Some(HttpBody::Multipart { field, file }) => {
                builder.multipart(multipart_form(field, file)?)
            }
            None => builder,
        };

        let response = builder.send().await.map_err(|e| {
            warn!(url = %request.url, error = %e, "transport failure");
            ApiError::Transport(e.to_string())
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.text().await?;

        let response = HttpResponse {
            status,
            headers,
            body,
        };
        if !response.is_success() {
            warn!(url = %request.url, status, "request rejected by backend");
        }
        Ok(response)
    }
}

fn multipart_form(field: String, file: PdfFile) -> Result<Form, ApiError> {
    let part = Part::bytes(file.bytes)
        .file_name(file.file_name)
        .mime_str(&file.content_type)
        .map_err(|e| ApiError::SerializationError(e.to_string()))?;
    Ok(Form::new().part(field, part))
}
