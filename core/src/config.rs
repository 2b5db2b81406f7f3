//! Backend and messaging-service addresses.
//!
//! Both the request builder and the link composer resolve paths against the
//! same `BackendConfig`, so a deployment only ever sets the backend address
//! in one place.

use url::Url;

use crate::error::ApiError;

pub const BACKEND_URL_ENV: &str = "BATCHVAULT_BACKEND_URL";
pub const MESSAGING_URL_ENV: &str = "BATCHVAULT_MESSAGING_URL";

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_MESSAGING_URL: &str = "https://wa.me";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    backend_url: String,
    messaging_url: String,
}

impl BackendConfig {
    /// Validate `backend_url` and pair it with the default messaging service.
    pub fn new(backend_url: &str) -> Result<Self, ApiError> {
        Ok(Self {
            backend_url: validate_base(backend_url)?,
            messaging_url: DEFAULT_MESSAGING_URL.to_string(),
        })
    }

    pub fn with_messaging_url(mut self, messaging_url: &str) -> Result<Self, ApiError> {
        self.messaging_url = validate_base(messaging_url)?;
        Ok(self)
    }

    /// Read `BATCHVAULT_BACKEND_URL` and `BATCHVAULT_MESSAGING_URL`, falling
    /// back to the local backend and `https://wa.me`.
    pub fn from_env() -> Result<Self, ApiError> {
        let backend = std::env::var(BACKEND_URL_ENV).ok();
        let messaging = std::env::var(MESSAGING_URL_ENV).ok();
        Self::from_values(backend.as_deref(), messaging.as_deref())
    }

    /// Build from optional raw values as read from the environment.
    pub fn from_values(backend: Option<&str>, messaging: Option<&str>) -> Result<Self, ApiError> {
        let config = Self::new(backend.unwrap_or(DEFAULT_BACKEND_URL))?;
        match messaging {
            Some(messaging) => config.with_messaging_url(messaging),
            None => Ok(config),
        }
    }

    /// Backend root without a trailing slash, e.g. `https://backend.example`.
    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }

    pub fn messaging_url(&self) -> &str {
        &self.messaging_url
    }

    /// Root of the REST API: `<backend>/api`.
    pub fn api_base(&self) -> String {
        format!("{}/api", self.backend_url)
    }
}

fn validate_base(raw: &str) -> Result<String, ApiError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed).map_err(|e| ApiError::InvalidUrl(format!("{raw}: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") || !parsed.has_host() {
        return Err(ApiError::InvalidUrl(format!(
            "{raw}: expected an absolute http(s) url"
        )));
    }
    // Paths are appended to the base as text.
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(ApiError::InvalidUrl(format!(
            "{raw}: base url must not carry a query or fragment"
        )));
    }
    Ok(trimmed.to_string())
}
