//! WhatsApp deep-link composition.
//!
//! Turns a stored file reference and a raw phone number into
//! `https://wa.me/<digits>?text=<percent-encoded absolute pdf url>` and hands
//! the result to a [`LinkOpener`]. Composition is pure; the only side effect
//! lives behind the opener.

use tracing::info;
use url::Url;

use crate::config::BackendConfig;
use crate::error::ApiError;

/// Something that can open a URL in a new browsing context.
pub trait LinkOpener {
    fn open(&self, url: &str) -> Result<(), ApiError>;
}

/// Opens links in the user's default web browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowser;

impl LinkOpener for SystemBrowser {
    fn open(&self, url: &str) -> Result<(), ApiError> {
        webbrowser::open(url).map_err(|e| ApiError::OpenLink(e.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct LinkComposer<O = SystemBrowser> {
    backend_url: String,
    messaging_url: String,
    opener: O,
}

impl LinkComposer<SystemBrowser> {
    pub fn new(config: &BackendConfig) -> Self {
        Self::with_opener(config, SystemBrowser)
    }
}

impl<O: LinkOpener> LinkComposer<O> {
    pub fn with_opener(config: &BackendConfig, opener: O) -> Self {
        Self {
            backend_url: config.backend_url().to_string(),
            messaging_url: config.messaging_url().to_string(),
            opener,
        }
    }

    /// Absolute URL for a file reference.
    pub fn resolve_pdf_url(&self, pdf_url: &str) -> String {
        resolve_against(&self.backend_url, pdf_url)
    }

    /// Deep link for `phone` carrying the resolved PDF URL as message text.
    pub fn compose_link(&self, phone: &str, pdf_url: &str) -> String {
        let message = self.resolve_pdf_url(pdf_url);
        format!(
            "{}/{}?text={}",
            self.messaging_url,
            sanitize_phone(phone),
            urlencoding::encode(&message)
        )
    }

    /// Compose the link and open it. `name` only labels the log event; the
    /// message text is the bare PDF URL.
    pub fn send_to_whatsapp(
        &self,
        phone: &str,
        name: &str,
        pdf_url: &str,
    ) -> Result<String, ApiError> {
        let link = self.compose_link(phone, pdf_url);
        info!(student = name, phone = %sanitize_phone(phone), "opening whatsapp link");
        self.opener.open(&link)?;
        Ok(link)
    }
}

/// Strip everything that is not an ASCII digit. May return an empty string.
pub fn sanitize_phone(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Absolute http(s) references are returned unchanged. Anything else is
/// appended to `base` with exactly one `/` between them.
pub fn resolve_against(base: &str, pdf_url: &str) -> String {
    if is_absolute_http(pdf_url) {
        return pdf_url.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        pdf_url.trim_start_matches('/')
    )
}

fn is_absolute_http(reference: &str) -> bool {
    Url::parse(reference)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}
