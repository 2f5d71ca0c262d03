//! Blocking client for the letter-generation server.
//!
//! Generation is a two-step exchange: `POST /generate_letter` returns a
//! status and a link, then the PDF is fetched from that link. The second
//! request is only issued once the first has succeeded, and a client runs
//! at most one generation at a time.

use crate::letter::{LetterForm, LetterRequest};
use crate::{Error, Result};
use chrono::NaiveDate;
use log::debug;
use reqwest::blocking::{Client, RequestBuilder};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
#[cfg(feature = "async")]
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Letter server connection settings
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the letter server
    pub server_url: String,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
    /// User agent string to send with requests
    pub user_agent: String,
    /// Custom HTTP headers
    pub headers: HashMap<String, String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8000".to_string(),
            timeout_ms: 30000,
            user_agent: concat!("sigletter/", env!("CARGO_PKG_VERSION")).to_string(),
            headers: HashMap::new(),
        }
    }
}

impl ClientConfig {
    /// Read `SERVER_URL` (required) and `SIGLETTER_TIMEOUT_MS` (optional).
    pub fn from_env() -> Result<Self> {
        let server_url = std::env::var("SERVER_URL")
            .map_err(|_| Error::ConfigError("SERVER_URL is not set".into()))?;
        let mut config = Self {
            server_url,
            ..Default::default()
        };
        if let Ok(raw) = std::env::var("SIGLETTER_TIMEOUT_MS") {
            config.timeout_ms = raw.trim().parse().map_err(|_| {
                Error::ConfigError(format!("SIGLETTER_TIMEOUT_MS is not a number: '{}'", raw))
            })?;
        }
        Ok(config)
    }
}

/// A downloaded letter.
#[derive(Debug, Clone)]
pub struct GeneratedLetter {
    /// Suggested file name (`<name> благодарственное письмо.pdf`)
    pub file_name: String,
    /// Where the PDF was fetched from
    pub pdf_url: String,
    /// PDF bytes
    pub bytes: Vec<u8>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PingResponse {
    message: String,
}

/// Single in-flight marker.
#[derive(Debug, Default)]
pub(crate) struct BusyFlag(AtomicBool);

pub(crate) struct BusyGuard<'a>(&'a AtomicBool);

/// Owned guard on a shared flag, handed to whoever finishes the work.
#[cfg(feature = "async")]
pub(crate) struct SharedBusyGuard(Arc<BusyFlag>);

impl BusyFlag {
    fn set(&self) -> Result<()> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(|_| Error::Busy)
    }

    pub(crate) fn try_acquire(&self) -> Result<BusyGuard<'_>> {
        self.set()?;
        Ok(BusyGuard(&self.0))
    }

    #[cfg(feature = "async")]
    pub(crate) fn try_acquire_shared(self: &Arc<Self>) -> Result<SharedBusyGuard> {
        self.set()?;
        Ok(SharedBusyGuard(Arc::clone(self)))
    }

    pub(crate) fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(feature = "async")]
impl Drop for SharedBusyGuard {
    fn drop(&mut self) {
        self.0 .0.store(false, Ordering::Release);
    }
}

pub struct LetterClient {
    client: Client,
    config: ClientConfig,
    base: Url,
    busy: BusyFlag,
}

impl LetterClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut base = Url::parse(&config.server_url).map_err(|e| {
            Error::ConfigError(format!("invalid server URL '{}': {}", config.server_url, e))
        })?;
        // Treat the base as a directory so endpoint joins append to it.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| Error::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            base,
            busy: BusyFlag::default(),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// True while a generation is outstanding.
    pub fn is_busy(&self) -> bool {
        self.busy.is_set()
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| Error::ConfigError(format!("cannot resolve '{}': {}", path, e)))
    }

    fn with_headers(&self, mut req: RequestBuilder) -> RequestBuilder {
        req = req.header("User-Agent", self.config.user_agent.clone());
        for (k, v) in &self.config.headers {
            req = req.header(k.as_str(), v.as_str());
        }
        req
    }

    /// Health check against `GET /ping`.
    pub fn ping(&self) -> Result<()> {
        let url = self.endpoint("ping")?;
        let resp = self.with_headers(self.client.get(url)).send()?.error_for_status()?;
        let body: PingResponse = resp
            .json()
            .map_err(|_| Error::ServerError("Invalid ping response".into()))?;
        if body.message == "Pong" {
            Ok(())
        } else {
            Err(Error::ServerError(format!("unexpected ping reply '{}'", body.message)))
        }
    }

    /// Validate `form` and generate its letter.
    ///
    /// Validation errors are returned before any request is sent.
    pub fn submit(&self, form: &LetterForm, today: NaiveDate) -> Result<GeneratedLetter> {
        let request = form.to_request(today)?;
        self.generate(&request)
    }

    /// Request a letter and download the resulting PDF.
    ///
    /// Fails with [`Error::Busy`] if another generation is still running.
    pub fn generate(&self, request: &LetterRequest) -> Result<GeneratedLetter> {
        let _guard = self.busy.try_acquire()?;

        let url = self.endpoint("generate_letter")?;
        debug!("requesting letter for '{}' at {}", request.recipient.display_name(), url);
        let resp = self
            .with_headers(self.client.post(url))
            .json(request)
            .send()?
            .error_for_status()?;

        let result: GenerateResponse = resp
            .json()
            .map_err(|_| Error::ServerError("Invalid server response".into()))?;
        let link = match result.message {
            Some(m) if result.status == "Success" && !m.trim().is_empty() => m,
            _ => return Err(Error::ServerError("Invalid server response".into())),
        };

        let pdf_url = self.endpoint(link.trim())?;
        debug!("fetching letter PDF from {}", pdf_url);
        let pdf = self
            .with_headers(self.client.get(pdf_url.clone()))
            .send()?;
        let status = pdf.status();
        if !status.is_success() {
            return Err(Error::ServerError(format!(
                "Failed to fetch PDF: {}",
                status.as_u16()
            )));
        }
        let bytes = pdf.bytes()?.to_vec();

        Ok(GeneratedLetter {
            file_name: request.file_name(),
            pdf_url: pdf_url.to_string(),
            bytes,
        })
    }
}
