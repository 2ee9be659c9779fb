//! HTTP client for the appointment wizard pages.
//!
//! Wraps `reqwest` with a custom base URL hook for tests and bounded
//! exponential-backoff retries on transient failures. The HTTP status of
//! every response is surfaced as a tracing diagnostic.

use std::time::Duration;

use crate::error::ScrapeError;

const DEFAULT_BASE_URL: &str = "https://telegov.njportal.com/njmvc/AppointmentWizard";

/// Appointment service offered by the wizard, keyed to its numeric page id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    /// Initial permit/license appointment.
    Initial,
    /// Non-driver ID appointment.
    NonDriverId,
}

impl Service {
    pub fn wizard_id(self) -> u32 {
        match self {
            Service::Initial => 15,
            Service::NonDriverId => 16,
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Service::Initial => "initial",
            Service::NonDriverId => "nondriverid",
        }
    }
}

impl std::str::FromStr for Service {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "initial" => Ok(Service::Initial),
            "nondriverid" => Ok(Service::NonDriverId),
            other => Err(format!(
                "unknown service '{other}' (expected 'initial' or 'nondriverid')"
            )),
        }
    }
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

/// Client for the appointment wizard.
///
/// Use [`WizardClient::new`] for production or [`WizardClient::with_base_url`]
/// to point at a mock server in tests.
pub struct WizardClient {
    client: reqwest::Client,
    base_url: String,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl WizardClient {
    /// Creates a client pointed at the production wizard.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ScrapeError> {
        Self::with_base_url(
            timeout_secs,
            user_agent,
            max_retries,
            backoff_base_secs,
            DEFAULT_BASE_URL,
        )
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_base_url(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
        base_url: &str,
    ) -> Result<Self, ScrapeError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_retries,
            backoff_base_secs,
        })
    }

    /// The wizard page URL for a service; also the base for per-location
    /// deep links (`<wizard url>/<location id>`).
    pub fn wizard_url(&self, service: Service) -> String {
        format!("{}/{}", self.base_url, service.wizard_id())
    }

    /// Fetch the raw wizard page for a service.
    ///
    /// # Errors
    ///
    /// - [`ScrapeError::Http`] on network failure after retries.
    /// - [`ScrapeError::HttpStatus`] on a non-2xx response after retries.
    pub async fn fetch_wizard_page(&self, service: Service) -> Result<String, ScrapeError> {
        self.fetch_page(&self.wizard_url(service)).await
    }

    /// Fetch an arbitrary page body. Used by the stock refresh checker.
    ///
    /// Retries transient failures (network errors, 429, 5xx) with
    /// exponential backoff (`base * 2^attempt` seconds); other statuses are
    /// returned immediately.
    ///
    /// # Errors
    ///
    /// - [`ScrapeError::Http`] on network failure after retries.
    /// - [`ScrapeError::HttpStatus`] on a non-2xx response after retries.
    pub async fn fetch_page(&self, url: &str) -> Result<String, ScrapeError> {
        let mut attempt = 0u32;
        loop {
            match self.fetch_once(url).await {
                Ok(body) => return Ok(body),
                Err(err) => {
                    if !is_retriable(&err) || attempt >= self.max_retries {
                        return Err(err);
                    }
                    let delay_secs = self
                        .backoff_base_secs
                        .saturating_mul(1u64 << attempt.min(62));
                    tracing::warn!(
                        url,
                        attempt,
                        delay_secs,
                        error = %err,
                        "transient fetch error; retrying after backoff"
                    );
                    tokio::time::sleep(Duration::from_secs(delay_secs)).await;
                    attempt += 1;
                }
            }
        }
    }

    async fn fetch_once(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        tracing::debug!(url, status = status.as_u16(), "wizard page response");
        if !status.is_success() {
            return Err(ScrapeError::HttpStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }
        Ok(response.text().await?)
    }
}

fn is_retriable(err: &ScrapeError) -> bool {
    match err {
        ScrapeError::Http(_) => true,
        ScrapeError::HttpStatus { status, .. } => *status == 429 || *status >= 500,
        _ => false,
    }
}
