//! HTTP client for the per-source search/detail endpoints and the save form.
//!
//! Every call is a form-encoded `POST` relative to one server base URL. JSON
//! endpoints answer with a `{"success": bool, "message"?: string}` envelope,
//! sometimes with a non-2xx status (a `404` for "no suggestions"), so the
//! envelope is honoured whenever the body parses as JSON.

use std::time::Duration;

use pricematch_core::{Candidate, SelectedProduct, SourceConfig};
use reqwest::{Client, Url};
use serde_json::Value;

use crate::error::SourceError;
use crate::normalize::{normalize_candidates, normalize_detail};

/// Result of a form submission the server accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub status: u16,
    /// URL of the page the submission ended on, after redirects.
    pub final_url: String,
}

/// Client for the comparison server's source endpoints.
///
/// No retries: a failed request is reported once and left to the caller.
#[derive(Debug, Clone)]
pub struct SourceClient {
    client: Client,
    base_url: Url,
}

impl SourceClient {
    /// Creates a client with the configured timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`SourceError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Ensure exactly one trailing slash so joined paths append to any
        // prefix instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| SourceError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(SourceError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: "URL cannot be used as a base".into(),
            });
        }

        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    /// Runs a search against one source and returns its normalized candidates.
    ///
    /// # Errors
    ///
    /// - [`SourceError::Api`] if the endpoint reports `"success": false`
    ///   (including "no products found").
    /// - [`SourceError::Http`] / [`SourceError::UnexpectedStatus`] on
    ///   transport failure or a non-JSON error response.
    /// - [`SourceError::Deserialize`] if a 2xx body is not JSON.
    pub async fn search(
        &self,
        source: &SourceConfig,
        term: &str,
    ) -> Result<Vec<Candidate>, SourceError> {
        let url = self.endpoint(&source.search_path)?;
        tracing::debug!(source = %source.name, term, "searching source");

        let mut body = self.post_json(url, &[("search_term", term)]).await?;
        Self::check_envelope(&body)?;

        let rows = match body.get_mut("products").map(Value::take) {
            Some(Value::Array(rows)) => rows,
            _ => Vec::new(),
        };
        Ok(normalize_candidates(source, rows))
    }

    /// Fetches and normalizes the detail record for one candidate.
    ///
    /// # Errors
    ///
    /// As for [`Self::search`], plus [`SourceError::Normalization`] if the
    /// payload lacks the shape the source requires.
    pub async fn fetch_detail(
        &self,
        source: &SourceConfig,
        identifier: &str,
    ) -> Result<SelectedProduct, SourceError> {
        let url = self.endpoint(&source.detail_path)?;
        tracing::debug!(source = %source.name, identifier, "fetching product detail");

        let body = self
            .post_json(url, &[(source.detail_field(), identifier)])
            .await?;
        Self::check_envelope(&body)?;
        normalize_detail(source, identifier, body)
    }

    /// Submits a plain HTML form (not a JSON endpoint). Redirects are
    /// followed; any final 2xx status counts as accepted.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] on transport failure and
    /// [`SourceError::UnexpectedStatus`] for a non-2xx final status.
    pub async fn submit_form(
        &self,
        path: &str,
        fields: &[(&str, String)],
    ) -> Result<SubmitReceipt, SourceError> {
        let url = self.endpoint(path)?;
        let response = self.client.post(url.clone()).form(fields).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(SubmitReceipt {
            status: status.as_u16(),
            final_url: response.url().to_string(),
        })
    }

    /// Resolves an endpoint path against the base URL.
    fn endpoint(&self, path: &str) -> Result<Url, SourceError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| SourceError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: format!("cannot join path '{path}': {e}"),
            })
    }

    /// Posts a form and parses the response body as JSON.
    ///
    /// A non-2xx response with a JSON body is returned as-is so the envelope
    /// can explain the failure; without one it becomes
    /// [`SourceError::UnexpectedStatus`].
    async fn post_json(&self, url: Url, form: &[(&str, &str)]) -> Result<Value, SourceError> {
        let response = self
            .client
            .post(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .form(form)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        match serde_json::from_str::<Value>(&body) {
            Ok(value) if status.is_success() || value.get("success").is_some() => Ok(value),
            Ok(_) => Err(SourceError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            }),
            Err(_) if !status.is_success() => Err(SourceError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            }),
            Err(e) => Err(SourceError::Deserialize {
                context: url.to_string(),
                source: e,
            }),
        }
    }

    /// Checks the `"success"` flag; anything but `true` is a failure.
    fn check_envelope(body: &Value) -> Result<(), SourceError> {
        if body.get("success").and_then(Value::as_bool) == Some(true) {
            return Ok(());
        }
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string);
        Err(SourceError::Api { message })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
