// API client module: a small blocking HTTP client that POSTs JSON bodies to
// the SimpleQL endpoint. Each command issues exactly one request and waits
// for it, so output never interleaves.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;

use crate::config::Config;
use crate::error::CliError;
use crate::session::Session;

/// API client that holds a reqwest blocking client, the resolved endpoint
/// and the session whose credential is attached to every request.
pub struct ApiClient {
    client: Client,
    endpoint: String,
    session: Session,
}

impl ApiClient {
    /// Create an ApiClient for the endpoint described by `config`.
    ///
    /// No timeout is set: a request that never answers never reports.
    pub fn new(config: &Config) -> Result<Self> {
        let endpoint = config.endpoint()?;
        Self::with_endpoint(endpoint)
    }

    /// Create an ApiClient for an already resolved endpoint URL.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(None::<Duration>)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient {
            client,
            endpoint: endpoint.into(),
            session: Session::new(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Build the header map: JSON content type plus the bearer token when
    /// the session holds one.
    fn headers(&self) -> Result<HeaderMap, CliError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(bearer) = self.session.bearer() {
            let value = HeaderValue::from_str(&bearer).map_err(|_| CliError::InvalidCredential)?;
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }

    /// POST `body` to the endpoint and decode the JSON answer.
    ///
    /// A missing response is a [`CliError::Transport`]; a non-2xx status
    /// returns the response body verbatim as [`CliError::Api`].
    pub fn post(&self, body: &Value) -> Result<Value, CliError> {
        log::debug!(
            "POST {} (auth: {})",
            self.endpoint,
            if self.session.is_set() { "bearer" } else { "none" }
        );
        let res = self
            .client
            .post(&self.endpoint)
            .headers(self.headers()?)
            .json(body)
            .send()
            .map_err(|e| CliError::Transport(e.to_string()))?;

        let status = res.status();
        let txt = res.text().map_err(|e| CliError::Transport(e.to_string()))?;
        log::debug!("{} answered {} ({} bytes)", self.endpoint, status, txt.len());

        if !status.is_success() {
            let body = if txt.trim().is_empty() {
                status.to_string()
            } else {
                txt
            };
            return Err(CliError::Api {
                status: status.as_u16(),
                body,
            });
        }
        if txt.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&txt)?)
    }
}
