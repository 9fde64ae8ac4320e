//! HTTP transport used by the SPARQL client.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};

use crate::error::SparqlError;

/// Status and body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: String,
}

impl HttpResponse {
    /// Returns true for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Blocking HTTP POST, abstracted so the client can be exercised offline.
pub trait HttpTransport {
    /// POSTs `form` URL-encoded, optionally with an `Accept` header.
    ///
    /// # Errors
    ///
    /// Returns [`SparqlError::Transport`] if no response was received.
    fn post_form(
        &self,
        url: &str,
        form: &[(&str, &str)],
        accept: Option<&str>,
    ) -> Result<HttpResponse, SparqlError>;

    /// POSTs a raw body with the given content type.
    ///
    /// # Errors
    ///
    /// Returns [`SparqlError::Transport`] if no response was received.
    fn post_body(
        &self,
        url: &str,
        content_type: &str,
        body: String,
    ) -> Result<HttpResponse, SparqlError>;
}

/// [`HttpTransport`] over a `reqwest` blocking client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Builds a client with the given request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new(timeout: Duration) -> Result<Self, SparqlError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| SparqlError::Transport {
                url: String::new(),
                source,
            })?;
        Ok(Self { client })
    }

    fn finish(
        url: &str,
        result: reqwest::Result<reqwest::blocking::Response>,
    ) -> Result<HttpResponse, SparqlError> {
        let wrap = |source| SparqlError::Transport {
            url: url.to_owned(),
            source,
        };
        let response = result.map_err(wrap)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(wrap)?;
        Ok(HttpResponse { status, body })
    }
}

impl HttpTransport for ReqwestTransport {
    fn post_form(
        &self,
        url: &str,
        form: &[(&str, &str)],
        accept: Option<&str>,
    ) -> Result<HttpResponse, SparqlError> {
        let mut request = self.client.post(url).form(form);
        if let Some(accept) = accept {
            request = request.header(ACCEPT, accept);
        }
        Self::finish(url, request.send())
    }

    fn post_body(
        &self,
        url: &str,
        content_type: &str,
        body: String,
    ) -> Result<HttpResponse, SparqlError> {
        let request = self.client.post(url).header(CONTENT_TYPE, content_type).body(body);
        Self::finish(url, request.send())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range() {
        let ok = HttpResponse { status: 204, body: String::new() };
        let bad = HttpResponse { status: 400, body: String::new() };
        assert!(ok.is_success());
        assert!(!bad.is_success());
    }
}
