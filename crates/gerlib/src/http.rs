//! Blocking HTTP transport backed by reqwest.

use std::time::Duration;

use tracing::debug;

use crate::error::GerError;
use crate::rest::HttpTransport;

/// HTTP transport for a single Gerrit remote, using basic auth.
pub struct HttpRequestHandler {
    base_url: String,
    username: String,
    http_password: String,
    client: reqwest::blocking::Client,
}

impl HttpRequestHandler {
    pub fn new(base_url: &str, username: &str, http_password: &str) -> Result<Self, GerError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            username: username.to_owned(),
            http_password: http_password.to_owned(),
            client,
        })
    }
}

impl HttpTransport for HttpRequestHandler {
    fn get(&self, path_and_query: &str) -> Result<(u16, String), GerError> {
        let url = format!("{}{}", self.base_url, path_and_query);
        debug!(%url, "http get");
        let response = self
            .client
            .get(&url)
            .basic_auth(&self.username, Some(&self.http_password))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok((status, body))
    }
}
