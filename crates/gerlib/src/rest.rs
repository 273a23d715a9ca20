//! REST plumbing over an injected HTTP transport.
//!
//! Responsibilities end at handing the codec a clean JSON document: check
//! the response status, strip Gerrit's anti-XSRF magic prefix, parse. The
//! transport owns everything network: TLS, auth, timeouts.

use serde_json::Value;
use tracing::debug;

use crate::changes::{ChangeCodec, ChangeInfo};
use crate::error::GerError;
use crate::query::{AdditionalOpt, QueryParams};

/// Gerrit prepends this to every JSON response body.
const JSON_MAGIC_PREFIX: &str = ")]}'\n";

/// Blocking HTTP GET capability, injected by the caller.
pub trait HttpTransport {
    /// Performs a GET and returns the status code and response body.
    fn get(&self, path_and_query: &str) -> Result<(u16, String), GerError>;
}

/// High-level REST handler for the change endpoints.
pub struct RestHandler<T: HttpTransport> {
    transport: T,
    codec: ChangeCodec,
}

impl<T: HttpTransport> RestHandler<T> {
    pub fn new(transport: T) -> Result<Self, GerError> {
        Ok(Self {
            transport,
            codec: ChangeCodec::new()?,
        })
    }

    /// GETs a Gerrit JSON endpoint and returns the raw document with the
    /// magic prefix stripped.
    pub fn get_json(&self, path_and_query: &str, expect_code: u16) -> Result<String, GerError> {
        debug!(path = path_and_query, "GET");
        let (code, body) = self.transport.get(path_and_query)?;
        if code != expect_code {
            return Err(GerError::UnexpectedHttpResponse(code));
        }
        strip_json_magic_prefix(body)
    }

    /// Queries changes and decodes each element of the response array.
    pub fn query_changes(&self, params: &QueryParams) -> Result<Vec<ChangeInfo>, GerError> {
        let json = self.get_json(&params.to_path_and_query(), 200)?;
        let doc: Value = serde_json::from_str(&json)?;
        let items = doc.as_array().ok_or(GerError::UnexpectedResponseShape)?;
        debug!(count = items.len(), "decoding change list");
        items.iter().map(|item| self.codec.decode_change(item)).collect()
    }

    /// Fetches a single change with accounts and current revision expanded.
    pub fn get_change(&self, change_id: &str) -> Result<ChangeInfo, GerError> {
        let path = format!(
            "/a/changes/{}/?o={}&o={}",
            change_id,
            AdditionalOpt::DetailedAccounts.as_str(),
            AdditionalOpt::CurrentRevision.as_str(),
        );
        let json = self.get_json(&path, 200)?;
        let doc: Value = serde_json::from_str(&json)?;
        self.codec.decode_change(&doc)
    }
}

fn strip_json_magic_prefix(body: String) -> Result<String, GerError> {
    match body.strip_prefix(JSON_MAGIC_PREFIX) {
        Some(json) => Ok(json.to_owned()),
        None => Err(GerError::NotJsonResponse),
    }
}
