//! Gerrit REST API client library.
//!
//! Talks to a Gerrit server over its REST API, strips the anti-XSRF magic
//! prefix from responses, and decodes the JSON documents into typed change
//! records through the `ger-json` schema codec. Fields like `reviewers` and
//! `revisions`, which Gerrit serves as JSON objects keyed by data, decode
//! through the keyed-list handler into ordered entry lists.

pub mod changes;
pub mod error;
pub mod http;
pub mod query;
pub mod rest;

pub use changes::{
    AccountInfo, ChangeCodec, ChangeInfo, ChangeSchemas, ChangeStatus, FetchInfo, ReviewerState,
    RevisionInfo,
};
pub use error::GerError;
pub use http::HttpRequestHandler;
pub use query::{AdditionalOpt, QueryParams};
pub use rest::{HttpTransport, RestHandler};
