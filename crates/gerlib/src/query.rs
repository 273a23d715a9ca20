//! Change query parameters.

use std::fmt::Write as _;

/// Additional output options for change queries, the `o=` parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdditionalOpt {
    DetailedAccounts,
    DetailedLabels,
    CurrentRevision,
    AllRevisions,
    CurrentFiles,
    Messages,
}

impl AdditionalOpt {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DetailedAccounts => "DETAILED_ACCOUNTS",
            Self::DetailedLabels => "DETAILED_LABELS",
            Self::CurrentRevision => "CURRENT_REVISION",
            Self::AllRevisions => "ALL_REVISIONS",
            Self::CurrentFiles => "CURRENT_FILES",
            Self::Messages => "MESSAGES",
        }
    }
}

/// Parameters for `GET /a/changes/`.
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    /// Search queries, e.g. `status:open` or `owner:self`. Joined with `+`.
    pub queries: Vec<String>,
    pub additional_opts: Vec<AdditionalOpt>,
    pub limit: Option<u32>,
    pub start: Option<u32>,
}

impl QueryParams {
    /// Renders the path and query string for the changes endpoint.
    pub fn to_path_and_query(&self) -> String {
        let mut out = String::from("/a/changes/?");
        let mut sep = "";
        if !self.queries.is_empty() {
            let joined: Vec<String> = self
                .queries
                .iter()
                .map(|q| q.replace(' ', "+"))
                .collect();
            let _ = write!(out, "q={}", joined.join("+"));
            sep = "&";
        }
        for opt in &self.additional_opts {
            let _ = write!(out, "{sep}o={}", opt.as_str());
            sep = "&";
        }
        if let Some(limit) = self.limit {
            let _ = write!(out, "{sep}n={limit}");
            sep = "&";
        }
        if let Some(start) = self.start {
            let _ = write!(out, "{sep}S={start}");
        }
        out
    }
}
