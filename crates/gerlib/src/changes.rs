//! Change endpoint entities.
//!
//! Schemas mirror the entities of Gerrit's `/changes/` REST documentation.
//! Three fields are keyed lists: `reviewers` (reviewer state to accounts),
//! `revisions` (commit SHA-1 to revision details), and each revision's
//! `fetch` (scheme name to fetch coordinates). The schemas are built once,
//! wrapped in `Arc`, and shared with the codec; decoded dynamic values are
//! then lifted into the plain record types below for the CLI to consume.

use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, Utc};
use ger_json::{
    CodecError, DynValue, EnumSchema, FieldSchema, JsonCodec, KeyedListHandler, ListMapSchema,
    StructSchema, StructValue, Type,
};

use crate::error::GerError;

/// Gerrit timestamps are UTC, `yyyy-mm-dd hh:mm:ss.fffffffff`.
const GERRIT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, GerError> {
    NaiveDateTime::parse_from_str(text, GERRIT_TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| GerError::BadTimestamp(text.to_owned()))
}

/// The status of a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeStatus {
    New,
    Merged,
    Abandoned,
}

impl ChangeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Merged => "MERGED",
            Self::Abandoned => "ABANDONED",
        }
    }

    fn from_ordinal(ordinal: u16) -> Option<Self> {
        match ordinal {
            0 => Some(Self::New),
            1 => Some(Self::Merged),
            2 => Some(Self::Abandoned),
            _ => None,
        }
    }
}

/// The reviewer state an account is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewerState {
    Reviewer,
    Cc,
    Removed,
}

impl ReviewerState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reviewer => "REVIEWER",
            Self::Cc => "CC",
            Self::Removed => "REMOVED",
        }
    }

    fn from_ordinal(ordinal: u16) -> Option<Self> {
        match ordinal {
            0 => Some(Self::Reviewer),
            1 => Some(Self::Cc),
            2 => Some(Self::Removed),
            _ => None,
        }
    }
}

/// Schemas for the change endpoints, built once at startup.
pub struct ChangeSchemas {
    pub change_status: Arc<EnumSchema>,
    pub reviewer_state: Arc<EnumSchema>,
    pub account_info: Arc<StructSchema>,
    pub fetch_info: Arc<StructSchema>,
    pub revision_info: Arc<StructSchema>,
    pub change_info: Arc<StructSchema>,
    pub reviewers: Arc<ListMapSchema>,
    pub revisions: Arc<ListMapSchema>,
    pub fetch: Arc<ListMapSchema>,
}

impl ChangeSchemas {
    pub fn new() -> Result<Self, CodecError> {
        let change_status = EnumSchema::new("ChangeStatus", &["NEW", "MERGED", "ABANDONED"]);
        let reviewer_state = EnumSchema::new("ReviewerState", &["REVIEWER", "CC", "REMOVED"]);

        let account_info = StructSchema::new(
            "AccountInfo",
            vec![
                FieldSchema::new("_account_id", Type::Int),
                FieldSchema::new("name", Type::Text),
                FieldSchema::new("email", Type::Text),
                FieldSchema::new("username", Type::Text),
            ],
        );

        let fetch_info = StructSchema::new(
            "FetchInfo",
            vec![
                FieldSchema::new("url", Type::Text),
                FieldSchema::new("ref", Type::Text),
            ],
        );
        let fetch = ListMapSchema::new(
            "FetchMap",
            Type::Text,
            Type::Struct(Arc::clone(&fetch_info)),
        )?;

        let revision_info = StructSchema::new(
            "RevisionInfo",
            vec![
                FieldSchema::new("_number", Type::Int),
                FieldSchema::new("ref", Type::Text),
                FieldSchema::new("created", Type::Text),
                FieldSchema::new("uploader", Type::Struct(Arc::clone(&account_info))),
                FieldSchema::new("fetch", Type::ListMap(Arc::clone(&fetch))),
            ],
        );
        let revisions = ListMapSchema::new(
            "RevisionMap",
            Type::Text,
            Type::Struct(Arc::clone(&revision_info)),
        )?;

        let reviewers = ListMapSchema::new(
            "ReviewerMap",
            Type::Enum(Arc::clone(&reviewer_state)),
            Type::List(Box::new(Type::Struct(Arc::clone(&account_info)))),
        )?;

        let change_info = StructSchema::new(
            "ChangeInfo",
            vec![
                FieldSchema::new("id", Type::Text),
                FieldSchema::new("project", Type::Text),
                FieldSchema::new("branch", Type::Text),
                FieldSchema::new("topic", Type::Text),
                FieldSchema::new("change_id", Type::Text),
                FieldSchema::new("subject", Type::Text),
                FieldSchema::new("status", Type::Enum(Arc::clone(&change_status))),
                FieldSchema::new("created", Type::Text),
                FieldSchema::new("updated", Type::Text),
                FieldSchema::new("_number", Type::Int),
                FieldSchema::new("owner", Type::Struct(Arc::clone(&account_info))),
                FieldSchema::new("current_revision", Type::Text),
                FieldSchema::new("reviewers", Type::ListMap(Arc::clone(&reviewers))),
                FieldSchema::new("revisions", Type::ListMap(Arc::clone(&revisions))),
            ],
        );

        Ok(Self {
            change_status,
            reviewer_state,
            account_info,
            fetch_info,
            revision_info,
            change_info,
            reviewers,
            revisions,
            fetch,
        })
    }
}

/// A codec wired with the keyed-list handlers for the change endpoints.
pub struct ChangeCodec {
    schemas: ChangeSchemas,
    codec: JsonCodec,
}

impl ChangeCodec {
    pub fn new() -> Result<Self, CodecError> {
        let schemas = ChangeSchemas::new()?;
        let mut codec = JsonCodec::new();
        KeyedListHandler::register(&mut codec, &schemas.reviewers);
        KeyedListHandler::register(&mut codec, &schemas.revisions);
        KeyedListHandler::register(&mut codec, &schemas.fetch);
        Ok(Self { schemas, codec })
    }

    pub fn schemas(&self) -> &ChangeSchemas {
        &self.schemas
    }

    pub fn codec(&self) -> &JsonCodec {
        &self.codec
    }

    /// Decodes one ChangeInfo JSON entity into a typed record.
    pub fn decode_change(&self, input: &serde_json::Value) -> Result<ChangeInfo, GerError> {
        let ty = Type::Struct(Arc::clone(&self.schemas.change_info));
        let value = self.codec.decode(input, &ty)?;
        ChangeInfo::from_dyn(&value)
    }
}

/// The AccountInfo entity contains information about an account.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountInfo {
    pub account_id: Option<i64>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
}

impl AccountInfo {
    fn from_struct(value: &StructValue) -> Self {
        Self {
            account_id: value.get("_account_id").and_then(DynValue::as_int),
            name: text_field(value, "name"),
            email: text_field(value, "email"),
            username: text_field(value, "username"),
        }
    }
}

/// Fetch coordinates of a revision under one scheme.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchInfo {
    pub url: Option<String>,
    pub git_ref: Option<String>,
}

/// The RevisionInfo entity contains information about a patch set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RevisionInfo {
    pub number: Option<i64>,
    pub git_ref: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub uploader: Option<AccountInfo>,
    /// Fetch coordinates in scheme order, as served.
    pub fetch: Vec<(String, FetchInfo)>,
}

impl RevisionInfo {
    fn from_dyn(value: &DynValue) -> Result<Self, GerError> {
        let s = value.as_struct().ok_or(GerError::MissingField {
            entity: "RevisionInfo",
            field: "<self>",
        })?;
        let mut fetch = Vec::new();
        if let Some(map) = s.get("fetch").and_then(DynValue::as_list_map) {
            for entry in map.iter() {
                let scheme = entry.key.as_text().unwrap_or_default().to_owned();
                let info = entry.value.as_struct().map(|f| FetchInfo {
                    url: text_field(f, "url"),
                    git_ref: text_field(f, "ref"),
                });
                fetch.push((scheme, info.unwrap_or_default()));
            }
        }
        Ok(Self {
            number: s.get("_number").and_then(DynValue::as_int),
            git_ref: text_field(s, "ref"),
            created: match text_field(s, "created") {
                Some(text) => Some(parse_timestamp(&text)?),
                None => None,
            },
            uploader: s
                .get("uploader")
                .and_then(DynValue::as_struct)
                .map(AccountInfo::from_struct),
            fetch,
        })
    }
}

/// The ChangeInfo entity contains information about a change.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeInfo {
    /// `<project>~<branch>~<Change-Id>`, URL encoded.
    pub id: String,
    pub project: String,
    /// Target branch, without the refs/heads/ prefix.
    pub branch: String,
    pub topic: Option<String>,
    pub change_id: Option<String>,
    /// Header line of the commit message.
    pub subject: String,
    pub status: ChangeStatus,
    pub updated: Option<DateTime<Utc>>,
    /// Legacy numeric change ID.
    pub number: i64,
    pub owner: Option<AccountInfo>,
    pub current_revision: Option<String>,
    /// Accounts per reviewer state, in served order.
    pub reviewers: Vec<(ReviewerState, Vec<AccountInfo>)>,
    /// Revisions keyed by commit SHA-1, in served order.
    pub revisions: Vec<(String, RevisionInfo)>,
}

impl ChangeInfo {
    pub fn from_dyn(value: &DynValue) -> Result<Self, GerError> {
        let s = value.as_struct().ok_or(GerError::MissingField {
            entity: "ChangeInfo",
            field: "<self>",
        })?;

        let status = s
            .get("status")
            .and_then(|v| match v {
                DynValue::Enum(e) => ChangeStatus::from_ordinal(e.ordinal),
                _ => None,
            })
            .ok_or(GerError::MissingField {
                entity: "ChangeInfo",
                field: "status",
            })?;

        let mut reviewers = Vec::new();
        if let Some(map) = s.get("reviewers").and_then(DynValue::as_list_map) {
            for entry in map.iter() {
                let state = match &entry.key {
                    DynValue::Enum(e) => ReviewerState::from_ordinal(e.ordinal),
                    _ => None,
                };
                let Some(state) = state else { continue };
                let accounts = entry
                    .value
                    .as_list()
                    .map(|items| {
                        items
                            .iter()
                            .filter_map(DynValue::as_struct)
                            .map(AccountInfo::from_struct)
                            .collect()
                    })
                    .unwrap_or_default();
                reviewers.push((state, accounts));
            }
        }

        let mut revisions = Vec::new();
        if let Some(map) = s.get("revisions").and_then(DynValue::as_list_map) {
            for entry in map.iter() {
                let sha = entry.key.as_text().unwrap_or_default().to_owned();
                revisions.push((sha, RevisionInfo::from_dyn(&entry.value)?));
            }
        }

        Ok(Self {
            id: required_text(s, "id")?,
            project: required_text(s, "project")?,
            branch: required_text(s, "branch")?,
            topic: text_field(s, "topic"),
            change_id: text_field(s, "change_id"),
            subject: required_text(s, "subject")?,
            status,
            updated: match text_field(s, "updated") {
                Some(text) => Some(parse_timestamp(&text)?),
                None => None,
            },
            number: s.get("_number").and_then(DynValue::as_int).unwrap_or(0),
            owner: s
                .get("owner")
                .and_then(DynValue::as_struct)
                .map(AccountInfo::from_struct),
            current_revision: text_field(s, "current_revision"),
            reviewers,
            revisions,
        })
    }
}

fn text_field(value: &StructValue, name: &str) -> Option<String> {
    value.get(name).and_then(DynValue::as_text).map(ToOwned::to_owned)
}

fn required_text(value: &StructValue, name: &'static str) -> Result<String, GerError> {
    text_field(value, name).ok_or(GerError::MissingField {
        entity: "ChangeInfo",
        field: name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn change_fixture() -> serde_json::Value {
        json!({
            "id": "demo~master~Idaf5e098d70898b7119f6f4af5a6c13343d64b57",
            "project": "demo",
            "branch": "master",
            "change_id": "Idaf5e098d70898b7119f6f4af5a6c13343d64b57",
            "subject": "Implement feature X",
            "status": "NEW",
            "created": "2019-05-24 18:01:58.000000000",
            "updated": "2019-05-25 20:02:32.000000000",
            "_number": 3965,
            "owner": {"_account_id": 1000096, "name": "J. Doe", "username": "jdoe"},
            "current_revision": "27cc4558b5a3d3387dd11ee2df7a117e7e581822",
            "reviewers": {
                "REVIEWER": [{"_account_id": 1000097, "name": "R. Roe"}],
                "CC": [{"_account_id": 1000098, "name": "C. Coe"}]
            },
            "revisions": {
                "27cc4558b5a3d3387dd11ee2df7a117e7e581822": {
                    "_number": 2,
                    "ref": "refs/changes/65/3965/2",
                    "created": "2019-05-25 20:02:32.000000000",
                    "uploader": {"_account_id": 1000096},
                    "fetch": {
                        "http": {
                            "url": "https://gerrit.example.com/demo",
                            "ref": "refs/changes/65/3965/2"
                        }
                    }
                }
            }
        })
    }

    #[test]
    fn decode_change_fixture_lifts_typed_record() {
        let codec = ChangeCodec::new().unwrap();
        let change = codec.decode_change(&change_fixture()).unwrap();

        assert_eq!(change.project, "demo");
        assert_eq!(change.status, ChangeStatus::New);
        assert_eq!(change.number, 3965);
        assert_eq!(change.owner.as_ref().unwrap().name.as_deref(), Some("J. Doe"));
        assert_eq!(
            change.current_revision.as_deref(),
            Some("27cc4558b5a3d3387dd11ee2df7a117e7e581822")
        );
        assert_eq!(
            change.updated.unwrap(),
            parse_timestamp("2019-05-25 20:02:32.000000000").unwrap()
        );
    }

    #[test]
    fn decode_change_reviewers_keeps_state_order() {
        let codec = ChangeCodec::new().unwrap();
        let change = codec.decode_change(&change_fixture()).unwrap();

        assert_eq!(change.reviewers.len(), 2);
        assert_eq!(change.reviewers[0].0, ReviewerState::Reviewer);
        assert_eq!(change.reviewers[1].0, ReviewerState::Cc);
        assert_eq!(
            change.reviewers[1].1[0].name.as_deref(),
            Some("C. Coe")
        );
    }

    #[test]
    fn decode_change_revisions_keyed_by_sha() {
        let codec = ChangeCodec::new().unwrap();
        let change = codec.decode_change(&change_fixture()).unwrap();

        assert_eq!(change.revisions.len(), 1);
        let (sha, revision) = &change.revisions[0];
        assert_eq!(sha, "27cc4558b5a3d3387dd11ee2df7a117e7e581822");
        assert_eq!(revision.number, Some(2));
        assert_eq!(revision.fetch[0].0, "http");
        assert_eq!(
            revision.fetch[0].1.git_ref.as_deref(),
            Some("refs/changes/65/3965/2")
        );
    }

    #[test]
    fn decode_change_without_optional_maps() {
        let codec = ChangeCodec::new().unwrap();
        let change = codec
            .decode_change(&json!({
                "id": "demo~master~I00",
                "project": "demo",
                "branch": "master",
                "subject": "Minimal",
                "status": "MERGED",
                "_number": 7
            }))
            .unwrap();
        assert_eq!(change.status, ChangeStatus::Merged);
        assert!(change.reviewers.is_empty());
        assert!(change.revisions.is_empty());
        assert!(change.updated.is_none());
    }

    #[test]
    fn decode_change_with_unknown_reviewer_state_fails() {
        let codec = ChangeCodec::new().unwrap();
        let err = codec
            .decode_change(&json!({
                "id": "demo~master~I00",
                "project": "demo",
                "branch": "master",
                "subject": "Minimal",
                "status": "NEW",
                "reviewers": {"BOGUS": []}
            }))
            .unwrap_err();
        assert!(matches!(err, GerError::Codec(_)));
    }

    #[test]
    fn decode_change_with_bad_status_fails() {
        let codec = ChangeCodec::new().unwrap();
        let err = codec
            .decode_change(&json!({
                "id": "x", "project": "p", "branch": "b",
                "subject": "s", "status": "DRAFT"
            }))
            .unwrap_err();
        assert!(matches!(err, GerError::Codec(_)));
    }

    #[test]
    fn parse_gerrit_timestamp() {
        let ts = parse_timestamp("2019-05-24 18:01:58.000005000").unwrap();
        assert_eq!(ts.timestamp_subsec_micros(), 5);
        assert!(parse_timestamp("yesterday").is_err());
    }
}
