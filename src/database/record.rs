use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::store::StoreError;

/// A stored JSON object. Documents read back from a store carry `_id`.
pub type Document = Map<String, Value>;

/// Key under which the store-assigned identifier is exposed
pub const ID_FIELD: &str = "_id";

/// The four independent collections of the blog backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Users,
    Blogs,
    Wishlist,
    Comments,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Users,
        Collection::Blogs,
        Collection::Wishlist,
        Collection::Comments,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Blogs => "blogs",
            Collection::Wishlist => "wishlist",
            Collection::Comments => "comments",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Store-assigned document identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for RecordId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl FromStr for RecordId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| StoreError::InvalidId(s.to_string()))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Exact-match selection over a single top-level field.
///
/// Matching is type sensitive: `"5"` never matches the number `5`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    field_eq: Option<(String, String)>,
}

impl Filter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field_eq: Some((field.into(), value.into())),
        }
    }

    /// `field == value` when a non-empty value was supplied, otherwise everything.
    pub fn eq_if_present(field: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.is_empty() => Self::eq(field, v),
            _ => Self::all(),
        }
    }

    pub fn field_eq(&self) -> Option<(&str, &str)> {
        self.field_eq.as_ref().map(|(f, v)| (f.as_str(), v.as_str()))
    }

    pub fn matches(&self, doc: &Document) -> bool {
        match &self.field_eq {
            None => true,
            Some((field, value)) => matches!(doc.get(field), Some(Value::String(s)) if s == value),
        }
    }
}

/// Attach the identifier to a stored body for output.
pub fn with_id(id: RecordId, mut body: Document) -> Document {
    body.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
    body
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOneResult {
    pub acknowledged: bool,
    pub inserted_id: RecordId,
}

impl InsertOneResult {
    pub fn new(inserted_id: RecordId) -> Self {
        Self {
            acknowledged: true,
            inserted_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<RecordId>,
}

impl UpdateResult {
    pub fn upserted(id: RecordId) -> Self {
        Self {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_count: 1,
            upserted_id: Some(id),
        }
    }

    pub fn matched(modified: bool) -> Self {
        Self {
            acknowledged: true,
            matched_count: 1,
            modified_count: u64::from(modified),
            upserted_count: 0,
            upserted_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteResult {
    pub fn new(deleted_count: u64) -> Self {
        Self {
            acknowledged: true,
            deleted_count,
        }
    }
}
