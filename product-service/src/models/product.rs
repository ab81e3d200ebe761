use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Keys a caller may never set: identity belongs to the store.
const IDENTITY_KEYS: [&str; 2] = ["_id", "id"];

/// Store-assigned product identifier, rendered as 24 hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ProductId(ObjectId);

impl ProductId {
    /// Parse a path segment. Anything that is not a valid ObjectId cannot
    /// name a stored product, so callers treat `None` as "no such product".
    pub fn parse(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl From<ObjectId> for ProductId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl FromStr for ProductId {
    type Err = mongodb::bson::oid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(s).map(Self)
    }
}

impl TryFrom<String> for ProductId {
    type Error = mongodb::bson::oid::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ProductId> for String {
    fn from(id: ProductId) -> Self {
        id.0.to_hex()
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

/// A stored product: typed identity and name, plus whatever other fields
/// the caller supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Product {
    pub fn new(id: ProductId, draft: ProductDraft) -> Self {
        Self {
            id,
            name: draft.name,
            fields: draft.fields,
        }
    }

    /// Merge a partial update. Fields absent from the patch keep their
    /// values; the identifier never changes.
    pub fn apply(&mut self, patch: ProductPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        self.fields.extend(patch.fields);
    }
}

/// Body of a create request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawDraft")]
pub struct ProductDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Deserialize)]
struct RawDraft {
    #[serde(default)]
    name: Option<String>,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl From<RawDraft> for ProductDraft {
    fn from(raw: RawDraft) -> Self {
        Self {
            name: raw.name,
            fields: without_identity(raw.fields),
        }
    }
}

/// Body of a partial update.
///
/// `name` distinguishes "not supplied" (`None`) from an explicit `null`
/// (`Some(None)`), which clears it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "RawPatch")]
pub struct ProductPatch {
    pub name: Option<Option<String>>,
    pub fields: Map<String, Value>,
}

#[derive(Deserialize)]
struct RawPatch {
    #[serde(default, deserialize_with = "explicit_null")]
    name: Option<Option<String>>,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl From<RawPatch> for ProductPatch {
    fn from(raw: RawPatch) -> Self {
        Self {
            name: raw.name,
            fields: without_identity(raw.fields),
        }
    }
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.fields.is_empty()
    }
}

fn explicit_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

fn without_identity(mut fields: Map<String, Value>) -> Map<String, Value> {
    for key in IDENTITY_KEYS {
        fields.remove(key);
    }
    fields
}
