use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use fitfusion_domain::id::RoutineId;
use fitfusion_domain::owner::OwnerRole;
use fitfusion_domain::sharing::SharingState;

/// Collections of the document store touched by the cascade engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    /// Owner records, `users/{ownerId}`.
    Users,
    /// Client profile records, `clients/{ownerId}`.
    Clients,
    /// Dependent records, `routines/{id}`.
    Routines,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Clients => "clients",
            Self::Routines => "routines",
        }
    }
}

/// Field names as stored in documents.
pub mod fields {
    pub const ROLE: &str = "role";
    pub const TRAINER_ID: &str = "trainerId";
    pub const CLIENT_ID: &str = "clientId";
    pub const IS_PUBLIC: &str = "isPublic";
    pub const PUBLIC_TOKEN: &str = "publicToken";
    pub const PUBLIC_EXPIRES_AT: &str = "publicExpiresAt";
    pub const CREATED_AT: &str = "createdAt";
    pub const UPDATED_AT: &str = "updatedAt";
}

/// A single document field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Timestamp(DateTime<Utc>),
    Array(Vec<FieldValue>),
    Map(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Native timestamps, or RFC 3339 strings as written by stores that
    /// persist timestamps as text.
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Timestamp(t) => Some(*t),
            Self::String(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|t| t.with_timezone(&Utc)),
            _ => None,
        }
    }

    /// Ordering used by query filters. `None` when the two values are not
    /// comparable (different kinds, arrays, maps).
    pub fn compare(&self, other: &FieldValue) -> Option<Ordering> {
        match (self, other) {
            (Self::Null, Self::Null) => Some(Ordering::Equal),
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::Int(a), Self::Float(b)) => (*a as f64).partial_cmp(b),
            (Self::Float(a), Self::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            (Self::Timestamp(_), Self::String(_)) | (Self::String(_), Self::Timestamp(_)) => {
                Some(self.as_timestamp()?.cmp(&other.as_timestamp()?))
            }
            (Self::Timestamp(a), Self::Timestamp(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(v: DateTime<Utc>) -> Self {
        Self::Timestamp(v)
    }
}

/// Document body keyed by field name.
pub type Fields = BTreeMap<String, FieldValue>;

/// Build a [`Fields`] map from `(name, value)` pairs.
pub fn fields_of<I, K, V>(pairs: I) -> Fields
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<FieldValue>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// A document read from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_str)
    }

    pub fn get_bool(&self, field: &str) -> Option<bool> {
        self.get(field).and_then(FieldValue::as_bool)
    }

    pub fn get_timestamp(&self, field: &str) -> Option<DateTime<Utc>> {
        self.get(field).and_then(FieldValue::as_timestamp)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Lt,
    Gt,
}

/// One `field <op> value` predicate of a collection scan.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: &'static str,
    pub op: FilterOp,
    pub value: FieldValue,
}

impl Filter {
    pub fn eq(field: &'static str, value: impl Into<FieldValue>) -> Self {
        Self {
            field,
            op: FilterOp::Eq,
            value: value.into(),
        }
    }

    pub fn lt(field: &'static str, value: impl Into<FieldValue>) -> Self {
        Self {
            field,
            op: FilterOp::Lt,
            value: value.into(),
        }
    }

    pub fn gt(field: &'static str, value: impl Into<FieldValue>) -> Self {
        Self {
            field,
            op: FilterOp::Gt,
            value: value.into(),
        }
    }

    /// Documents without the field never match.
    pub fn matches(&self, fields: &Fields) -> bool {
        let Some(actual) = fields.get(self.field) else {
            return false;
        };
        let expected = match self.op {
            FilterOp::Eq => Ordering::Equal,
            FilterOp::Lt => Ordering::Less,
            FilterOp::Gt => Ordering::Greater,
        };
        actual.compare(&self.value) == Some(expected)
    }
}

/// Projection of a `users/{id}` document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerRecord {
    /// `None` when the field is missing or holds an unknown role.
    pub role: Option<OwnerRole>,
}

impl OwnerRecord {
    pub fn from_fields(fields: &Fields) -> Self {
        Self {
            role: fields
                .get(fields::ROLE)
                .and_then(FieldValue::as_str)
                .and_then(|r| r.parse().ok()),
        }
    }
}

/// Projection of a `clients/{id}` document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRecord {
    pub trainer_id: Option<String>,
}

impl ProfileRecord {
    pub fn from_document(doc: &Document) -> Self {
        Self {
            trainer_id: doc.get_str(fields::TRAINER_ID).map(str::to_owned),
        }
    }
}

/// Projection of a `routines/{id}` document.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutineRecord {
    pub id: RoutineId,
    pub is_public: bool,
    pub sharing: SharingState,
    pub created_at: Option<DateTime<Utc>>,
}

impl RoutineRecord {
    pub fn from_document(doc: &Document) -> Self {
        let is_public = doc.get_bool(fields::IS_PUBLIC).unwrap_or(false);
        Self {
            id: RoutineId(doc.id.clone()),
            is_public,
            sharing: SharingState::from_fields(
                is_public,
                doc.get_str(fields::PUBLIC_TOKEN).map(str::to_owned),
                doc.get_timestamp(fields::PUBLIC_EXPIRES_AT),
            ),
            created_at: doc.get_timestamp(fields::CREATED_AT),
        }
    }
}
