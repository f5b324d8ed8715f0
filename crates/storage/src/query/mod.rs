//! Structured list queries built from HTTP query strings.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::entity::{EntityKind, FieldKind, FieldSpec};

pub mod sql;
mod translate;

pub use translate::{translate, translate_inclusion};

/// A typed column value, either parsed from a filter or taken from a request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Uuid(Uuid),
    Text(String),
    Timestamp(NaiveDateTime),
}

impl FieldValue {
    /// Parses a raw query-string value according to the field's kind.
    pub fn parse(field: &FieldSpec, raw: &str) -> Result<Self, QueryError> {
        let invalid = || QueryError::InvalidFilterValue {
            field: field.name.to_string(),
            expected: field.kind,
        };

        match field.kind {
            FieldKind::Uuid => Uuid::parse_str(raw.trim())
                .map(Self::Uuid)
                .map_err(|_| invalid()),
            FieldKind::Text if raw.contains('\0') => Err(invalid()),
            FieldKind::Text => Ok(Self::Text(raw.to_string())),
            FieldKind::Timestamp => parse_timestamp(raw.trim())
                .map(Self::Timestamp)
                .ok_or_else(invalid),
        }
    }
}

// Accepts RFC 3339 (normalized to UTC) or a naive `YYYY-MM-DDTHH:MM:SS`.
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.naive_utc())
        .ok()
        .or_else(|| raw.parse::<NaiveDateTime>().ok())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(QueryError::InvalidOrderDirection {
                direction: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderBy {
    pub field: &'static str,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub limit: u32,
    pub offset: u64,
}

/// Related records to attach to every result row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Inclusion {
    relations: BTreeSet<&'static str>,
    count: bool,
}

impl Inclusion {
    pub fn relations(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.relations.iter().copied()
    }

    /// Whether `_count` of the one-to-many relations was requested.
    pub fn counts(&self) -> bool {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty() && !self.count
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructuredQuery {
    pub entity: EntityKind,
    pub filter: BTreeMap<&'static str, FieldValue>,
    pub search: Option<String>,
    pub pagination: Pagination,
    pub order: Vec<OrderBy>,
    pub include: Inclusion,
}

/// What to do with `filter[...]` keys that are not whitelisted for the entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownFieldPolicy {
    #[default]
    Reject,
    Ignore,
}

impl FromStr for UnknownFieldPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "ignore" => Ok(Self::Ignore),
            other => Err(format!(
                "unknown filter field policy '{other}', expected 'reject' or 'ignore'"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    pub default_page_size: u32,
    pub max_page_size: u32,
    pub unknown_fields: UnknownFieldPolicy,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
            unknown_fields: UnknownFieldPolicy::Reject,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("'{field}' is not a filterable field of {entity}")]
    UnknownFilterField { entity: EntityKind, field: String },

    #[error("'{field}' must be a valid {expected}")]
    InvalidFilterValue { field: String, expected: FieldKind },

    #[error("'{field}' is filtered more than once")]
    DuplicateFilter { field: String },

    #[error("{param} {reason}")]
    InvalidPagination { param: &'static str, reason: String },

    #[error("'{field}' is not a sortable field of {entity}")]
    UnknownOrderField { entity: EntityKind, field: String },

    #[error("'{direction}' is not a sort direction, expected 'asc' or 'desc'")]
    InvalidOrderDirection { direction: String },

    #[error("'{field}' is ordered more than once")]
    DuplicateOrder { field: String },

    #[error("'{relation}' is not an includable relation of {entity}")]
    UnknownRelation { entity: EntityKind, relation: String },

    #[error("search term must not contain NUL characters")]
    InvalidSearch,
}

impl QueryError {
    /// The query-string parameter the error is about.
    pub fn parameter(&self) -> String {
        match self {
            Self::UnknownFilterField { field, .. }
            | Self::InvalidFilterValue { field, .. }
            | Self::DuplicateFilter { field } => format!("filter[{field}]"),
            Self::InvalidPagination { param, .. } => param.to_string(),
            Self::UnknownOrderField { .. }
            | Self::InvalidOrderDirection { .. }
            | Self::DuplicateOrder { .. } => "order".to_string(),
            Self::UnknownRelation { .. } => "include".to_string(),
            Self::InvalidSearch => "search".to_string(),
        }
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.direction.as_sql())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_uuid_field() {
        let field = EntityKind::Coach.descriptor().field("academy_id").unwrap();
        let id = Uuid::new_v4();

        assert_eq!(
            FieldValue::parse(field, &id.to_string()),
            Ok(FieldValue::Uuid(id))
        );
        assert_eq!(
            FieldValue::parse(field, "42"),
            Err(QueryError::InvalidFilterValue {
                field: "academy_id".to_string(),
                expected: FieldKind::Uuid,
            })
        );
    }

    #[test]
    fn test_parse_text_field_keeps_value_verbatim() {
        let field = EntityKind::Coach.descriptor().field("name").unwrap();
        assert_eq!(
            FieldValue::parse(field, "  Ana María "),
            Ok(FieldValue::Text("  Ana María ".to_string()))
        );
    }

    #[test]
    fn test_parse_text_field_rejects_nul() {
        let field = EntityKind::Coach.descriptor().field("status").unwrap();
        assert_eq!(
            FieldValue::parse(field, "act\u{0}ive"),
            Err(QueryError::InvalidFilterValue {
                field: "status".to_string(),
                expected: FieldKind::Text,
            })
        );
    }

    #[test]
    fn test_parse_timestamp_field() {
        let field = EntityKind::Coach.descriptor().field("created_at").unwrap();

        let Ok(FieldValue::Timestamp(at)) = FieldValue::parse(field, "2025-03-01T10:00:00+02:00")
        else {
            panic!("expected timestamp");
        };
        assert_eq!(at.to_string(), "2025-03-01 08:00:00");

        assert!(FieldValue::parse(field, "2025-03-01T10:00:00").is_ok());
        assert!(FieldValue::parse(field, "yesterday").is_err());
    }

    #[test]
    fn test_sort_direction_is_case_insensitive() {
        assert_eq!("DESC".parse::<SortDirection>(), Ok(SortDirection::Desc));
        assert_eq!("asc".parse::<SortDirection>(), Ok(SortDirection::Asc));
        assert!("up".parse::<SortDirection>().is_err());
    }

    #[test]
    fn test_unknown_field_policy_from_str() {
        assert_eq!("Ignore".parse(), Ok(UnknownFieldPolicy::Ignore));
        assert_eq!("reject".parse(), Ok(UnknownFieldPolicy::Reject));
        assert!("drop".parse::<UnknownFieldPolicy>().is_err());
    }

    #[test]
    fn test_error_parameter_names() {
        let err = QueryError::UnknownFilterField {
            entity: EntityKind::Coach,
            field: "tenant_id".to_string(),
        };
        assert_eq!(err.parameter(), "filter[tenant_id]");
        assert_eq!(
            err.to_string(),
            "'tenant_id' is not a filterable field of coach"
        );
    }
}
