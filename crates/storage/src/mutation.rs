//! Write plans handed to the record repository.
//!
//! Request DTOs turn themselves into a [`CreateData`] or [`UpdateData`]. A
//! create payload's child arrays go through [`to_nested_create`], so an empty
//! array never produces a relation key.

use serde::Serialize;
use uuid::Uuid;

use crate::entity::EntityKind;
use crate::query::FieldValue;

/// A single `column = value` pair. A `None` value writes SQL `NULL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub column: &'static str,
    pub value: Option<FieldValue>,
}

impl Assignment {
    pub fn text(column: &'static str, value: impl Into<String>) -> Self {
        Self {
            column,
            value: Some(FieldValue::Text(value.into())),
        }
    }

    pub fn uuid(column: &'static str, value: Uuid) -> Self {
        Self {
            column,
            value: Some(FieldValue::Uuid(value)),
        }
    }

    pub fn null(column: &'static str) -> Self {
        Self { column, value: None }
    }
}

/// Column assignments of one row.
pub trait Columns {
    fn columns(&self) -> Vec<Assignment>;
}

/// Child rows to create together with their parent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NestedCreate<T> {
    pub create: Vec<T>,
}

/// Wraps `records` in a nested-create instruction, or `None` when there is
/// nothing to create.
pub fn to_nested_create<T>(records: Vec<T>) -> Option<NestedCreate<T>> {
    if records.is_empty() {
        None
    } else {
        Some(NestedCreate { create: records })
    }
}

impl<T: Columns> NestedCreate<T> {
    /// Rows of `entity` whose `parent_column` is filled with the parent's id on insert.
    pub fn batch(&self, entity: EntityKind, parent_column: &'static str) -> NestedBatch {
        NestedBatch {
            entity,
            parent_column,
            rows: self.create.iter().map(Columns::columns).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedBatch {
    pub entity: EntityKind,
    pub parent_column: &'static str,
    pub rows: Vec<Vec<Assignment>>,
}

/// A create payload for one parent row and its nested children.
pub trait CreateData: Columns + Serialize {
    fn nested(&self) -> Vec<NestedBatch> {
        Vec::new()
    }
}

/// A partial update; only provided fields are assigned.
pub trait UpdateData {
    fn assignments(&self) -> Vec<Assignment>;
}

/// Appends an assignment for an optional text field when it is set.
pub(crate) fn push_text(
    assignments: &mut Vec<Assignment>,
    column: &'static str,
    value: &Option<String>,
) {
    if let Some(value) = value {
        assignments.push(Assignment::text(column, value.as_str()));
    }
}

/// Like [`push_text`], but an explicit `null` clears the column.
pub(crate) fn push_nullable_text(
    assignments: &mut Vec<Assignment>,
    column: &'static str,
    value: &Option<Option<String>>,
) {
    match value {
        Some(Some(value)) => assignments.push(Assignment::text(column, value.as_str())),
        Some(None) => assignments.push(Assignment::null(column)),
        None => {}
    }
}

/// Appends an assignment for an optional id field when it is set.
pub(crate) fn push_uuid(assignments: &mut Vec<Assignment>, column: &'static str, value: Option<Uuid>) {
    if let Some(value) = value {
        assignments.push(Assignment::uuid(column, value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize)]
    struct Row {
        name: String,
    }

    impl Columns for Row {
        fn columns(&self) -> Vec<Assignment> {
            vec![Assignment::text("name", &self.name)]
        }
    }

    #[test]
    fn test_empty_records_yield_no_instruction() {
        assert_eq!(to_nested_create(Vec::<Row>::new()), None);
    }

    #[test]
    fn test_records_are_wrapped_in_create() {
        let nested = to_nested_create(vec![Row {
            name: "Leo".to_string(),
        }])
        .unwrap();

        assert_eq!(
            serde_json::to_value(&nested).unwrap(),
            serde_json::json!({ "create": [{ "name": "Leo" }] })
        );
    }

    #[test]
    fn test_batch_carries_parent_column() {
        let nested = to_nested_create(vec![
            Row {
                name: "Leo".to_string(),
            },
            Row {
                name: "Ana".to_string(),
            },
        ])
        .unwrap();

        let batch = nested.batch(EntityKind::Player, "coach_id");
        assert_eq!(batch.entity, EntityKind::Player);
        assert_eq!(batch.parent_column, "coach_id");
        assert_eq!(
            batch.rows,
            vec![
                vec![Assignment::text("name", "Leo")],
                vec![Assignment::text("name", "Ana")],
            ]
        );
    }

    #[test]
    fn test_optional_assignments() {
        let mut assignments = Vec::new();
        push_text(&mut assignments, "description", &None);
        push_text(&mut assignments, "image", &Some("logo.png".to_string()));
        push_uuid(&mut assignments, "coach_id", None);

        assert_eq!(assignments, vec![Assignment::text("image", "logo.png")]);
    }

    #[test]
    fn test_nullable_assignments() {
        let mut assignments = Vec::new();
        push_nullable_text(&mut assignments, "description", &None);
        push_nullable_text(&mut assignments, "image", &Some(None));
        push_nullable_text(&mut assignments, "first_name", &Some(Some("Ana".to_string())));

        assert_eq!(
            assignments,
            vec![
                Assignment::null("image"),
                Assignment::text("first_name", "Ana"),
            ]
        );
    }
}
