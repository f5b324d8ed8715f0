//! SQL text for the record repository.
//!
//! Identifiers are only ever taken from the entity catalog; every request
//! value is bound as a parameter.

use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::entity::EntityKind;
use crate::mutation::Assignment;
use crate::scope::ScopedQuery;

use super::FieldValue;

fn push_value(query: &mut QueryBuilder<'static, Postgres>, value: &FieldValue) {
    match value {
        FieldValue::Uuid(id) => {
            query.push_bind(*id);
        }
        FieldValue::Text(text) => {
            query.push_bind(text.clone());
        }
        FieldValue::Timestamp(at) => {
            query.push_bind(*at);
        }
    }
}

fn push_assigned(query: &mut QueryBuilder<'static, Postgres>, assignment: &Assignment) {
    match &assignment.value {
        Some(value) => push_value(query, value),
        None => {
            query.push("NULL");
        }
    }
}

/// Escapes `LIKE` wildcards so the term matches literally.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Rows of a list query, as JSON objects, narrowed to the scope's tenant.
pub fn select_rows(scoped: &ScopedQuery) -> QueryBuilder<'static, Postgres> {
    let query = scoped.query();
    let descriptor = query.entity.descriptor();

    let mut sql = QueryBuilder::new(format!(
        "SELECT to_jsonb(t) FROM {} t WHERE t.tenant_id = ",
        descriptor.table
    ));
    sql.push_bind(scoped.tenant_id());

    for (field, value) in &query.filter {
        sql.push(format!(" AND t.{field} = "));
        push_value(&mut sql, value);
    }

    if let Some(term) = &query.search {
        let pattern = like_pattern(term);
        sql.push(" AND (");
        for (i, field) in descriptor.searchable_fields().enumerate() {
            if i > 0 {
                sql.push(" OR ");
            }
            sql.push(format!("t.{} ILIKE ", field.name));
            sql.push_bind(pattern.clone());
        }
        sql.push(")");
    }

    sql.push(" ORDER BY ");
    for (i, order) in query.order.iter().enumerate() {
        if i > 0 {
            sql.push(", ");
        }
        sql.push(format!("t.{} {}", order.field, order.direction.as_sql()));
    }
    if !query.order.iter().any(|order| order.field == "id") {
        sql.push(", t.id ASC");
    }

    sql.push(" LIMIT ");
    sql.push_bind(i64::from(query.pagination.limit));
    sql.push(" OFFSET ");
    sql.push_bind(i64::try_from(query.pagination.offset).unwrap_or(i64::MAX));

    sql
}

/// One row as a JSON object. Binds: `$1` id, `$2` tenant.
pub fn select_record(entity: EntityKind) -> String {
    format!(
        "SELECT to_jsonb(t) FROM {} t WHERE t.id = $1 AND t.tenant_id = $2",
        entity.table()
    )
}

/// One typed row. Binds: `$1` id, `$2` tenant.
pub fn select_typed(entity: EntityKind) -> String {
    format!(
        "SELECT * FROM {} WHERE id = $1 AND tenant_id = $2",
        entity.table()
    )
}

/// Rows of `target` whose `column` is one of `keys`, in the tenant.
pub fn select_related(
    target: EntityKind,
    column: &str,
    tenant_id: Uuid,
    keys: Vec<Uuid>,
) -> QueryBuilder<'static, Postgres> {
    let mut sql = QueryBuilder::new(format!(
        "SELECT to_jsonb(r) FROM {} r WHERE r.tenant_id = ",
        target.table()
    ));
    sql.push_bind(tenant_id);
    sql.push(format!(" AND r.{column} = ANY("));
    sql.push_bind(keys);
    sql.push(") ORDER BY r.created_at ASC, r.id ASC");
    sql
}

/// `(key, count)` pairs of `target` rows grouped by `column`, in the tenant.
pub fn count_related(
    target: EntityKind,
    column: &str,
    tenant_id: Uuid,
    keys: Vec<Uuid>,
) -> QueryBuilder<'static, Postgres> {
    let mut sql = QueryBuilder::new(format!(
        "SELECT r.{column}, COUNT(*) FROM {} r WHERE r.tenant_id = ",
        target.table()
    ));
    sql.push_bind(tenant_id);
    sql.push(format!(" AND r.{column} = ANY("));
    sql.push_bind(keys);
    sql.push(format!(") GROUP BY r.{column}"));
    sql
}

/// Binds: `$1` id, `$2` tenant.
pub fn reference_exists(entity: EntityKind) -> String {
    format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1 AND tenant_id = $2)",
        entity.table()
    )
}

/// Locks the row and returns its tenant. Binds: `$1` id.
pub fn lock_row_tenant(entity: EntityKind) -> String {
    format!(
        "SELECT tenant_id FROM {} WHERE id = $1 FOR UPDATE",
        entity.table()
    )
}

/// Inserts one row owned by `tenant_id`, returning its id.
pub fn insert_row(
    entity: EntityKind,
    tenant_id: Uuid,
    assignments: &[Assignment],
) -> QueryBuilder<'static, Postgres> {
    let mut columns = String::from("tenant_id");
    for assignment in assignments {
        columns.push_str(", ");
        columns.push_str(assignment.column);
    }

    let mut sql = QueryBuilder::new(format!(
        "INSERT INTO {} ({columns}) VALUES (",
        entity.table()
    ));
    sql.push_bind(tenant_id);
    for assignment in assignments {
        sql.push(", ");
        push_assigned(&mut sql, assignment);
    }
    sql.push(") RETURNING id");
    sql
}

pub fn update_row(
    entity: EntityKind,
    tenant_id: Uuid,
    id: Uuid,
    assignments: &[Assignment],
) -> QueryBuilder<'static, Postgres> {
    let mut sql = QueryBuilder::new(format!(
        "UPDATE {} SET updated_at = now()",
        entity.table()
    ));
    for assignment in assignments {
        sql.push(format!(", {} = ", assignment.column));
        push_assigned(&mut sql, assignment);
    }
    sql.push(" WHERE id = ");
    sql.push_bind(id);
    sql.push(" AND tenant_id = ");
    sql.push_bind(tenant_id);
    sql.push(" RETURNING *");
    sql
}

/// Binds: `$1` id, `$2` tenant.
pub fn delete_row(entity: EntityKind) -> String {
    format!(
        "DELETE FROM {} WHERE id = $1 AND tenant_id = $2 RETURNING *",
        entity.table()
    )
}
