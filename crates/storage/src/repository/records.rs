//! Tenant-scoped data access shared by every entity.
//!
//! List and single-record reads come back as JSON objects so that requested
//! relations and `_count` can be attached without a type per combination.
//! Writes return the typed row.

use std::collections::HashMap;

use serde_json::{Map, Value};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::entity::{EntityKind, Link, RelationSpec};
use crate::error::{Result, StorageError};
use crate::models::Entity;
use crate::mutation::{Assignment, CreateData, UpdateData};
use crate::query::{FieldValue, Inclusion, sql};
use crate::scope::{AuthScope, Operation, ScopedQuery};

pub struct RecordRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RecordRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List rows matching a tenant-narrowed query
    pub async fn find_many(&self, scoped: &ScopedQuery) -> Result<Vec<Value>> {
        let query = scoped.query();
        tracing::debug!(entity = %query.entity, filter = ?query.filter, "listing records");

        let mut rows = sql::select_rows(scoped)
            .build_query_scalar::<Value>()
            .fetch_all(self.pool)
            .await?;

        self.attach_inclusion(query.entity, scoped.tenant_id(), &query.include, &mut rows)
            .await?;

        Ok(rows)
    }

    /// Find one row by id within the caller's tenant
    pub async fn find_by_id(
        &self,
        scope: &AuthScope,
        entity: EntityKind,
        id: Uuid,
        include: &Inclusion,
    ) -> Result<Value> {
        scope.authorize(entity, Operation::Read)?;

        let row = sqlx::query_scalar::<_, Value>(&sql::select_record(entity))
            .bind(id)
            .bind(scope.tenant_id())
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        let mut rows = vec![row];
        self.attach_inclusion(entity, scope.tenant_id(), include, &mut rows)
            .await?;

        rows.pop().ok_or(StorageError::NotFound)
    }

    /// Create a row and its nested children in one transaction
    pub async fn create<E, D>(&self, scope: &AuthScope, data: &D) -> Result<E>
    where
        E: Entity,
        D: CreateData,
    {
        let nested = data.nested();

        scope.authorize(E::KIND, Operation::Create)?;
        for batch in &nested {
            scope.authorize(batch.entity, Operation::Create)?;
        }

        let tenant_id = scope.tenant_id();
        let columns = data.columns();

        let mut tx = self.pool.begin().await?;

        check_references(&mut tx, E::KIND, tenant_id, &columns).await?;
        let id = insert(&mut tx, E::KIND, tenant_id, &columns).await?;

        for batch in nested {
            for mut row in batch.rows {
                check_references(&mut tx, batch.entity, tenant_id, &row).await?;
                row.push(Assignment::uuid(batch.parent_column, id));
                insert(&mut tx, batch.entity, tenant_id, &row).await?;
            }
        }

        let record = sqlx::query_as::<_, E>(&sql::select_typed(E::KIND))
            .bind(id)
            .bind(tenant_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(entity = %E::KIND, %id, tenant = %tenant_id, "record created");
        Ok(record)
    }

    /// Apply a partial update to a row of the caller's tenant
    pub async fn update<E, D>(&self, scope: &AuthScope, id: Uuid, data: &D) -> Result<E>
    where
        E: Entity,
        D: UpdateData,
    {
        scope.authorize(E::KIND, Operation::Update)?;

        let tenant_id = scope.tenant_id();
        let assignments = data.assignments();

        let mut tx = self.pool.begin().await?;

        lock_owned(&mut tx, scope, E::KIND, id).await?;
        check_references(&mut tx, E::KIND, tenant_id, &assignments).await?;

        let record = sql::update_row(E::KIND, tenant_id, id, &assignments)
            .build_query_as::<E>()
            .fetch_optional(&mut *tx)
            .await
            .map_err(constraint_error)?
            .ok_or(StorageError::NotFound)?;

        tx.commit().await?;

        tracing::info!(entity = %E::KIND, %id, tenant = %tenant_id, "record updated");
        Ok(record)
    }

    /// Delete a row of the caller's tenant, returning it
    pub async fn delete<E: Entity>(&self, scope: &AuthScope, id: Uuid) -> Result<E> {
        scope.authorize(E::KIND, Operation::Delete)?;

        let mut tx = self.pool.begin().await?;

        lock_owned(&mut tx, scope, E::KIND, id).await?;

        let record = sqlx::query_as::<_, E>(&sql::delete_row(E::KIND))
            .bind(id)
            .bind(scope.tenant_id())
            .fetch_optional(&mut *tx)
            .await
            .map_err(constraint_error)?
            .ok_or(StorageError::NotFound)?;

        tx.commit().await?;

        tracing::info!(entity = %E::KIND, %id, tenant = %scope.tenant_id(), "record deleted");
        Ok(record)
    }

    async fn attach_inclusion(
        &self,
        entity: EntityKind,
        tenant_id: Uuid,
        include: &Inclusion,
        rows: &mut [Value],
    ) -> Result<()> {
        if include.is_empty() || rows.is_empty() {
            return Ok(());
        }

        let descriptor = entity.descriptor();
        for name in include.relations() {
            let Some(relation) = descriptor.relation(name) else {
                continue;
            };
            self.attach_relation(relation, tenant_id, rows).await?;
        }

        if include.counts() {
            self.attach_counts(entity, tenant_id, rows).await?;
        }

        Ok(())
    }

    async fn attach_relation(
        &self,
        relation: &RelationSpec,
        tenant_id: Uuid,
        rows: &mut [Value],
    ) -> Result<()> {
        match relation.link {
            Link::BelongsTo { column } => {
                let keys = uuids(rows, column);
                let related = sql::select_related(relation.target, "id", tenant_id, keys)
                    .build_query_scalar::<Value>()
                    .fetch_all(self.pool)
                    .await?;

                let by_id: HashMap<Uuid, Value> = related
                    .into_iter()
                    .filter_map(|record| Some((uuid_at(&record, "id")?, record)))
                    .collect();

                for row in rows.iter_mut() {
                    let value = uuid_at(row, column)
                        .and_then(|key| by_id.get(&key).cloned())
                        .unwrap_or(Value::Null);
                    set(row, relation.name, value);
                }
            }
            Link::HasMany { column } => {
                let keys = uuids(rows, "id");
                let related = sql::select_related(relation.target, column, tenant_id, keys)
                    .build_query_scalar::<Value>()
                    .fetch_all(self.pool)
                    .await?;

                let mut by_parent: HashMap<Uuid, Vec<Value>> = HashMap::new();
                for record in related {
                    if let Some(parent) = uuid_at(&record, column) {
                        by_parent.entry(parent).or_default().push(record);
                    }
                }

                for row in rows.iter_mut() {
                    let children = uuid_at(row, "id")
                        .and_then(|id| by_parent.remove(&id))
                        .unwrap_or_default();
                    set(row, relation.name, Value::Array(children));
                }
            }
        }

        Ok(())
    }

    async fn attach_counts(
        &self,
        entity: EntityKind,
        tenant_id: Uuid,
        rows: &mut [Value],
    ) -> Result<()> {
        let keys = uuids(rows, "id");
        let mut counts: Vec<(&'static str, HashMap<Uuid, i64>)> = Vec::new();

        for relation in entity.descriptor().has_many_relations() {
            let Link::HasMany { column } = relation.link else {
                continue;
            };
            let grouped = sql::count_related(relation.target, column, tenant_id, keys.clone())
                .build_query_as::<(Uuid, i64)>()
                .fetch_all(self.pool)
                .await?;
            counts.push((relation.name, grouped.into_iter().collect()));
        }

        for row in rows.iter_mut() {
            let id = uuid_at(row, "id");
            let summary: Map<String, Value> = counts
                .iter()
                .map(|(name, by_parent)| {
                    let count = id.and_then(|id| by_parent.get(&id)).copied().unwrap_or(0);
                    (name.to_string(), Value::from(count))
                })
                .collect();
            set(row, "_count", Value::Object(summary));
        }

        Ok(())
    }
}

async fn insert(
    conn: &mut PgConnection,
    entity: EntityKind,
    tenant_id: Uuid,
    assignments: &[Assignment],
) -> Result<Uuid> {
    sql::insert_row(entity, tenant_id, assignments)
        .build_query_scalar::<Uuid>()
        .fetch_one(&mut *conn)
        .await
        .map_err(constraint_error)
}

/// Locks the row and checks it belongs to the caller's tenant.
async fn lock_owned(
    conn: &mut PgConnection,
    scope: &AuthScope,
    entity: EntityKind,
    id: Uuid,
) -> Result<()> {
    let row_tenant = sqlx::query_scalar::<_, Uuid>(&sql::lock_row_tenant(entity))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(StorageError::NotFound)?;

    scope.ensure_owned(entity, id, row_tenant)?;
    Ok(())
}

/// Every id assigned to a foreign key column must name a row of the same tenant.
async fn check_references(
    conn: &mut PgConnection,
    entity: EntityKind,
    tenant_id: Uuid,
    assignments: &[Assignment],
) -> Result<()> {
    let descriptor = entity.descriptor();

    for assignment in assignments {
        let Some(target) = descriptor
            .field(assignment.column)
            .and_then(|field| field.references)
        else {
            continue;
        };
        let Some(FieldValue::Uuid(id)) = assignment.value else {
            continue;
        };

        let exists = sqlx::query_scalar::<_, bool>(&sql::reference_exists(target))
            .bind(id)
            .bind(tenant_id)
            .fetch_one(&mut *conn)
            .await?;

        if !exists {
            tracing::debug!(%entity, column = assignment.column, %id, "dangling reference");
            return Err(StorageError::InvalidReference { entity: target, id });
        }
    }

    Ok(())
}

fn constraint_error(error: sqlx::Error) -> StorageError {
    StorageError::from(error).classify()
}

fn uuid_at(record: &Value, key: &str) -> Option<Uuid> {
    record.get(key)?.as_str()?.parse().ok()
}

/// Distinct ids found under `key` across `rows`.
fn uuids(rows: &[Value], key: &str) -> Vec<Uuid> {
    let mut keys: Vec<Uuid> = rows.iter().filter_map(|row| uuid_at(row, key)).collect();
    keys.sort_unstable();
    keys.dedup();
    keys
}

fn set(row: &mut Value, key: &str, value: Value) {
    if let Value::Object(fields) = row {
        fields.insert(key.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_uuids_are_distinct_and_skip_missing() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let rows = vec![
            json!({ "coach_id": a }),
            json!({ "coach_id": b }),
            json!({ "coach_id": a }),
            json!({ "coach_id": null }),
            json!({}),
        ];

        let mut expected = vec![a, b];
        expected.sort_unstable();
        assert_eq!(uuids(&rows, "coach_id"), expected);
    }

    #[test]
    fn test_uuid_at_ignores_malformed_values() {
        assert_eq!(uuid_at(&json!({ "id": "nope" }), "id"), None);
        assert_eq!(uuid_at(&json!({ "id": 7 }), "id"), None);

        let id = Uuid::new_v4();
        assert_eq!(uuid_at(&json!({ "id": id }), "id"), Some(id));
    }

    #[test]
    fn test_set_only_touches_objects() {
        let mut row = json!({ "id": "x" });
        set(&mut row, "coach", Value::Null);
        assert_eq!(row, json!({ "id": "x", "coach": null }));

        let mut scalar = json!(3);
        set(&mut scalar, "coach", Value::Null);
        assert_eq!(scalar, json!(3));
    }
}
