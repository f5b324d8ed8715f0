use serde_json::Value;
use sqlx::PgPool;
use storage::{
    dto::coach::{CreateCoachRequest, UpdateCoachRequest},
    entity::EntityKind,
    error::Result,
    models::Coach,
    query::{self, QueryOptions},
    repository::records::RecordRepository,
    scope::AuthScope,
};
use uuid::Uuid;

/// List coaches of the caller's tenant
pub async fn list_coaches(
    pool: &PgPool,
    scope: &AuthScope,
    params: &[(String, String)],
    options: &QueryOptions,
) -> Result<Vec<Value>> {
    let query = query::translate(params, EntityKind::Coach, options)?;
    let repo = RecordRepository::new(pool);
    repo.find_many(&scope.narrow(query)).await
}

/// Get a coach by id
pub async fn get_coach(
    pool: &PgPool,
    scope: &AuthScope,
    id: Uuid,
    params: &[(String, String)],
) -> Result<Value> {
    let include = query::translate_inclusion(params, EntityKind::Coach)?;
    let repo = RecordRepository::new(pool);
    repo.find_by_id(scope, EntityKind::Coach, id, &include).await
}

/// Create a coach together with nested players and player profiles
pub async fn create_coach(
    pool: &PgPool,
    scope: &AuthScope,
    request: CreateCoachRequest,
) -> Result<Coach> {
    let data = request.into_create_data();
    let repo = RecordRepository::new(pool);
    repo.create::<Coach, _>(scope, &data).await
}

/// Update a coach
pub async fn update_coach(
    pool: &PgPool,
    scope: &AuthScope,
    id: Uuid,
    request: &UpdateCoachRequest,
) -> Result<Coach> {
    let repo = RecordRepository::new(pool);
    repo.update::<Coach, _>(scope, id, request).await
}

/// Delete a coach
pub async fn delete_coach(pool: &PgPool, scope: &AuthScope, id: Uuid) -> Result<Coach> {
    let repo = RecordRepository::new(pool);
    repo.delete::<Coach>(scope, id).await
}
