use serde_json::Value;
use sqlx::PgPool;
use storage::{
    dto::academy::{CreateAcademyRequest, UpdateAcademyRequest},
    entity::EntityKind,
    error::Result,
    models::Academy,
    query::{self, QueryOptions},
    repository::records::RecordRepository,
    scope::AuthScope,
};
use uuid::Uuid;

/// List academies of the caller's tenant
pub async fn list_academies(
    pool: &PgPool,
    scope: &AuthScope,
    params: &[(String, String)],
    options: &QueryOptions,
) -> Result<Vec<Value>> {
    let query = query::translate(params, EntityKind::Academy, options)?;
    let repo = RecordRepository::new(pool);
    repo.find_many(&scope.narrow(query)).await
}

/// Get a academy by id
pub async fn get_academy(
    pool: &PgPool,
    scope: &AuthScope,
    id: Uuid,
    params: &[(String, String)],
) -> Result<Value> {
    let include = query::translate_inclusion(params, EntityKind::Academy)?;
    let repo = RecordRepository::new(pool);
    repo.find_by_id(scope, EntityKind::Academy, id, &include).await
}

/// Create a academy together with nested coaches
pub async fn create_academy(
    pool: &PgPool,
    scope: &AuthScope,
    request: CreateAcademyRequest,
) -> Result<Academy> {
    let data = request.into_create_data();
    let repo = RecordRepository::new(pool);
    repo.create::<Academy, _>(scope, &data).await
}

/// Update a academy
pub async fn update_academy(
    pool: &PgPool,
    scope: &AuthScope,
    id: Uuid,
    request: &UpdateAcademyRequest,
) -> Result<Academy> {
    let repo = RecordRepository::new(pool);
    repo.update::<Academy, _>(scope, id, request).await
}

/// Delete a academy
pub async fn delete_academy(pool: &PgPool, scope: &AuthScope, id: Uuid) -> Result<Academy> {
    let repo = RecordRepository::new(pool);
    repo.delete::<Academy>(scope, id).await
}
