use serde_json::Value;
use sqlx::PgPool;
use storage::{
    dto::user::{CreateUserRequest, UpdateUserRequest},
    entity::EntityKind,
    error::Result,
    models::User,
    query::{self, QueryOptions},
    repository::records::RecordRepository,
    scope::AuthScope,
};
use uuid::Uuid;

/// List users of the caller's tenant
pub async fn list_users(
    pool: &PgPool,
    scope: &AuthScope,
    params: &[(String, String)],
    options: &QueryOptions,
) -> Result<Vec<Value>> {
    let query = query::translate(params, EntityKind::User, options)?;
    let repo = RecordRepository::new(pool);
    repo.find_many(&scope.narrow(query)).await
}

/// Get a user by id
pub async fn get_user(
    pool: &PgPool,
    scope: &AuthScope,
    id: Uuid,
    params: &[(String, String)],
) -> Result<Value> {
    let include = query::translate_inclusion(params, EntityKind::User)?;
    let repo = RecordRepository::new(pool);
    repo.find_by_id(scope, EntityKind::User, id, &include).await
}

/// Create a user
pub async fn create_user(
    pool: &PgPool,
    scope: &AuthScope,
    request: CreateUserRequest,
) -> Result<User> {
    let data = request;
    let repo = RecordRepository::new(pool);
    repo.create::<User, _>(scope, &data).await
}

/// Update a user
pub async fn update_user(
    pool: &PgPool,
    scope: &AuthScope,
    id: Uuid,
    request: &UpdateUserRequest,
) -> Result<User> {
    let repo = RecordRepository::new(pool);
    repo.update::<User, _>(scope, id, request).await
}

/// Delete a user
pub async fn delete_user(pool: &PgPool, scope: &AuthScope, id: Uuid) -> Result<User> {
    let repo = RecordRepository::new(pool);
    repo.delete::<User>(scope, id).await
}
