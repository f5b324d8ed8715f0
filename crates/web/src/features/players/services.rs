use serde_json::Value;
use sqlx::PgPool;
use storage::{
    dto::player::{CreatePlayerRequest, UpdatePlayerRequest},
    entity::EntityKind,
    error::Result,
    models::Player,
    query::{self, QueryOptions},
    repository::records::RecordRepository,
    scope::AuthScope,
};
use uuid::Uuid;

/// List players of the caller's tenant
pub async fn list_players(
    pool: &PgPool,
    scope: &AuthScope,
    params: &[(String, String)],
    options: &QueryOptions,
) -> Result<Vec<Value>> {
    let query = query::translate(params, EntityKind::Player, options)?;
    let repo = RecordRepository::new(pool);
    repo.find_many(&scope.narrow(query)).await
}

/// Get a player by id
pub async fn get_player(
    pool: &PgPool,
    scope: &AuthScope,
    id: Uuid,
    params: &[(String, String)],
) -> Result<Value> {
    let include = query::translate_inclusion(params, EntityKind::Player)?;
    let repo = RecordRepository::new(pool);
    repo.find_by_id(scope, EntityKind::Player, id, &include).await
}

/// Create a player together with nested player profiles
pub async fn create_player(
    pool: &PgPool,
    scope: &AuthScope,
    request: CreatePlayerRequest,
) -> Result<Player> {
    let data = request.into_create_data();
    let repo = RecordRepository::new(pool);
    repo.create::<Player, _>(scope, &data).await
}

/// Update a player
pub async fn update_player(
    pool: &PgPool,
    scope: &AuthScope,
    id: Uuid,
    request: &UpdatePlayerRequest,
) -> Result<Player> {
    let repo = RecordRepository::new(pool);
    repo.update::<Player, _>(scope, id, request).await
}

/// Delete a player
pub async fn delete_player(pool: &PgPool, scope: &AuthScope, id: Uuid) -> Result<Player> {
    let repo = RecordRepository::new(pool);
    repo.delete::<Player>(scope, id).await
}
