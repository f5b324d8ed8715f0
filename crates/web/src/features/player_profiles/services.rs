use serde_json::Value;
use sqlx::PgPool;
use storage::{
    dto::player_profile::{CreatePlayerProfileRequest, UpdatePlayerProfileRequest},
    entity::EntityKind,
    error::Result,
    models::PlayerProfile,
    query::{self, QueryOptions},
    repository::records::RecordRepository,
    scope::AuthScope,
};
use uuid::Uuid;

/// List player profiles of the caller's tenant
pub async fn list_player_profiles(
    pool: &PgPool,
    scope: &AuthScope,
    params: &[(String, String)],
    options: &QueryOptions,
) -> Result<Vec<Value>> {
    let query = query::translate(params, EntityKind::PlayerProfile, options)?;
    let repo = RecordRepository::new(pool);
    repo.find_many(&scope.narrow(query)).await
}

/// Get a player profile by id
pub async fn get_player_profile(
    pool: &PgPool,
    scope: &AuthScope,
    id: Uuid,
    params: &[(String, String)],
) -> Result<Value> {
    let include = query::translate_inclusion(params, EntityKind::PlayerProfile)?;
    let repo = RecordRepository::new(pool);
    repo.find_by_id(scope, EntityKind::PlayerProfile, id, &include).await
}

/// Create a player profile
pub async fn create_player_profile(
    pool: &PgPool,
    scope: &AuthScope,
    request: CreatePlayerProfileRequest,
) -> Result<PlayerProfile> {
    let data = request;
    let repo = RecordRepository::new(pool);
    repo.create::<PlayerProfile, _>(scope, &data).await
}

/// Update a player profile
pub async fn update_player_profile(
    pool: &PgPool,
    scope: &AuthScope,
    id: Uuid,
    request: &UpdatePlayerProfileRequest,
) -> Result<PlayerProfile> {
    let repo = RecordRepository::new(pool);
    repo.update::<PlayerProfile, _>(scope, id, request).await
}

/// Delete a player profile
pub async fn delete_player_profile(pool: &PgPool, scope: &AuthScope, id: Uuid) -> Result<PlayerProfile> {
    let repo = RecordRepository::new(pool);
    repo.delete::<PlayerProfile>(scope, id).await
}
