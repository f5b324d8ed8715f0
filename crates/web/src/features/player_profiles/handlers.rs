use axum::{
    Extension, Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::player_profile::{CreatePlayerProfileRequest, UpdatePlayerProfileRequest},
    models::PlayerProfile,
    query::QueryOptions,
    scope::AuthScope,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::features::{IncludeParams, ListParams};

use super::services;

#[utoipa::path(
    get,
    path = "/api/player-profiles",
    params(ListParams),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Player profile list", body = Vec<PlayerProfile>),
        (status = 400, description = "Invalid query"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "player-profiles"
)]
pub async fn list_player_profiles(
    State(db): State<Database>,
    State(options): State<QueryOptions>,
    Extension(scope): Extension<AuthScope>,
    params: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Response, WebError> {
    let Query(params) = params?;

    let player_profiles = services::list_player_profiles(db.pool(), &scope, &params, &options).await?;

    Ok(Json(player_profiles).into_response())
}

#[utoipa::path(
    get,
    path = "/api/player-profiles/{id}",
    params(
        ("id" = Uuid, Path, description = "Player profile id"),
        IncludeParams
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Player profile found", body = PlayerProfile),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Player profile not found")
    ),
    tag = "player-profiles"
)]
pub async fn get_player_profile(
    State(db): State<Database>,
    Extension(scope): Extension<AuthScope>,
    id: Result<Path<Uuid>, PathRejection>,
    params: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Response, WebError> {
    let Path(id) = id?;
    let Query(params) = params?;

    let player_profile = services::get_player_profile(db.pool(), &scope, id, &params).await?;

    Ok(Json(player_profile).into_response())
}

#[utoipa::path(
    post,
    path = "/api/player-profiles",
    request_body = CreatePlayerProfileRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Player profile created", body = PlayerProfile),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Role may not create player profiles")
    ),
    tag = "player-profiles"
)]
pub async fn create_player_profile(
    State(db): State<Database>,
    Extension(scope): Extension<AuthScope>,
    payload: Result<Json<CreatePlayerProfileRequest>, JsonRejection>,
) -> Result<Response, WebError> {
    let Json(req) = payload?;
    req.validate()?;

    let player_profile = services::create_player_profile(db.pool(), &scope, req).await?;

    Ok(Json(player_profile).into_response())
}

#[utoipa::path(
    put,
    path = "/api/player-profiles/{id}",
    params(
        ("id" = Uuid, Path, description = "Player profile id")
    ),
    request_body = UpdatePlayerProfileRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Player profile updated", body = PlayerProfile),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Player profile not found")
    ),
    tag = "player-profiles"
)]
pub async fn update_player_profile(
    State(db): State<Database>,
    Extension(scope): Extension<AuthScope>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdatePlayerProfileRequest>, JsonRejection>,
) -> Result<Response, WebError> {
    let Path(id) = id?;
    let Json(update_req) = payload?;
    update_req.validate()?;

    let updated = services::update_player_profile(db.pool(), &scope, id, &update_req).await?;

    Ok(Json(updated).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/player-profiles/{id}",
    params(
        ("id" = Uuid, Path, description = "Player profile id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Player profile deleted", body = PlayerProfile),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Player profile not found"),
        (status = 409, description = "Player profile is still referenced")
    ),
    tag = "player-profiles"
)]
pub async fn delete_player_profile(
    State(db): State<Database>,
    Extension(scope): Extension<AuthScope>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, WebError> {
    let Path(id) = id?;

    let deleted = services::delete_player_profile(db.pool(), &scope, id).await?;

    Ok(Json(deleted).into_response())
}
