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
    dto::player::{CreatePlayerRequest, UpdatePlayerRequest},
    models::Player,
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
    path = "/api/players",
    params(ListParams),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Player list", body = Vec<Player>),
        (status = 400, description = "Invalid query"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "players"
)]
pub async fn list_players(
    State(db): State<Database>,
    State(options): State<QueryOptions>,
    Extension(scope): Extension<AuthScope>,
    params: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Response, WebError> {
    let Query(params) = params?;

    let players = services::list_players(db.pool(), &scope, &params, &options).await?;

    Ok(Json(players).into_response())
}

#[utoipa::path(
    get,
    path = "/api/players/{id}",
    params(
        ("id" = Uuid, Path, description = "Player id"),
        IncludeParams
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Player found", body = Player),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Player not found")
    ),
    tag = "players"
)]
pub async fn get_player(
    State(db): State<Database>,
    Extension(scope): Extension<AuthScope>,
    id: Result<Path<Uuid>, PathRejection>,
    params: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Response, WebError> {
    let Path(id) = id?;
    let Query(params) = params?;

    let player = services::get_player(db.pool(), &scope, id, &params).await?;

    Ok(Json(player).into_response())
}

#[utoipa::path(
    post,
    path = "/api/players",
    request_body = CreatePlayerRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Player created", body = Player),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Role may not create players")
    ),
    tag = "players"
)]
pub async fn create_player(
    State(db): State<Database>,
    Extension(scope): Extension<AuthScope>,
    payload: Result<Json<CreatePlayerRequest>, JsonRejection>,
) -> Result<Response, WebError> {
    let Json(req) = payload?;
    req.validate()?;

    let player = services::create_player(db.pool(), &scope, req).await?;

    Ok(Json(player).into_response())
}

#[utoipa::path(
    put,
    path = "/api/players/{id}",
    params(
        ("id" = Uuid, Path, description = "Player id")
    ),
    request_body = UpdatePlayerRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Player updated", body = Player),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Player not found")
    ),
    tag = "players"
)]
pub async fn update_player(
    State(db): State<Database>,
    Extension(scope): Extension<AuthScope>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdatePlayerRequest>, JsonRejection>,
) -> Result<Response, WebError> {
    let Path(id) = id?;
    let Json(update_req) = payload?;
    update_req.validate()?;

    let updated = services::update_player(db.pool(), &scope, id, &update_req).await?;

    Ok(Json(updated).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/players/{id}",
    params(
        ("id" = Uuid, Path, description = "Player id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Player deleted", body = Player),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Player not found"),
        (status = 409, description = "Player is still referenced")
    ),
    tag = "players"
)]
pub async fn delete_player(
    State(db): State<Database>,
    Extension(scope): Extension<AuthScope>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, WebError> {
    let Path(id) = id?;

    let deleted = services::delete_player(db.pool(), &scope, id).await?;

    Ok(Json(deleted).into_response())
}
