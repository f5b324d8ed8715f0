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
    dto::coach::{CreateCoachRequest, UpdateCoachRequest},
    models::Coach,
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
    path = "/api/coaches",
    params(ListParams),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Coach list", body = Vec<Coach>),
        (status = 400, description = "Invalid query"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "coaches"
)]
pub async fn list_coaches(
    State(db): State<Database>,
    State(options): State<QueryOptions>,
    Extension(scope): Extension<AuthScope>,
    params: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Response, WebError> {
    let Query(params) = params?;

    let coaches = services::list_coaches(db.pool(), &scope, &params, &options).await?;

    Ok(Json(coaches).into_response())
}

#[utoipa::path(
    get,
    path = "/api/coaches/{id}",
    params(
        ("id" = Uuid, Path, description = "Coach id"),
        IncludeParams
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Coach found", body = Coach),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Coach not found")
    ),
    tag = "coaches"
)]
pub async fn get_coach(
    State(db): State<Database>,
    Extension(scope): Extension<AuthScope>,
    id: Result<Path<Uuid>, PathRejection>,
    params: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Response, WebError> {
    let Path(id) = id?;
    let Query(params) = params?;

    let coach = services::get_coach(db.pool(), &scope, id, &params).await?;

    Ok(Json(coach).into_response())
}

#[utoipa::path(
    post,
    path = "/api/coaches",
    request_body = CreateCoachRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Coach created", body = Coach),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Role may not create coaches")
    ),
    tag = "coaches"
)]
pub async fn create_coach(
    State(db): State<Database>,
    Extension(scope): Extension<AuthScope>,
    payload: Result<Json<CreateCoachRequest>, JsonRejection>,
) -> Result<Response, WebError> {
    let Json(req) = payload?;
    req.validate()?;

    let coach = services::create_coach(db.pool(), &scope, req).await?;

    Ok(Json(coach).into_response())
}

#[utoipa::path(
    put,
    path = "/api/coaches/{id}",
    params(
        ("id" = Uuid, Path, description = "Coach id")
    ),
    request_body = UpdateCoachRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Coach updated", body = Coach),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Coach not found")
    ),
    tag = "coaches"
)]
pub async fn update_coach(
    State(db): State<Database>,
    Extension(scope): Extension<AuthScope>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateCoachRequest>, JsonRejection>,
) -> Result<Response, WebError> {
    let Path(id) = id?;
    let Json(update_req) = payload?;
    update_req.validate()?;

    let updated = services::update_coach(db.pool(), &scope, id, &update_req).await?;

    Ok(Json(updated).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/coaches/{id}",
    params(
        ("id" = Uuid, Path, description = "Coach id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Coach deleted", body = Coach),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Coach not found"),
        (status = 409, description = "Coach is still referenced")
    ),
    tag = "coaches"
)]
pub async fn delete_coach(
    State(db): State<Database>,
    Extension(scope): Extension<AuthScope>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, WebError> {
    let Path(id) = id?;

    let deleted = services::delete_coach(db.pool(), &scope, id).await?;

    Ok(Json(deleted).into_response())
}
