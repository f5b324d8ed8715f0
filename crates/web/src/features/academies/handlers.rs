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
    dto::academy::{CreateAcademyRequest, UpdateAcademyRequest},
    models::Academy,
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
    path = "/api/academies",
    params(ListParams),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Academy list", body = Vec<Academy>),
        (status = 400, description = "Invalid query"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "academies"
)]
pub async fn list_academies(
    State(db): State<Database>,
    State(options): State<QueryOptions>,
    Extension(scope): Extension<AuthScope>,
    params: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Response, WebError> {
    let Query(params) = params?;

    let academies = services::list_academies(db.pool(), &scope, &params, &options).await?;

    Ok(Json(academies).into_response())
}

#[utoipa::path(
    get,
    path = "/api/academies/{id}",
    params(
        ("id" = Uuid, Path, description = "Academy id"),
        IncludeParams
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Academy found", body = Academy),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Academy not found")
    ),
    tag = "academies"
)]
pub async fn get_academy(
    State(db): State<Database>,
    Extension(scope): Extension<AuthScope>,
    id: Result<Path<Uuid>, PathRejection>,
    params: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Response, WebError> {
    let Path(id) = id?;
    let Query(params) = params?;

    let academy = services::get_academy(db.pool(), &scope, id, &params).await?;

    Ok(Json(academy).into_response())
}

#[utoipa::path(
    post,
    path = "/api/academies",
    request_body = CreateAcademyRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Academy created", body = Academy),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Role may not create academies")
    ),
    tag = "academies"
)]
pub async fn create_academy(
    State(db): State<Database>,
    Extension(scope): Extension<AuthScope>,
    payload: Result<Json<CreateAcademyRequest>, JsonRejection>,
) -> Result<Response, WebError> {
    let Json(req) = payload?;
    req.validate()?;

    let academy = services::create_academy(db.pool(), &scope, req).await?;

    Ok(Json(academy).into_response())
}

#[utoipa::path(
    put,
    path = "/api/academies/{id}",
    params(
        ("id" = Uuid, Path, description = "Academy id")
    ),
    request_body = UpdateAcademyRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Academy updated", body = Academy),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Academy not found")
    ),
    tag = "academies"
)]
pub async fn update_academy(
    State(db): State<Database>,
    Extension(scope): Extension<AuthScope>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateAcademyRequest>, JsonRejection>,
) -> Result<Response, WebError> {
    let Path(id) = id?;
    let Json(update_req) = payload?;
    update_req.validate()?;

    let updated = services::update_academy(db.pool(), &scope, id, &update_req).await?;

    Ok(Json(updated).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/academies/{id}",
    params(
        ("id" = Uuid, Path, description = "Academy id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Academy deleted", body = Academy),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Academy not found"),
        (status = 409, description = "Academy is still referenced")
    ),
    tag = "academies"
)]
pub async fn delete_academy(
    State(db): State<Database>,
    Extension(scope): Extension<AuthScope>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, WebError> {
    let Path(id) = id?;

    let deleted = services::delete_academy(db.pool(), &scope, id).await?;

    Ok(Json(deleted).into_response())
}
