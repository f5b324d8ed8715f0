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
    dto::user::{CreateUserRequest, UpdateUserRequest},
    models::User,
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
    path = "/api/users",
    params(ListParams),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "User list", body = Vec<User>),
        (status = 400, description = "Invalid query"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "users"
)]
pub async fn list_users(
    State(db): State<Database>,
    State(options): State<QueryOptions>,
    Extension(scope): Extension<AuthScope>,
    params: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Response, WebError> {
    let Query(params) = params?;

    let users = services::list_users(db.pool(), &scope, &params, &options).await?;

    Ok(Json(users).into_response())
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(
        ("id" = Uuid, Path, description = "User id"),
        IncludeParams
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    ),
    tag = "users"
)]
pub async fn get_user(
    State(db): State<Database>,
    Extension(scope): Extension<AuthScope>,
    id: Result<Path<Uuid>, PathRejection>,
    params: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Response, WebError> {
    let Path(id) = id?;
    let Query(params) = params?;

    let user = services::get_user(db.pool(), &scope, id, &params).await?;

    Ok(Json(user).into_response())
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "User created", body = User),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Role may not create users")
    ),
    tag = "users"
)]
pub async fn create_user(
    State(db): State<Database>,
    Extension(scope): Extension<AuthScope>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<Response, WebError> {
    let Json(req) = payload?;
    req.validate()?;

    let user = services::create_user(db.pool(), &scope, req).await?;

    Ok(Json(user).into_response())
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(
        ("id" = Uuid, Path, description = "User id")
    ),
    request_body = UpdateUserRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found")
    ),
    tag = "users"
)]
pub async fn update_user(
    State(db): State<Database>,
    Extension(scope): Extension<AuthScope>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Response, WebError> {
    let Path(id) = id?;
    let Json(update_req) = payload?;
    update_req.validate()?;

    let updated = services::update_user(db.pool(), &scope, id, &update_req).await?;

    Ok(Json(updated).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(
        ("id" = Uuid, Path, description = "User id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "User deleted", body = User),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found"),
        (status = 409, description = "User is still referenced")
    ),
    tag = "users"
)]
pub async fn delete_user(
    State(db): State<Database>,
    Extension(scope): Extension<AuthScope>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, WebError> {
    let Path(id) = id?;

    let deleted = services::delete_user(db.pool(), &scope, id).await?;

    Ok(Json(deleted).into_response())
}
