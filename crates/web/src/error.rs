use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use storage::error::StorageError;
use storage::query::QueryError;
use validator::ValidationErrors;

use crate::identity::IdentityError;

/// Web layer errors
#[derive(Debug)]
pub enum WebError {
    Storage(StorageError),
    Validation(ValidationErrors),
    Query(QueryError),
    BadRequest(String),
    Unauthorized,
    MethodNotAllowed(Method),
    InternalServerError(String),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "Storage error: {}", e),
            Self::Validation(e) => write!(f, "Validation error: {}", e),
            Self::Query(e) => write!(f, "Invalid query: {}", e),
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::Unauthorized => write!(f, "Unauthorized"),
            Self::MethodNotAllowed(method) => write!(f, "Method {} not allowed", method),
            Self::InternalServerError(msg) => write!(f, "Internal server error: {}", msg),
        }
    }
}

impl WebError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Storage(StorageError::NotFound) => StatusCode::NOT_FOUND,
            Self::Storage(StorageError::ConstraintViolation(_)) => StatusCode::CONFLICT,
            Self::Storage(StorageError::Authorization(_)) => StatusCode::FORBIDDEN,
            Self::Storage(StorageError::Query(_) | StorageError::InvalidReference { .. }) => {
                StatusCode::BAD_REQUEST
            }
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) | Self::Query(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn query_details(error: &QueryError) -> serde_json::Value {
    json!({
        "error": "Validation failed",
        "details": [format!("{}: {}", error.parameter(), error)]
    })
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        let body = match &self {
            Self::Storage(StorageError::NotFound) => {
                json!({
                    "error": "Resource not found"
                })
            }
            Self::Storage(StorageError::ConstraintViolation(msg)) => {
                json!({
                    "error": msg
                })
            }
            Self::Storage(StorageError::Authorization(e)) => {
                tracing::warn!("Authorization denied: {}", e);
                json!({
                    "error": e.to_string()
                })
            }
            Self::Storage(StorageError::Query(e)) | Self::Query(e) => query_details(e),
            Self::Storage(e @ StorageError::InvalidReference { .. }) => {
                json!({
                    "error": e.to_string()
                })
            }
            Self::Storage(e) => {
                tracing::error!("Storage error: {:?}", e);
                json!({
                    "error": "An internal error occurred"
                })
            }
            Self::Validation(errors) => {
                let field_errors: Vec<String> = errors
                    .errors()
                    .iter()
                    .flat_map(|(field, kind)| flatten(field.to_string(), kind))
                    .collect();

                json!({
                    "error": "Validation failed",
                    "details": field_errors
                })
            }
            Self::BadRequest(msg) => {
                json!({
                    "error": msg
                })
            }
            Self::Unauthorized => {
                json!({
                    "error": "Unauthorized"
                })
            }
            Self::MethodNotAllowed(method) => {
                json!({
                    "message": format!("Method {} not allowed", method)
                })
            }
            Self::InternalServerError(msg) => {
                tracing::error!("Internal server error: {}", msg);
                json!({
                    "error": "An internal error occurred"
                })
            }
        };

        (status_code, Json(body)).into_response()
    }
}

/// Flattens nested validation errors into `path: message` lines, e.g. `player[0].status: ...`.
fn flatten(path: String, kind: &validator::ValidationErrorsKind) -> Vec<String> {
    use validator::ValidationErrorsKind;

    match kind {
        ValidationErrorsKind::Field(errors) => errors
            .iter()
            .map(|e| {
                format!(
                    "{}: {}",
                    path,
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                )
            })
            .collect(),
        ValidationErrorsKind::Struct(errors) => errors
            .errors()
            .iter()
            .flat_map(|(field, kind)| flatten(format!("{path}.{field}"), kind))
            .collect(),
        ValidationErrorsKind::List(items) => items
            .iter()
            .flat_map(|(index, errors)| {
                let path = format!("{path}[{index}]");
                errors
                    .errors()
                    .iter()
                    .flat_map(|(field, kind)| flatten(format!("{path}.{field}"), kind))
                    .collect::<Vec<_>>()
            })
            .collect(),
    }
}

impl From<StorageError> for WebError {
    fn from(error: StorageError) -> Self {
        Self::Storage(error)
    }
}

impl From<ValidationErrors> for WebError {
    fn from(error: ValidationErrors) -> Self {
        Self::Validation(error)
    }
}

impl From<QueryError> for WebError {
    fn from(error: QueryError) -> Self {
        Self::Query(error)
    }
}

impl From<JsonRejection> for WebError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for WebError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for WebError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<IdentityError> for WebError {
    fn from(error: IdentityError) -> Self {
        match error {
            IdentityError::Unauthenticated => Self::Unauthorized,
            other => Self::InternalServerError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;
    use storage::entity::EntityKind;
    use storage::scope::AuthorizationError;
    use uuid::Uuid;

    use super::*;

    async fn render(error: WebError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_method_not_allowed_body() {
        let (status, body) = render(WebError::MethodNotAllowed(Method::DELETE)).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, json!({ "message": "Method DELETE not allowed" }));
    }

    #[tokio::test]
    async fn test_authorization_maps_to_forbidden() {
        let error = StorageError::from(AuthorizationError::ForeignTenant {
            entity: EntityKind::Player,
            id: Uuid::nil(),
        });
        let (status, _) = render(error.into()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_query_error_names_the_parameter() {
        let error = QueryError::DuplicateFilter {
            field: "status".to_string(),
        };
        let (status, body) = render(error.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"][0], "filter[status]: 'status' is filtered more than once");
    }

    #[tokio::test]
    async fn test_infrastructure_details_are_not_leaked() {
        let error = WebError::from(IdentityError::Unexpected(reqwest::StatusCode::BAD_GATEWAY));
        let (status, body) = render(error).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "An internal error occurred" }));
    }

    #[tokio::test]
    async fn test_constraint_maps_to_conflict() {
        let error = StorageError::ConstraintViolation("duplicate email".to_string());
        let (status, body) = render(error.into()).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "duplicate email");
    }
}
