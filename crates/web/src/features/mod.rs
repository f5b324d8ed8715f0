pub mod academies;
pub mod coaches;
pub mod player_profiles;
pub mod players;
pub mod users;

use axum::http::Method;
use utoipa::IntoParams;

use crate::error::WebError;

/// Answers any verb a resource does not support.
pub async fn method_not_allowed(method: Method) -> WebError {
    WebError::MethodNotAllowed(method)
}

/// Query string accepted by list endpoints.
///
/// Equality filters are passed as `filter[<field>]=<value>`, one per field.
#[allow(dead_code)]
#[derive(Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Page size, at most the configured maximum
    pub limit: Option<u32>,
    /// Rows to skip
    pub offset: Option<u64>,
    /// 1-based page number, an alternative to `offset`
    pub page: Option<u32>,
    /// Page size when paging with `page`
    pub page_size: Option<u32>,
    /// Comma-separated `field[:asc|desc]` or `-field`
    pub order: Option<String>,
    /// Comma-separated relation names, plus `_count`
    pub include: Option<String>,
    /// Case-insensitive text search over the searchable fields
    pub search: Option<String>,
}

#[allow(dead_code)]
#[derive(Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IncludeParams {
    /// Comma-separated relation names, plus `_count`
    pub include: Option<String>,
}
