use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use storage::scope::AuthScope;

use crate::error::WebError;
use crate::state::AppState;

/// Resolves the caller's session and makes its [`AuthScope`] available to handlers.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, WebError> {
    let authorization = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .filter(|value| value.starts_with("Bearer ") && value.len() > "Bearer ".len())
        .ok_or(WebError::Unauthorized)?
        .to_string();

    let session = state.identity.session(&authorization).await?;
    tracing::debug!(user = %session.roq_user_id, tenant = %session.tenant_id, "session resolved");

    request.extensions_mut().insert(AuthScope::from(session));
    Ok(next.run(request).await)
}
