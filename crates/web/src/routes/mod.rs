use std::any::Any;
use std::time::Duration;

use axum::{
    Router, middleware,
    response::{IntoResponse, Response},
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::ApiDoc;
use crate::error::WebError;
use crate::features::{academies, coaches, player_profiles, players, users};
use crate::middleware::auth::require_session;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/users", users::routes::routes())
        .nest("/academies", academies::routes::routes())
        .nest("/coaches", coaches::routes::routes())
        .nest("/players", players::routes::routes())
        .nest("/player-profiles", player_profiles::routes::routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin)
        .max_age(Duration::from_secs(3600));

    Router::new()
        .nest("/api", api)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn panic_response(_panic: Box<dyn Any + Send + 'static>) -> Response {
    WebError::InternalServerError("request handler panicked".to_string()).into_response()
}
