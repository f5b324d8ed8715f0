use axum::{Router, routing::get};

use super::handlers::{create_academy, delete_academy, get_academy, list_academies, update_academy};
use crate::features::method_not_allowed;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_academies)
                .post(create_academy)
                .fallback(method_not_allowed),
        )
        .route(
            "/:id",
            get(get_academy)
                .put(update_academy)
                .patch(update_academy)
                .delete(delete_academy)
                .fallback(method_not_allowed),
        )
}
