use axum::{Router, routing::get};

use super::handlers::{create_user, delete_user, get_user, list_users, update_user};
use crate::features::method_not_allowed;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_users)
                .post(create_user)
                .fallback(method_not_allowed),
        )
        .route(
            "/:id",
            get(get_user)
                .put(update_user)
                .patch(update_user)
                .delete(delete_user)
                .fallback(method_not_allowed),
        )
}
