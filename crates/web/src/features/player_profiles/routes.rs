use axum::{Router, routing::get};

use super::handlers::{
    create_player_profile, delete_player_profile, get_player_profile, list_player_profiles, update_player_profile,
};
use crate::features::method_not_allowed;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_player_profiles)
                .post(create_player_profile)
                .fallback(method_not_allowed),
        )
        .route(
            "/:id",
            get(get_player_profile)
                .put(update_player_profile)
                .patch(update_player_profile)
                .delete(delete_player_profile)
                .fallback(method_not_allowed),
        )
}
