use std::sync::Arc;

use axum::extract::FromRef;
use storage::Database;
use storage::query::QueryOptions;

use crate::identity::IdentityProvider;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub identity: Arc<dyn IdentityProvider>,
    pub query: QueryOptions,
}

impl FromRef<AppState> for Database {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl FromRef<AppState> for QueryOptions {
    fn from_ref(state: &AppState) -> Self {
        state.query
    }
}
