use std::sync::Arc;

use anyhow::Context;
use storage::Database;
use utoipa::OpenApi;

mod config;
mod error;
mod features;
mod identity;
mod middleware;
mod routes;
mod state;

use config::Config;
use features::{academies, coaches, player_profiles, players, users};
use identity::RemoteIdentityProvider;
use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        users::handlers::list_users,
        users::handlers::get_user,
        users::handlers::create_user,
        users::handlers::update_user,
        users::handlers::delete_user,
        academies::handlers::list_academies,
        academies::handlers::get_academy,
        academies::handlers::create_academy,
        academies::handlers::update_academy,
        academies::handlers::delete_academy,
        coaches::handlers::list_coaches,
        coaches::handlers::get_coach,
        coaches::handlers::create_coach,
        coaches::handlers::update_coach,
        coaches::handlers::delete_coach,
        players::handlers::list_players,
        players::handlers::get_player,
        players::handlers::create_player,
        players::handlers::update_player,
        players::handlers::delete_player,
        player_profiles::handlers::list_player_profiles,
        player_profiles::handlers::get_player_profile,
        player_profiles::handlers::create_player_profile,
        player_profiles::handlers::update_player_profile,
        player_profiles::handlers::delete_player_profile,
    ),
    components(
        schemas(
            storage::dto::user::CreateUserRequest,
            storage::dto::user::UpdateUserRequest,
            storage::dto::academy::CreateAcademyRequest,
            storage::dto::academy::UpdateAcademyRequest,
            storage::dto::academy::AcademyCoachInput,
            storage::dto::coach::CreateCoachRequest,
            storage::dto::coach::UpdateCoachRequest,
            storage::dto::coach::CoachPlayerInput,
            storage::dto::coach::CoachPlayerProfileInput,
            storage::dto::player::CreatePlayerRequest,
            storage::dto::player::UpdatePlayerRequest,
            storage::dto::player::PlayerProfileInput,
            storage::dto::player_profile::CreatePlayerProfileRequest,
            storage::dto::player_profile::UpdatePlayerProfileRequest,
            storage::models::User,
            storage::models::Academy,
            storage::models::Coach,
            storage::models::Player,
            storage::models::PlayerProfile,
        )
    ),
    tags(
        (name = "users", description = "Tenant user records"),
        (name = "academies", description = "Sports academies"),
        (name = "coaches", description = "Academy coaches"),
        (name = "players", description = "Academy players"),
        (name = "player-profiles", description = "Player positions and skill assessments"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("Session token")
                        .build(),
                ),
            )
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting academy API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url, config.database_max_connections)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let identity = RemoteIdentityProvider::new(&config.identity_service_url)
        .context("Failed to build identity service client")?;
    tracing::info!("Identity service at {}", config.identity_service_url);

    let state = AppState {
        db,
        identity: Arc::new(identity),
        query: config.query,
    };

    let bind_address = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {bind_address}"))?;
    tracing::info!("Starting server at http://{}", bind_address);

    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    axum::serve(listener, routes::router(state)).await?;

    Ok(())
}
