//! services/frontend/src/bin/frontend.rs

use frontend_lib::{
    adapters::{IdentitySettings, MemoryIdentityProvider, MemoryProfileStore, PgProfileStore},
    config::Config,
    error::FrontendError,
    session::SessionService,
    web::{self, rest::ApiDoc, state::AppState},
};
use axum::{
    http::{header::{ACCEPT, CONTENT_TYPE}, HeaderValue, Method},
    Router,
};
use booking_auth_core::ports::{CredentialGateway, ProfileStore};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), FrontendError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting front-end...");

    // --- 2. Identity Provider ---
    let gateway: Arc<dyn CredentialGateway> = Arc::new(MemoryIdentityProvider::new(IdentitySettings {
        min_password_length: config.min_password_length,
        max_failed_attempts: config.max_failed_sign_ins,
    }));
    info!("Using the in-process identity provider.");

    // --- 3. Profile Store (PostgreSQL when configured) ---
    let profiles: Arc<dyn ProfileStore> = match &config.database_url {
        Some(database_url) => {
            info!("Connecting to database...");
            let db_pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(database_url)
                .await?;
            let store = PgProfileStore::new(db_pool);
            info!("Running database migrations...");
            store.run_migrations().await?;
            info!("Database migrations complete.");
            Arc::new(store)
        }
        None => {
            info!("DATABASE_URL not set, keeping profiles in memory.");
            Arc::new(MemoryProfileStore::new())
        }
    };

    // --- 4. Session Service & Shared AppState ---
    let session = Arc::new(SessionService::start(gateway, profiles, config.session.clone()));
    let app_state = Arc::new(AppState::new(session));

    // --- 5. Create the Web Router ---
    let origin = config.allowed_origin.parse::<HeaderValue>().map_err(|e| {
        FrontendError::Internal(format!(
            "Invalid ALLOWED_ORIGIN '{}': {}",
            config.allowed_origin, e
        ))
    })?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(web::router(app_state).layer(cors))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    if !config.bind_address.ip().is_loopback() {
        warn!(
            "Binding to {}: the session is shared by every client that can reach this address",
            config.bind_address
        );
    }
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
