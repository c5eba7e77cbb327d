mod config;
mod current_user;
mod doc;
mod error;
mod state;

mod dtos {
    pub mod schedule;
    pub mod user;
}

mod routes {
    pub mod auth;
    pub mod health;
    pub mod schedule;
}

mod utils {
    pub mod shutdown;
}

use crate::{
    config::Config,
    doc::ApiDoc,
    routes::{auth, health, schedule},
    state::AppState,
    utils::shutdown::shutdown_signal,
};
use axum::{Router, routing::get};
use database::{db::create_connection, services::notify::LogNotifier};
use log::{error, info};
use std::{process, sync::Arc};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_oauth2_resource_server::server::OAuth2ResourceServer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {e}");
            process::exit(1);
        }
    };

    let db = create_connection(&config.database_url)
        .await
        .expect("Failed to connect to database");

    let oauth2_resource_server = <OAuth2ResourceServer>::builder()
        .issuer_url(&config.oidc_issuer_url)
        .build()
        .await
        .expect("Failed to build OAuth2ResourceServer");

    let state = AppState::new(db, Arc::new(LogNotifier));

    let protected = schedule::router()
        .route("/me", get(auth::me))
        .layer(ServiceBuilder::new().layer(oauth2_resource_server.into_layer()));

    let app = Router::new()
        .route("/health", get(health::health))
        .merge(protected)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(ServiceBuilder::new().layer(CompressionLayer::new()))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind listener");
    info!("Running axum on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}
