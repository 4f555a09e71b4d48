use anyhow::Result;
use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing::info;

use menu_api_server::config::Settings;
use menu_api_server::database::{DbPool, MenuRepository};
use menu_api_server::handlers;
use menu_api_server::services::{MenuCache, MenuService, MenuServiceOptions};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,menu_api_server=debug".to_string()),
        )
        .with_target(true)
        .json()
        .init();

    info!("🚀 Starting menu API server...");

    // Load configuration
    let settings = Settings::load()?;
    info!("✅ Configuration loaded");

    // Initialize database pool (lazy: an unreachable database still
    // leaves the fallback menu path serving)
    let db_pool = DbPool::new(&settings.database)?;
    info!("✅ Database pool ready");

    // Initialize repository and menu service
    let repository = Arc::new(MenuRepository::new(db_pool.clone()));

    let menu_cache = Arc::new(MenuCache::new());
    let menu_service = Arc::new(MenuService::new(
        repository,
        menu_cache,
        MenuServiceOptions::from(&settings.menu),
    ));

    // Build router
    let app = build_router(menu_service, db_pool);

    // Server address
    let addr = SocketAddr::from((
        settings.server.host.parse::<std::net::IpAddr>()?,
        settings.server.port,
    ));

    info!("🎯 Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(menu_service: Arc<MenuService>, db_pool: DbPool) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/health/ready", get(handlers::health::readiness_check));

    let menu_routes = Router::new()
        .route("/api/menu/nav", get(handlers::menu::main_nav_handler))
        .route(
            "/api/menu/structure",
            get(handlers::menu::menu_structure_handler),
        )
        .route(
            "/api/menu/cache/clear",
            post(handlers::menu::clear_cache_handler),
        );

    Router::new()
        .merge(public_routes)
        .merge(menu_routes)
        .layer(Extension(menu_service))
        .layer(Extension(db_pool))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
}
