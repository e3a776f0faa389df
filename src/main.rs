//! File Item Server - Main entry point.
//!
//! Starts the Actix-web server with configured routes and middleware.

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, http::header, web};
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

use file_item_lib::api::{self, FileItemController};
use file_item_lib::config::Config;
use file_item_lib::db::MemoryFileItemRepository;
use file_item_lib::middleware;
use file_item_lib::services::FileStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("");
            error!("Please check your environment variables:");
            error!("  - RUST_ENV must be set to 'development' or 'production'");
            error!("  - In production, FIS_FILE_DIR must be set to an absolute path");
            std::process::exit(1);
        }
    };

    info!("========================================");
    info!("  File Item Server");
    info!("  Environment: {}", config.environment);
    info!("========================================");

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode - do not use in production!");
    }

    // Create storage directory
    let file_store = FileStore::new(config.file_dir.clone());
    if let Err(e) = file_store.ensure_dir().await {
        error!("{}", e);
        std::process::exit(1);
    }

    // Wire collaborators explicitly; the controller is shared by all workers
    let repository = Arc::new(MemoryFileItemRepository::new());
    let controller = web::Data::new(FileItemController::new(
        repository,
        file_store,
        config.max_upload_size,
    ));

    info!(
        "Upload limit: {}MB per request",
        config.max_upload_size / 1024 / 1024
    );

    let bind_address = config.bind_address();
    let is_development = config.is_development();

    let worker_count = if is_development {
        info!(
            "Starting server at http://{} (4 workers - development mode)",
            bind_address
        );
        4
    } else {
        let cpus = num_cpus::get();
        info!(
            "Starting server at http://{} ({} workers)",
            bind_address, cpus
        );
        cpus
    };

    // Start HTTP server
    let server = HttpServer::new(move || {
        // Configure CORS
        let cors = if is_development {
            // Permissive CORS for development
            Cors::default()
                .allowed_origin("http://localhost:3000")
                .allowed_origin("http://127.0.0.1:3000")
                .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
                .expose_headers(vec![header::CONTENT_DISPOSITION, header::LOCATION])
                .max_age(3600)
        } else {
            // Restrictive CORS for production (same-origin only)
            Cors::default()
                .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
                .max_age(3600)
        };

        App::new()
            // Add CORS middleware (must be before other middleware)
            .wrap(cors)
            // Add request logging middleware
            .wrap(middleware::RequestLogger)
            // Add shared state
            .app_data(controller.clone())
            // Configure routes
            .configure(api::configure_health_routes)
            .configure(api::configure_openapi_routes)
            .configure(api::configure_file_item_routes)
            .configure(api::configure_converter_routes)
    });

    // Set worker count
    server
        .workers(worker_count)
        .bind(&bind_address)?
        .run()
        .await
}
