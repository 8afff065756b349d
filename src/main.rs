//! Compliance Portal Server - Main entry point.
//!
//! Starts the Actix-web server with configured routes and middleware.

use actix_cors::Cors;
use actix_web::{http::header, web, App, HttpServer};
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use compliance_portal_lib::api;
use compliance_portal_lib::config::Config;
use compliance_portal_lib::db::{self, DbPool};
use compliance_portal_lib::middleware::RequestLogger;
use compliance_portal_lib::services::FileStore;

/// Perform health check (for Docker healthcheck).
async fn health_check() -> bool {
    // Simple check - just verify we can load config
    Config::from_env().is_ok()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Check for --health-check flag (used by Docker HEALTHCHECK)
    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|arg| arg == "--health-check") {
        dotenvy::dotenv().ok();
        if health_check().await {
            std::process::exit(0);
        } else {
            std::process::exit(1);
        }
    }

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
            error!("  - In production, DATABASE_URL and CPS_UPLOAD_DIR must be set");
            error!("  - In production, values must not match development defaults");
            std::process::exit(1);
        }
    };

    info!("========================================");
    info!("  Compliance Portal Server");
    info!("  Environment: {}", config.environment);
    info!("========================================");

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode - do not use in production!");
        info!("Using development defaults for DATABASE_URL and CPS_UPLOAD_DIR");
    }

    // A store that cannot write is fatal here, not per request
    let store = FileStore::new(config.upload_dir.clone());
    store.init().await.expect("Failed to initialize file store");

    // Initialize database (synchronous)
    let pool = DbPool::new(&config).expect("Failed to initialize database");
    info!("Database connection established");

    // Run migrations and bring the per-form tables up to date
    db::migrations::run_migrations(&pool).expect("Failed to run migrations");
    info!("Database migrations complete");

    // Prepare shared state
    let bind_address = config.bind_address();
    let max_upload_size = config.max_upload_size;
    let is_development = config.is_development();

    info!(
        "Upload limit: {}MB per attached document",
        max_upload_size / 1024 / 1024
    );

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
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                .allowed_headers(vec![
                    header::AUTHORIZATION,
                    header::ACCEPT,
                    header::CONTENT_TYPE,
                    "User-ID".parse().unwrap(),
                ])
                .max_age(3600)
        } else {
            // Restrictive CORS for production (same-origin only)
            Cors::default()
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                .allowed_headers(vec![
                    header::AUTHORIZATION,
                    header::ACCEPT,
                    header::CONTENT_TYPE,
                    "User-ID".parse().unwrap(),
                ])
                .max_age(3600)
        };

        App::new()
            // Add CORS middleware (must be before other middleware)
            .wrap(cors)
            // Add request logging middleware
            .wrap(RequestLogger)
            // Add shared state
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(store.clone()))
            .app_data(web::Data::new(max_upload_size))
            // Allow some multipart overhead at the HTTP layer - the actual
            // limit is enforced while streaming the file field
            .app_data(web::PayloadConfig::new(max_upload_size * 2))
            // Configure API routes
            .configure(api::configure_health_routes)
            .configure(api::configure_openapi_routes)
            .configure(api::configure_account_routes)
            .configure(api::configure_submission_routes)
            .configure(api::configure_extract_routes)
            .configure(api::configure_download_routes)
    });

    // Set worker count
    server
        .workers(worker_count)
        .bind(&bind_address)?
        .run()
        .await
}
