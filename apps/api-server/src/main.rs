//! # Glow API Server
//!
//! The Actix-web HTTP server: post API plus static files from the public
//! directory (including uploaded images).

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod state;
mod telemetry;

use config::AppConfig;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    // Startup aborts if the data file or uploads directory cannot be prepared.
    let state = AppState::new(&config).await?;

    tracing::info!(
        "Starting Glow API Server on http://{}:{}",
        config.host,
        config.port
    );

    let public_dir = config.public_dir.clone();
    let allowed_origins = config.allowed_origins.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(build_cors(&allowed_origins))
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_routes)
            .service(Files::new("/", &public_dir).index_file("index.html"))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

fn build_cors(allowed_origins: &[String]) -> Cors {
    if allowed_origins.is_empty() {
        return Cors::permissive();
    }

    allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allow_any_header()
        .max_age(3600)
}
