//Third-party-dependencies
use actix_cors::Cors;
use actix_web::http::{header, Method};
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use log::{error, info, warn};
use std::io;

// Crate imports:
use tasktracker_service::config::{AppConfig, AuthMode};
use tasktracker_service::routes;
use tasktracker_service::services::email_service::mailer_from_config;
use tasktracker_service::services::AppState;
use tasktracker_service::utils::Store;

fn startup_error(context: &str, err: impl std::fmt::Display) -> io::Error {
    error!("❌ {}: {}", context, err);
    io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|e| startup_error("Invalid configuration", e))?;
    if config.auth_mode == AuthMode::Dev {
        warn!("⚠️ AUTH_MODE=dev: passwordless dev login is enabled, do not run this in production");
    }

    let store = match &config.storage_path {
        Some(path) => Store::open(path).map_err(|e| startup_error("Failed to open storage", e))?,
        None => {
            info!("Using in-memory storage");
            Store::in_memory()
        }
    };
    let mailer = mailer_from_config(config.resend_api_key.as_deref(), &config.email_from)
        .map_err(|e| startup_error("Failed to set up mailer", e))?;

    // address the server will run on
    let address = format!("{}:{}", config.bind_address, config.port);
    let origins = config.allowed_origins();
    let state = web::Data::new(AppState::new(config, store, mailer));

    info!("🚀 Server started at http://{}", address);
    HttpServer::new(move || {
        let cors = origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec![
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
            .expose_headers(vec![header::CONTENT_RANGE])
            .supports_credentials()
            .max_age(3600);

        let state = state.clone();
        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .configure(|cfg| routes::configure(cfg, state)) // utilises methods from routes
    })
    .bind(address)?
    .run()
    .await
}
