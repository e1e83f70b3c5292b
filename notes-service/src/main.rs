//! Notes service — a small JSON API over a single SQLite table of notes.
//!
//! Routes:
//!   POST   /insert2          create a note
//!   PUT    /update2/{id}     overwrite a note's name and description
//!   GET    /viewAll2/        list every note
//!   DELETE /delete2/{id}     delete a note

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Logger, web};
use dotenv::dotenv;
use std::sync::Arc;
use std::time::{Duration, Instant};

mod config;
mod controllers;
mod db;
mod error;

use config::Config;
use db::Database;

pub struct AppState {
    pub db: Arc<Database>,
    /// Server start time for uptime calculation
    pub started_at: Instant,
}

impl AppState {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            db,
            started_at: Instant::now(),
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Notes service v{}", controllers::health::VERSION);

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    log::info!("Database settings: {:?}", config.db);
    if config.db.user.is_some() || config.db.password.is_some() {
        log::info!("DB_USER/DB_PASSWORD are not used by the embedded SQLite store");
    }

    // Refuse to serve requests against a missing table
    let db = match Database::open(&config.db) {
        Ok(db) => Arc::new(db),
        Err(e) => {
            log::error!("Failed to open database: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = db.ensure_schema() {
        log::error!("Failed to create notes table: {}", e);
        std::process::exit(1);
    }
    match db.count_notes() {
        Ok(count) => log::info!("[DB] {} notes on record", count),
        Err(e) => log::warn!("[DB] Could not count notes: {}", e),
    }

    let state = web::Data::new(AppState::new(Arc::clone(&db)));

    log::info!("Listening on http://{}:{}", config.host, config.port);

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .wrap(cors)
            .configure(controllers::health::config_routes)
            .configure(controllers::notes::config)
    })
    .bind((config.host.as_str(), config.port))?
    .run();

    let server_handle = server.handle();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        log::info!("Received Ctrl+C, shutting down...");

        let server_stop = server_handle.stop(true);
        if tokio::time::timeout(Duration::from_secs(5), server_stop).await.is_err() {
            log::warn!("Timeout waiting for HTTP server to stop, forcing exit...");
        }

        log::info!("Shutdown complete");
    });

    server.await
}
