//! Notes Module Service — CRUD over the `/notes` resource.
//!
//! Persists to SQLite when `NOTES_DB_PATH` is set, otherwise keeps notes in
//! memory for the lifetime of the process.
//!
//! Default: http://127.0.0.1:9104/

mod config;
mod error;
mod repository;
mod routes;
mod validation;

use config::ServiceConfig;
use repository::{MemoryNoteRepository, NoteRepository, SqliteNoteRepository};
use routes::AppState;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = ServiceConfig::from_env();

    let repo: Arc<dyn NoteRepository> = match &config.db_path {
        Some(path) => match SqliteNoteRepository::open(path) {
            Ok(repo) => {
                log::info!("Using SQLite note store at {}", path.display());
                Arc::new(repo)
            }
            Err(e) => {
                log::error!("Failed to open note database {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            log::info!(
                "{} not set, notes will be kept in memory",
                config::env_vars::DB_PATH
            );
            Arc::new(MemoryNoteRepository::new())
        }
    };

    let app = routes::router(Arc::new(AppState::new(repo)));

    let addr = config.listen_addr();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    log::info!("Notes Module Service listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        log::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
