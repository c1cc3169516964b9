pub mod config;
pub mod db;
pub mod error;
pub mod routes;

use config::AppConfig;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub pool: db::Db,
    pub config: AppConfig,
}
