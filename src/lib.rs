use std::sync::Arc;

use config::Config;
use redis::Client as RedisClient;
use sqlx::PgPool;
use ups::UpsTrackingClient;

pub mod cache;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod ups;
pub mod utils;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub redis: Arc<RedisClient>,
    pub ups: Arc<UpsTrackingClient>,
}
