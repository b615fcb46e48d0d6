//! REST-Interface fuer Wordcraft

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;

use std::sync::Arc;

use wordcraft_auth::AuthService;
use wordcraft_db::SqliteDb;
use wordcraft_observability::{HealthState, WordcraftMetrics};

/// Axum-State fuer den REST-Server
#[derive(Clone)]
pub struct ApiState {
    pub auth: Arc<AuthService<SqliteDb>>,
    pub metriken: WordcraftMetrics,
    pub health: HealthState,
}

impl ApiState {
    pub fn neu(
        auth: Arc<AuthService<SqliteDb>>,
        metriken: WordcraftMetrics,
        health: HealthState,
    ) -> Self {
        Self {
            auth,
            metriken,
            health,
        }
    }
}

pub use routes::api_router;
pub use server::{RestServer, RestServerKonfig};
