use std::sync::Arc;

use schoolhub_cache::{CacheConfig, SessionStore, connect_session_store};
use schoolhub_config::{CorsConfig, EmailConfig, JwtConfig, SessionConfig};
use schoolhub_db::init_db_pool;
use sqlx::PgPool;

use crate::utils::email::{Mailer, mailer_from_config};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub email_config: EmailConfig,
    pub cors_config: CorsConfig,
    pub session_config: SessionConfig,
    /// Password reset state, keyed by session id.
    pub sessions: Arc<dyn SessionStore>,
    pub mailer: Arc<dyn Mailer>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("jwt_config", &self.jwt_config)
            .field("cors_config", &self.cors_config)
            .field("session_config", &self.session_config)
            .finish_non_exhaustive()
    }
}

pub async fn init_app_state() -> AppState {
    let email_config = EmailConfig::from_env();

    AppState {
        db: init_db_pool().await,
        jwt_config: JwtConfig::from_env(),
        mailer: mailer_from_config(&email_config),
        email_config,
        cors_config: CorsConfig::from_env(),
        session_config: SessionConfig::from_env(),
        sessions: connect_session_store(&CacheConfig::from_env()).await,
    }
}
