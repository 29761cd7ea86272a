use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::users::{
    memory::MemoryUserStore, pg::PgUserStore, repo::UserStore, services::bootstrap_admin,
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let store = match &config.database_url {
            Some(url) => {
                let db = sqlx::postgres::PgPoolOptions::new()
                    .max_connections(10)
                    .connect(url)
                    .await
                    .context("connect to database")?;

                sqlx::migrate!("./migrations")
                    .run(&db)
                    .await
                    .context("run migrations")?;
                info!("using postgres user store");
                Arc::new(PgUserStore::new(db)) as Arc<dyn UserStore>
            }
            None => {
                warn!("DATABASE_URL not set; users are kept in memory and lost on restart");
                Arc::new(MemoryUserStore::new()) as Arc<dyn UserStore>
            }
        };

        if let Some(seed) = &config.admin_seed {
            bootstrap_admin(store.as_ref(), seed)
                .await
                .context("bootstrap admin account")?;
        }

        Ok(Self::from_parts(store, config))
    }

    pub fn from_parts(store: Arc<dyn UserStore>, config: Arc<AppConfig>) -> Self {
        Self { store, config }
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        use crate::config::{CookieConfig, JwtConfig};

        let config = Arc::new(AppConfig {
            database_url: None,
            jwt: JwtConfig {
                secret: "test".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
            },
            cookie: CookieConfig { secure: false },
            admin_seed: None,
        });

        Self::from_parts(Arc::new(MemoryUserStore::new()), config)
    }
}
