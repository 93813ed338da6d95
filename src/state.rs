use std::sync::Arc;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::auth::jwt::JwtKeys;
use crate::config::AppConfig;
use crate::menus::repo::{MenuRepo, PgMenuRepo};
use crate::restaurants::repo::{PgRestaurantRepo, RestaurantRepo};
use crate::users::repo::{PgUserRepo, UserRepo};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub jwt: JwtKeys,
    pub users: Arc<dyn UserRepo>,
    pub restaurants: Arc<dyn RestaurantRepo>,
    pub menus: Arc<dyn MenuRepo>,
}

impl AppState {
    /// Connects to Postgres; returns the pool too so the caller can run migrations.
    pub async fn init(config: AppConfig) -> anyhow::Result<(Self, PgPool)> {
        let db = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        let state = Self::from_parts(
            Arc::new(config),
            Arc::new(PgUserRepo::new(db.clone())),
            Arc::new(PgRestaurantRepo::new(db.clone())),
            Arc::new(PgMenuRepo::new(db.clone())),
        );
        Ok((state, db))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserRepo>,
        restaurants: Arc<dyn RestaurantRepo>,
        menus: Arc<dyn MenuRepo>,
    ) -> Self {
        Self {
            jwt: JwtKeys::from_config(&config.jwt),
            config,
            users,
            restaurants,
            menus,
        }
    }
}
