use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::pagination::PageRequest;
use crate::restaurants::repo_types::{NewRestaurant, Restaurant, RestaurantChanges};

const COLUMNS: &str = "id, name, address, phone, opening_hours, created_at";

#[async_trait]
pub trait RestaurantRepo: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Restaurant>>;
    async fn find_by_name(&self, name: &str) -> anyhow::Result<Option<Restaurant>>;
    async fn find_by_address(&self, address: &str) -> anyhow::Result<Option<Restaurant>>;
    /// Creation order, then id.
    async fn list(&self, page: &PageRequest) -> anyhow::Result<(Vec<Restaurant>, i64)>;
    async fn create(&self, restaurant: NewRestaurant) -> anyhow::Result<Restaurant>;
    async fn update(
        &self,
        id: Uuid,
        changes: RestaurantChanges,
    ) -> anyhow::Result<Option<Restaurant>>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<Option<Restaurant>>;
}

pub struct PgRestaurantRepo {
    db: PgPool,
}

impl PgRestaurantRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn find_one_by(&self, column: &str, value: &str) -> anyhow::Result<Option<Restaurant>> {
        let row = sqlx::query_as::<_, Restaurant>(&format!(
            "SELECT {COLUMNS} FROM restaurants WHERE {column} = $1 ORDER BY created_at, id LIMIT 1"
        ))
        .bind(value)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }
}

#[async_trait]
impl RestaurantRepo for PgRestaurantRepo {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Restaurant>> {
        let row = sqlx::query_as::<_, Restaurant>(&format!(
            "SELECT {COLUMNS} FROM restaurants WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn find_by_name(&self, name: &str) -> anyhow::Result<Option<Restaurant>> {
        self.find_one_by("name", name).await
    }

    async fn find_by_address(&self, address: &str) -> anyhow::Result<Option<Restaurant>> {
        self.find_one_by("address", address).await
    }

    async fn list(&self, page: &PageRequest) -> anyhow::Result<(Vec<Restaurant>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM restaurants")
            .fetch_one(&self.db)
            .await?;
        let rows = sqlx::query_as::<_, Restaurant>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM restaurants
            ORDER BY created_at ASC, id ASC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(page.per_page)
        .bind(page.offset())
        .fetch_all(&self.db)
        .await?;
        Ok((rows, total))
    }

    async fn create(&self, restaurant: NewRestaurant) -> anyhow::Result<Restaurant> {
        let row = sqlx::query_as::<_, Restaurant>(&format!(
            r#"
            INSERT INTO restaurants (id, name, address, phone, opening_hours)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&restaurant.name)
        .bind(&restaurant.address)
        .bind(&restaurant.phone)
        .bind(&restaurant.opening_hours)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: RestaurantChanges,
    ) -> anyhow::Result<Option<Restaurant>> {
        let row = sqlx::query_as::<_, Restaurant>(&format!(
            r#"
            UPDATE restaurants
               SET name = COALESCE($2, name),
                   address = COALESCE($3, address),
                   phone = COALESCE($4, phone),
                   opening_hours = COALESCE($5, opening_hours)
             WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.name)
        .bind(changes.address)
        .bind(changes.phone)
        .bind(changes.opening_hours)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<Option<Restaurant>> {
        let row = sqlx::query_as::<_, Restaurant>(&format!(
            "DELETE FROM restaurants WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }
}
