use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::menus::repo_types::{Menu, MenuChanges, NewMenu};
use crate::pagination::PageRequest;

pub const SORTABLE: &[&str] = &["name", "price", "category", "created_at"];

const COLUMNS: &str = "id, name, description, price, category, restaurant_id, created_at";

#[async_trait]
pub trait MenuRepo: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Menu>>;
    /// One page of menus, optionally limited to one restaurant, plus the matching total.
    async fn list(
        &self,
        page: &PageRequest,
        restaurant_id: Option<Uuid>,
    ) -> anyhow::Result<(Vec<Menu>, i64)>;
    async fn create(&self, menu: NewMenu) -> anyhow::Result<Menu>;
    async fn update(&self, id: Uuid, changes: MenuChanges) -> anyhow::Result<Option<Menu>>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<Option<Menu>>;
}

pub struct PgMenuRepo {
    db: PgPool,
}

impl PgMenuRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, restaurant_id: Option<Uuid>) {
    if let Some(rid) = restaurant_id {
        qb.push(" WHERE restaurant_id = ").push_bind(rid);
    }
}

#[async_trait]
impl MenuRepo for PgMenuRepo {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Menu>> {
        let menu = sqlx::query_as::<_, Menu>(&format!("SELECT {COLUMNS} FROM menus WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(menu)
    }

    async fn list(
        &self,
        page: &PageRequest,
        restaurant_id: Option<Uuid>,
    ) -> anyhow::Result<(Vec<Menu>, i64)> {
        let mut count: QueryBuilder<Postgres> = QueryBuilder::new("SELECT COUNT(*) FROM menus");
        push_filter(&mut count, restaurant_id);
        let total: i64 = count.build_query_scalar::<i64>().fetch_one(&self.db).await?;

        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {COLUMNS} FROM menus"));
        push_filter(&mut qb, restaurant_id);
        qb.push(" ORDER BY ");
        match page.sort {
            Some(sort) => {
                qb.push(sort.column)
                    .push(if sort.descending { " DESC, " } else { " ASC, " });
            }
            None => {
                qb.push("created_at ASC, ");
            }
        }
        qb.push("id ASC LIMIT ")
            .push_bind(page.per_page)
            .push(" OFFSET ")
            .push_bind(page.offset());

        let menus = qb.build_query_as::<Menu>().fetch_all(&self.db).await?;
        Ok((menus, total))
    }

    async fn create(&self, menu: NewMenu) -> anyhow::Result<Menu> {
        let menu = sqlx::query_as::<_, Menu>(&format!(
            r#"
            INSERT INTO menus (id, name, description, price, category, restaurant_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&menu.name)
        .bind(&menu.description)
        .bind(menu.price)
        .bind(&menu.category)
        .bind(menu.restaurant_id)
        .fetch_one(&self.db)
        .await?;
        Ok(menu)
    }

    async fn update(&self, id: Uuid, changes: MenuChanges) -> anyhow::Result<Option<Menu>> {
        let menu = sqlx::query_as::<_, Menu>(&format!(
            r#"
            UPDATE menus
               SET name = COALESCE($2, name),
                   description = COALESCE($3, description),
                   price = COALESCE($4, price),
                   category = COALESCE($5, category),
                   restaurant_id = COALESCE($6, restaurant_id)
             WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.name)
        .bind(changes.description)
        .bind(changes.price)
        .bind(changes.category)
        .bind(changes.restaurant_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(menu)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<Option<Menu>> {
        let menu = sqlx::query_as::<_, Menu>(&format!(
            "DELETE FROM menus WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(menu)
    }
}
