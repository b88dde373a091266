//! Meal repository - database operations for the menu

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::{Document, DocumentStore, StoreResult};
use afrofood_shared::models::Meal;

/// Meal record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MealRecord {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category: Option<String>,
    pub count_in_stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MealRecord> for Meal {
    fn from(record: MealRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            description: record.description,
            price: record.price,
            category: record.category,
            count_in_stock: record.count_in_stock,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Input for creating a meal
#[derive(Debug, Clone)]
pub struct NewMeal {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category: Option<String>,
    pub count_in_stock: i32,
}

/// Input for updating a meal
#[derive(Debug, Clone, Default)]
pub struct MealChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<String>,
    pub count_in_stock: Option<i32>,
}

impl Document for Meal {
    type New = NewMeal;
    type Changes = MealChanges;

    const KIND: &'static str = "Meal";

    fn id(&self) -> Uuid {
        self.id
    }

    fn from_new(id: Uuid, new: NewMeal, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new.name,
            description: new.description,
            price: new.price,
            category: new.category,
            count_in_stock: new.count_in_stock,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, changes: MealChanges, now: DateTime<Utc>) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if changes.description.is_some() {
            self.description = changes.description;
        }
        if let Some(price) = changes.price {
            self.price = price;
        }
        if changes.category.is_some() {
            self.category = changes.category;
        }
        if let Some(count) = changes.count_in_stock {
            self.count_in_stock = count;
        }
        self.updated_at = now;
    }
}

/// Menu storage
#[async_trait]
pub trait MealRepository: DocumentStore<Meal> {
    /// Meals whose category matches exactly
    async fn find_by_category(&self, category: &str) -> StoreResult<Vec<Meal>>;
}

/// PostgreSQL menu storage
pub struct PgMealRepository {
    pool: PgPool,
}

impl PgMealRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore<Meal> for PgMealRepository {
    async fn list(&self) -> StoreResult<Vec<Meal>> {
        let records = sqlx::query_as::<_, MealRecord>(
            r#"
            SELECT id, name, description, price, category, count_in_stock, created_at, updated_at
            FROM meals
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(Meal::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Meal>> {
        let record = sqlx::query_as::<_, MealRecord>(
            r#"
            SELECT id, name, description, price, category, count_in_stock, created_at, updated_at
            FROM meals
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Meal::from))
    }

    async fn insert(&self, new: NewMeal) -> StoreResult<Meal> {
        let record = sqlx::query_as::<_, MealRecord>(
            r#"
            INSERT INTO meals (id, name, description, price, category, count_in_stock)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, description, price, category, count_in_stock, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.price)
        .bind(&new.category)
        .bind(new.count_in_stock)
        .fetch_one(&self.pool)
        .await?;

        Ok(record.into())
    }

    async fn update(&self, id: Uuid, changes: MealChanges) -> StoreResult<Option<Meal>> {
        let record = sqlx::query_as::<_, MealRecord>(
            r#"
            UPDATE meals
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                category = COALESCE($5, category),
                count_in_stock = COALESCE($6, count_in_stock),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, price, category, count_in_stock, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(changes.price)
        .bind(&changes.category)
        .bind(changes.count_in_stock)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Meal::from))
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM meals WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl MealRepository for PgMealRepository {
    async fn find_by_category(&self, category: &str) -> StoreResult<Vec<Meal>> {
        let records = sqlx::query_as::<_, MealRecord>(
            r#"
            SELECT id, name, description, price, category, count_in_stock, created_at, updated_at
            FROM meals
            WHERE category = $1
            ORDER BY created_at
            "#,
        )
        .bind(category)
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(Meal::from).collect())
    }
}
