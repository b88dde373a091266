//! Review repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{Document, DocumentStore, StoreResult};
use afrofood_shared::models::Review;

/// Review record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReviewRecord {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub comments: Option<String>,
    pub ratings: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ReviewRecord> for Review {
    fn from(record: ReviewRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            comments: record.comments,
            ratings: record.ratings,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Input for creating a review
#[derive(Debug, Clone)]
pub struct NewReview {
    pub user_id: Option<Uuid>,
    pub comments: Option<String>,
    pub ratings: f64,
}

/// Input for updating a review
#[derive(Debug, Clone, Default)]
pub struct ReviewChanges {
    pub comments: Option<String>,
    pub ratings: Option<f64>,
}

impl Document for Review {
    type New = NewReview;
    type Changes = ReviewChanges;

    const KIND: &'static str = "Review";

    fn id(&self) -> Uuid {
        self.id
    }

    fn from_new(id: Uuid, new: NewReview, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: new.user_id,
            comments: new.comments,
            ratings: new.ratings,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, changes: ReviewChanges, now: DateTime<Utc>) {
        if changes.comments.is_some() {
            self.comments = changes.comments;
        }
        if let Some(ratings) = changes.ratings {
            self.ratings = ratings;
        }
        self.updated_at = now;
    }
}

/// Review storage
#[async_trait]
pub trait ReviewRepository: DocumentStore<Review> {
    /// Reviews written by one user
    async fn find_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Review>>;

    /// Reviews with the given ids, in the order requested; unknown ids are skipped
    async fn find_many(&self, ids: &[Uuid]) -> StoreResult<Vec<Review>>;

    /// Remove every review written by one user, returning how many went
    async fn delete_by_user(&self, user_id: Uuid) -> StoreResult<u64>;
}

/// PostgreSQL review storage
pub struct PgReviewRepository {
    pool: PgPool,
}

impl PgReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore<Review> for PgReviewRepository {
    async fn list(&self) -> StoreResult<Vec<Review>> {
        let records = sqlx::query_as::<_, ReviewRecord>(
            r#"
            SELECT id, user_id, comments, ratings, created_at, updated_at
            FROM reviews
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(Review::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Review>> {
        let record = sqlx::query_as::<_, ReviewRecord>(
            r#"
            SELECT id, user_id, comments, ratings, created_at, updated_at
            FROM reviews
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Review::from))
    }

    async fn insert(&self, new: NewReview) -> StoreResult<Review> {
        let record = sqlx::query_as::<_, ReviewRecord>(
            r#"
            INSERT INTO reviews (id, user_id, comments, ratings)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, comments, ratings, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.user_id)
        .bind(&new.comments)
        .bind(new.ratings)
        .fetch_one(&self.pool)
        .await?;

        Ok(record.into())
    }

    async fn update(&self, id: Uuid, changes: ReviewChanges) -> StoreResult<Option<Review>> {
        let record = sqlx::query_as::<_, ReviewRecord>(
            r#"
            UPDATE reviews
            SET comments = COALESCE($2, comments),
                ratings = COALESCE($3, ratings),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, comments, ratings, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&changes.comments)
        .bind(changes.ratings)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Review::from))
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ReviewRepository for PgReviewRepository {
    async fn find_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Review>> {
        let records = sqlx::query_as::<_, ReviewRecord>(
            r#"
            SELECT id, user_id, comments, ratings, created_at, updated_at
            FROM reviews
            WHERE user_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(Review::from).collect())
    }

    async fn find_many(&self, ids: &[Uuid]) -> StoreResult<Vec<Review>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let records = sqlx::query_as::<_, ReviewRecord>(
            r#"
            SELECT r.id, r.user_id, r.comments, r.ratings, r.created_at, r.updated_at
            FROM reviews r
            JOIN UNNEST($1::uuid[]) WITH ORDINALITY AS wanted(id, position) ON wanted.id = r.id
            ORDER BY wanted.position
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(Review::from).collect())
    }

    async fn delete_by_user(&self, user_id: Uuid) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM reviews WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
