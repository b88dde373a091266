//! Database repositories
//!
//! Every resource is reached through a trait so the storage engine can be
//! swapped: PostgreSQL implementations live next to each trait, and
//! [`memory::MemoryStore`] implements all of them in process.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

pub mod meal;
pub mod memory;
pub mod order;
pub mod review;
pub mod user;
pub mod vendor;

pub use meal::{MealChanges, MealRepository, NewMeal, PgMealRepository};
pub use memory::MemoryStore;
pub use order::{NewOrder, OrderChanges, OrderRepository, PgOrderRepository};
pub use review::{NewReview, PgReviewRepository, ReviewChanges, ReviewRepository};
pub use user::{NewUser, PgUserRepository, ProfileChanges, UserRepository};
pub use vendor::{NewVendor, PgVendorRepository, VendorChanges, VendorRepository};

/// Storage-layer failure
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique field already holds this value
    #[error("duplicate value for unique field `{0}`")]
    Duplicate(&'static str),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Map a unique-constraint violation onto [`StoreError::Duplicate`]
pub(crate) fn unique_violation(field: &'static str) -> impl Fn(sqlx::Error) -> StoreError {
    move |err| match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            StoreError::Duplicate(field)
        }
        _ => StoreError::Database(err),
    }
}

/// A stored resource with its creation and partial-update inputs
pub trait Document: Clone + Send + Sync + 'static {
    /// Fields supplied when creating a record
    type New: Send + 'static;
    /// Fields supplied for a partial update; `None` keeps the stored value
    type Changes: Send + 'static;

    /// Human-readable resource name
    const KIND: &'static str;

    fn id(&self) -> Uuid;

    /// Build the stored record from its creation input
    fn from_new(id: Uuid, new: Self::New, now: DateTime<Utc>) -> Self;

    /// Merge a partial update into the record
    fn apply(&mut self, changes: Self::Changes, now: DateTime<Utc>);

    /// Field that must be unique across records, with this record's value
    fn unique_key(&self) -> Option<(&'static str, String)> {
        None
    }
}

/// Generic create/find/update/delete contract shared by every resource
#[async_trait]
pub trait DocumentStore<D: Document>: Send + Sync {
    /// Every record, oldest first. An empty store yields an empty list.
    async fn list(&self) -> StoreResult<Vec<D>>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<D>>;

    async fn insert(&self, new: D::New) -> StoreResult<D>;

    /// Apply a partial update; `None` when no record has this id
    async fn update(&self, id: Uuid, changes: D::Changes) -> StoreResult<Option<D>>;

    /// Remove a record; `false` when no record has this id
    async fn delete(&self, id: Uuid) -> StoreResult<bool>;
}

/// All repositories the services need, behind trait objects
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub meals: Arc<dyn MealRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub vendors: Arc<dyn VendorRepository>,
}

impl Repositories {
    /// PostgreSQL-backed repositories sharing one pool
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            meals: Arc::new(PgMealRepository::new(pool.clone())),
            orders: Arc::new(PgOrderRepository::new(pool.clone())),
            reviews: Arc::new(PgReviewRepository::new(pool.clone())),
            vendors: Arc::new(PgVendorRepository::new(pool)),
        }
    }

    /// Process-local repositories for development and tests
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(MemoryStore::new()),
            meals: Arc::new(MemoryStore::new()),
            orders: Arc::new(MemoryStore::new()),
            reviews: Arc::new(MemoryStore::new()),
            vendors: Arc::new(MemoryStore::new()),
        }
    }
}
