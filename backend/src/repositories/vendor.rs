//! Vendor repository
//!
//! Meal and review references are stored as `uuid[]` columns and are not
//! foreign keys: a deleted meal or review leaves a dangling id behind.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{Document, DocumentStore, StoreResult};
use afrofood_shared::models::{GeoLocation, Vendor, VendorManager};

/// Vendor record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VendorRecord {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub phone_no: String,
    pub lat: f64,
    pub lon: f64,
    pub manager_name: String,
    pub manager_password_hash: String,
    pub verified: bool,
    pub meals: Vec<Uuid>,
    pub reviews: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<VendorRecord> for Vendor {
    fn from(record: VendorRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            address: record.address,
            phone_no: record.phone_no,
            location: GeoLocation {
                lat: record.lat,
                lon: record.lon,
            },
            manager: VendorManager {
                name: record.manager_name,
                password_hash: record.manager_password_hash,
            },
            verified: record.verified,
            meals: record.meals,
            reviews: record.reviews,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Input for creating a vendor; the manager password is already hashed
#[derive(Debug, Clone)]
pub struct NewVendor {
    pub name: String,
    pub address: String,
    pub phone_no: String,
    pub location: GeoLocation,
    pub manager: VendorManager,
    pub verified: bool,
    pub meals: Vec<Uuid>,
    pub reviews: Vec<Uuid>,
}

/// Input for updating a vendor
#[derive(Debug, Clone, Default)]
pub struct VendorChanges {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone_no: Option<String>,
    pub location: Option<GeoLocation>,
    pub manager_name: Option<String>,
    pub manager_password_hash: Option<String>,
    pub verified: Option<bool>,
    pub meals: Option<Vec<Uuid>>,
    pub reviews: Option<Vec<Uuid>>,
}

impl Document for Vendor {
    type New = NewVendor;
    type Changes = VendorChanges;

    const KIND: &'static str = "Vendor";

    fn id(&self) -> Uuid {
        self.id
    }

    fn from_new(id: Uuid, new: NewVendor, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new.name,
            address: new.address,
            phone_no: new.phone_no,
            location: new.location,
            manager: new.manager,
            verified: new.verified,
            meals: new.meals,
            reviews: new.reviews,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, changes: VendorChanges, now: DateTime<Utc>) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(address) = changes.address {
            self.address = address;
        }
        if let Some(phone_no) = changes.phone_no {
            self.phone_no = phone_no;
        }
        if let Some(location) = changes.location {
            self.location = location;
        }
        if let Some(manager_name) = changes.manager_name {
            self.manager.name = manager_name;
        }
        if let Some(hash) = changes.manager_password_hash {
            self.manager.password_hash = hash;
        }
        if let Some(verified) = changes.verified {
            self.verified = verified;
        }
        if let Some(meals) = changes.meals {
            self.meals = meals;
        }
        if let Some(reviews) = changes.reviews {
            self.reviews = reviews;
        }
        self.updated_at = now;
    }
}

/// Vendor storage
pub trait VendorRepository: DocumentStore<Vendor> {}

/// PostgreSQL vendor storage
pub struct PgVendorRepository {
    pool: PgPool,
}

impl PgVendorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore<Vendor> for PgVendorRepository {
    async fn list(&self) -> StoreResult<Vec<Vendor>> {
        let records = sqlx::query_as::<_, VendorRecord>(
            r#"
            SELECT id, name, address, phone_no, lat, lon, manager_name, manager_password_hash,
                   verified, meals, reviews, created_at, updated_at
            FROM vendors
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(Vendor::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Vendor>> {
        let record = sqlx::query_as::<_, VendorRecord>(
            r#"
            SELECT id, name, address, phone_no, lat, lon, manager_name, manager_password_hash,
                   verified, meals, reviews, created_at, updated_at
            FROM vendors
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Vendor::from))
    }

    async fn insert(&self, new: NewVendor) -> StoreResult<Vendor> {
        let record = sqlx::query_as::<_, VendorRecord>(
            r#"
            INSERT INTO vendors (
                id, name, address, phone_no, lat, lon, manager_name, manager_password_hash,
                verified, meals, reviews
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id, name, address, phone_no, lat, lon, manager_name, manager_password_hash,
                      verified, meals, reviews, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.name)
        .bind(&new.address)
        .bind(&new.phone_no)
        .bind(new.location.lat)
        .bind(new.location.lon)
        .bind(&new.manager.name)
        .bind(&new.manager.password_hash)
        .bind(new.verified)
        .bind(&new.meals)
        .bind(&new.reviews)
        .fetch_one(&self.pool)
        .await?;

        Ok(record.into())
    }

    async fn update(&self, id: Uuid, changes: VendorChanges) -> StoreResult<Option<Vendor>> {
        let record = sqlx::query_as::<_, VendorRecord>(
            r#"
            UPDATE vendors
            SET name = COALESCE($2, name),
                address = COALESCE($3, address),
                phone_no = COALESCE($4, phone_no),
                lat = COALESCE($5, lat),
                lon = COALESCE($6, lon),
                manager_name = COALESCE($7, manager_name),
                manager_password_hash = COALESCE($8, manager_password_hash),
                verified = COALESCE($9, verified),
                meals = COALESCE($10, meals),
                reviews = COALESCE($11, reviews),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, address, phone_no, lat, lon, manager_name, manager_password_hash,
                      verified, meals, reviews, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.address)
        .bind(&changes.phone_no)
        .bind(changes.location.map(|l| l.lat))
        .bind(changes.location.map(|l| l.lon))
        .bind(&changes.manager_name)
        .bind(&changes.manager_password_hash)
        .bind(changes.verified)
        .bind(&changes.meals)
        .bind(&changes.reviews)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Vendor::from))
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM vendors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl VendorRepository for PgVendorRepository {}
