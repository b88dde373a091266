//! User repository for database operations

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{unique_violation, Document, DocumentStore, StoreResult};
use afrofood_shared::models::User;

/// User record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_no: Option<String>,
    pub password_hash: String,
    pub is_admin: bool,
    pub profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            first_name: record.first_name,
            last_name: record.last_name,
            email: record.email,
            phone_no: record.phone_no,
            password_hash: record.password_hash,
            is_admin: record.is_admin,
            profile_picture: record.profile_picture,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Input for creating an account; the email is already normalized
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_no: Option<String>,
    pub password_hash: String,
    pub is_admin: bool,
}

/// Input for updating profile fields
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_no: Option<String>,
    pub profile_picture: Option<String>,
}

impl Document for User {
    type New = NewUser;
    type Changes = ProfileChanges;

    const KIND: &'static str = "User";

    fn id(&self) -> Uuid {
        self.id
    }

    fn from_new(id: Uuid, new: NewUser, now: DateTime<Utc>) -> Self {
        Self {
            id,
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
            phone_no: new.phone_no,
            password_hash: new.password_hash,
            is_admin: new.is_admin,
            profile_picture: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, changes: ProfileChanges, now: DateTime<Utc>) {
        if let Some(first_name) = changes.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name {
            self.last_name = last_name;
        }
        if let Some(phone_no) = changes.phone_no {
            self.phone_no = Some(phone_no);
        }
        if let Some(profile_picture) = changes.profile_picture {
            self.profile_picture = Some(profile_picture);
        }
        self.updated_at = now;
    }

    fn unique_key(&self) -> Option<(&'static str, String)> {
        Some(("email", self.email.clone()))
    }
}

/// Account storage
#[async_trait]
pub trait UserRepository: DocumentStore<User> {
    /// Exact match on the stored (normalized) email
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Replace the password hash; `None` when no account has this id
    async fn set_password(&self, id: Uuid, password_hash: String) -> StoreResult<Option<User>>;
}

/// PostgreSQL account storage
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore<User> for PgUserRepository {
    async fn list(&self) -> StoreResult<Vec<User>> {
        let records = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, first_name, last_name, email, phone_no, password_hash,
                   is_admin, profile_picture, created_at, updated_at
            FROM users
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(User::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, first_name, last_name, email, phone_no, password_hash,
                   is_admin, profile_picture, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(User::from))
    }

    async fn insert(&self, new: NewUser) -> StoreResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (id, first_name, last_name, email, phone_no, password_hash, is_admin)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, first_name, last_name, email, phone_no, password_hash,
                      is_admin, profile_picture, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.email)
        .bind(&new.phone_no)
        .bind(&new.password_hash)
        .bind(new.is_admin)
        .fetch_one(&self.pool)
        .await
        .map_err(unique_violation("email"))?;

        Ok(record.into())
    }

    async fn update(&self, id: Uuid, changes: ProfileChanges) -> StoreResult<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            UPDATE users
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                phone_no = COALESCE($4, phone_no),
                profile_picture = COALESCE($5, profile_picture),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, first_name, last_name, email, phone_no, password_hash,
                      is_admin, profile_picture, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&changes.first_name)
        .bind(&changes.last_name)
        .bind(&changes.phone_no)
        .bind(&changes.profile_picture)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(User::from))
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, first_name, last_name, email, phone_no, password_hash,
                   is_admin, profile_picture, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(User::from))
    }

    async fn set_password(&self, id: Uuid, password_hash: String) -> StoreResult<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            UPDATE users
            SET password_hash = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, first_name, last_name, email, phone_no, password_hash,
                      is_admin, profile_picture, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(User::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User::from_new(
            Uuid::new_v4(),
            NewUser {
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                email: "jane@example.com".to_string(),
                phone_no: None,
                password_hash: "$2b$10$hash".to_string(),
                is_admin: false,
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_apply_keeps_absent_fields() {
        let mut user = user();
        user.apply(
            ProfileChanges {
                phone_no: Some("08012345678".to_string()),
                ..Default::default()
            },
            Utc::now(),
        );

        assert_eq!(user.first_name, "Jane");
        assert_eq!(user.last_name, "Doe");
        assert_eq!(user.phone_no.as_deref(), Some("08012345678"));
    }

    #[test]
    fn test_email_is_unique_key() {
        assert_eq!(
            user().unique_key(),
            Some(("email", "jane@example.com".to_string()))
        );
    }
}
