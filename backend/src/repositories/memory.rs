//! In-process storage
//!
//! Backs every repository trait with a `Vec` behind a `tokio` lock. Used
//! when `database.backend = "memory"` and by the test suite.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    Document, DocumentStore, MealRepository, OrderRepository, ReviewRepository, StoreError,
    StoreResult, UserRepository, VendorRepository,
};
use afrofood_shared::models::{Meal, Order, Review, User, Vendor};

/// Insertion-ordered collection of documents
pub struct MemoryStore<D> {
    documents: RwLock<Vec<D>>,
}

impl<D> Default for MemoryStore<D> {
    fn default() -> Self {
        Self {
            documents: RwLock::new(Vec::new()),
        }
    }
}

impl<D: Document> MemoryStore<D> {
    pub fn new() -> Self {
        Self::default()
    }

    async fn filter(&self, predicate: impl Fn(&D) -> bool) -> Vec<D> {
        self.documents
            .read()
            .await
            .iter()
            .filter(|doc| predicate(doc))
            .cloned()
            .collect()
    }

    async fn remove_where(&self, predicate: impl Fn(&D) -> bool) -> u64 {
        let mut documents = self.documents.write().await;
        let before = documents.len();
        documents.retain(|doc| !predicate(doc));
        (before - documents.len()) as u64
    }
}

#[async_trait]
impl<D: Document> DocumentStore<D> for MemoryStore<D> {
    async fn list(&self) -> StoreResult<Vec<D>> {
        Ok(self.documents.read().await.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<D>> {
        Ok(self
            .documents
            .read()
            .await
            .iter()
            .find(|doc| doc.id() == id)
            .cloned())
    }

    async fn insert(&self, new: D::New) -> StoreResult<D> {
        let document = D::from_new(Uuid::new_v4(), new, Utc::now());

        // Check and insert under one write lock so concurrent inserts of the
        // same unique value cannot both succeed
        let mut documents = self.documents.write().await;
        if let Some((field, value)) = document.unique_key() {
            let taken = documents
                .iter()
                .any(|doc| doc.unique_key().is_some_and(|(_, existing)| existing == value));
            if taken {
                return Err(StoreError::Duplicate(field));
            }
        }
        documents.push(document.clone());

        Ok(document)
    }

    async fn update(&self, id: Uuid, changes: D::Changes) -> StoreResult<Option<D>> {
        let mut documents = self.documents.write().await;
        Ok(documents.iter_mut().find(|doc| doc.id() == id).map(|doc| {
            doc.apply(changes, Utc::now());
            doc.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.remove_where(|doc| doc.id() == id).await > 0)
    }
}

#[async_trait]
impl UserRepository for MemoryStore<User> {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.filter(|user| user.email == email).await.into_iter().next())
    }

    async fn set_password(&self, id: Uuid, password_hash: String) -> StoreResult<Option<User>> {
        let mut users = self.documents.write().await;
        Ok(users.iter_mut().find(|user| user.id == id).map(|user| {
            user.password_hash = password_hash;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }
}

#[async_trait]
impl MealRepository for MemoryStore<Meal> {
    async fn find_by_category(&self, category: &str) -> StoreResult<Vec<Meal>> {
        Ok(self
            .filter(|meal| meal.category.as_deref() == Some(category))
            .await)
    }
}

#[async_trait]
impl OrderRepository for MemoryStore<Order> {
    async fn find_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Order>> {
        Ok(self.filter(|order| order.user_id == user_id).await)
    }

    async fn delete_by_user(&self, user_id: Uuid) -> StoreResult<u64> {
        Ok(self.remove_where(|order| order.user_id == user_id).await)
    }
}

#[async_trait]
impl ReviewRepository for MemoryStore<Review> {
    async fn find_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Review>> {
        Ok(self.filter(|review| review.user_id == Some(user_id)).await)
    }

    async fn find_many(&self, ids: &[Uuid]) -> StoreResult<Vec<Review>> {
        let reviews = self.documents.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| reviews.iter().find(|review| review.id == *id).cloned())
            .collect())
    }

    async fn delete_by_user(&self, user_id: Uuid) -> StoreResult<u64> {
        Ok(self
            .remove_where(|review| review.user_id == Some(user_id))
            .await)
    }
}

impl VendorRepository for MemoryStore<Vendor> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{MealChanges, NewMeal, NewReview, NewUser};
    use rust_decimal::Decimal;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: email.to_string(),
            phone_no: None,
            password_hash: "hash".to_string(),
            is_admin: false,
        }
    }

    fn new_meal(name: &str, category: Option<&str>) -> NewMeal {
        NewMeal {
            name: name.to_string(),
            description: None,
            price: Decimal::from(2500),
            category: category.map(str::to_string),
            count_in_stock: 10,
        }
    }

    #[tokio::test]
    async fn test_empty_store_lists_nothing() {
        let store = MemoryStore::<Meal>::new();
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryStore::<User>::new();
        store.insert(new_user("jane@example.com")).await.unwrap();

        let err = store.insert(new_user("jane@example.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate("email")));
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let store = MemoryStore::<Meal>::new();
        let meal = store.insert(new_meal("Jollof Rice", None)).await.unwrap();

        let updated = store
            .update(
                meal.id,
                MealChanges {
                    price: Some(Decimal::from(3000)),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.price, Decimal::from(3000));
        assert_eq!(updated.name, "Jollof Rice");

        assert!(store.delete(meal.id).await.unwrap());
        assert!(!store.delete(meal.id).await.unwrap());
        assert!(store.find_by_id(meal.id).await.unwrap().is_none());
        assert!(store
            .update(meal.id, MealChanges::default())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_find_by_category_is_exact() {
        let store = MemoryStore::<Meal>::new();
        store
            .insert(new_meal("Amala", Some("Big man Size")))
            .await
            .unwrap();
        store.insert(new_meal("Puff puff", Some("Snacks"))).await.unwrap();
        store.insert(new_meal("Water", None)).await.unwrap();

        let big = store.find_by_category("Big man Size").await.unwrap();
        assert_eq!(big.len(), 1);
        assert_eq!(big[0].name, "Amala");
        assert!(store.find_by_category("big man size").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_many_keeps_requested_order_and_skips_missing() {
        let store = MemoryStore::<Review>::new();
        let first = store
            .insert(NewReview {
                user_id: None,
                comments: None,
                ratings: 4.0,
            })
            .await
            .unwrap();
        let second = store
            .insert(NewReview {
                user_id: None,
                comments: Some("Lovely".to_string()),
                ratings: 5.0,
            })
            .await
            .unwrap();

        let found = store
            .find_many(&[second.id, Uuid::new_v4(), first.id])
            .await
            .unwrap();
        let ids: Vec<Uuid> = found.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }
}
