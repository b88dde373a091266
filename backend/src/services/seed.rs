//! Sample catalogue for fresh deployments
//!
//! Inserts a small menu, a handful of reviews authored by the calling
//! admin, and one vendor that offers the menu and carries the reviews.

use crate::auth::{PasswordService, Principal};
use crate::error::ApiResult;
use crate::repositories::{NewMeal, NewReview, NewVendor, Repositories};
use afrofood_shared::models::{GeoLocation, VendorManager, DEFAULT_VENDOR_PHONE};
use afrofood_shared::types::SeedSummary;
use afrofood_shared::validation::MONEY_SCALE;
use rust_decimal::Decimal;
use tracing::info;

const SAMPLE_DESCRIPTION: &str =
    "Lorem ipsum dolor sit amet consectetur adipisicing elit. Iure nam possimus vel, non voluptates ipsum.";

/// (name, price in kobo, category, count in stock)
const SAMPLE_MEALS: [(&str, i64, &str, i32); 5] = [
    ("Fried Rice with Chicken", 45099, "Big man Size", 5),
    ("Fried Rice with Beef", 35000, "Big man Size", 2),
    ("Jollof Spaghetti with Chicken", 40000, "Big man Size", 1),
    ("Rice and Beans", 20050, "Hungry man Size", 8),
    ("Bucket Chicken", 500000, "Family Size", 10),
];

/// (comment, rating)
const SAMPLE_REVIEWS: [(&str, f64); 3] = [
    (
        "This Store is one of the best in town, really awesome delivery time!!",
        4.5,
    ),
    ("This Store is sophisticated, but can do more", 3.0),
    ("This Store is terribly aweful", 0.5),
];

const SAMPLE_MANAGER_PASSWORD: &str = "1234";

/// Seeding service
pub struct SeedService;

impl SeedService {
    /// Insert the sample catalogue. Running it twice inserts it twice.
    pub async fn seed(
        repos: &Repositories,
        passwords: &PasswordService,
        admin: &Principal,
    ) -> ApiResult<SeedSummary> {
        let mut meal_ids = Vec::with_capacity(SAMPLE_MEALS.len());
        for (name, price, category, count_in_stock) in SAMPLE_MEALS {
            let meal = repos
                .meals
                .insert(NewMeal {
                    name: name.to_string(),
                    description: Some(SAMPLE_DESCRIPTION.to_string()),
                    price: Decimal::new(price, MONEY_SCALE),
                    category: Some(category.to_string()),
                    count_in_stock,
                })
                .await?;
            meal_ids.push(meal.id);
        }

        let mut review_ids = Vec::with_capacity(SAMPLE_REVIEWS.len());
        for (comments, ratings) in SAMPLE_REVIEWS {
            let review = repos
                .reviews
                .insert(NewReview {
                    user_id: Some(admin.id()),
                    comments: Some(comments.to_string()),
                    ratings,
                })
                .await?;
            review_ids.push(review.id);
        }

        let password_hash = passwords
            .hash_async(SAMPLE_MANAGER_PASSWORD.to_string())
            .await?;
        repos
            .vendors
            .insert(NewVendor {
                name: "Mr Biggs".to_string(),
                address: "Tsaunin Kura 800104, Kaduna".to_string(),
                phone_no: DEFAULT_VENDOR_PHONE.to_string(),
                location: GeoLocation {
                    lat: 10.453562073934537,
                    lon: 7.46469406110017,
                },
                manager: VendorManager {
                    name: "Mr Biggs Manager".to_string(),
                    password_hash,
                },
                verified: false,
                meals: meal_ids.clone(),
                reviews: review_ids.clone(),
            })
            .await?;

        let summary = SeedSummary {
            meals: meal_ids.len(),
            reviews: review_ids.len(),
            vendors: 1,
        };
        info!(
            admin_id = %admin.id(),
            meals = summary.meals,
            reviews = summary.reviews,
            vendors = summary.vendors,
            "Sample catalogue seeded"
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::VendorService;
    use afrofood_shared::models::UserProfile;
    use chrono::Utc;
    use uuid::Uuid;

    fn admin() -> Principal {
        let now = Utc::now();
        Principal {
            profile: UserProfile {
                id: Uuid::new_v4(),
                first_name: "Site".to_string(),
                last_name: "Admin".to_string(),
                email: "admin@example.com".to_string(),
                phone_no: None,
                is_admin: true,
                profile_picture: None,
                created_at: now,
                updated_at: now,
            },
        }
    }

    #[tokio::test]
    async fn test_seed_inserts_linked_catalogue() {
        let repos = Repositories::in_memory();
        let admin = admin();

        let summary = SeedService::seed(&repos, &PasswordService::new(4), &admin)
            .await
            .unwrap();
        assert_eq!(
            summary,
            SeedSummary {
                meals: 5,
                reviews: 3,
                vendors: 1
            }
        );

        let vendors = repos.vendors.list().await.unwrap();
        let detail = VendorService::get_with_reviews(&repos, vendors[0].id)
            .await
            .unwrap();
        assert_eq!(detail.meals.len(), 5);
        assert_eq!(detail.reviews.len(), 3);
        assert!(detail
            .reviews
            .iter()
            .all(|review| review.user_id == Some(admin.id())));
        assert!(PasswordService::verify("1234", &detail.manager.password_hash).unwrap());
        assert_eq!(repos.meals.find_by_category("Big man Size").await.unwrap().len(), 3);
    }
}
