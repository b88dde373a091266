//! Meal service - menu management

use crate::error::{ApiError, ApiResult};
use crate::repositories::{MealChanges, NewMeal, Repositories};
use afrofood_shared::models::Meal;
use afrofood_shared::types::{CreateMealRequest, UpdateMealRequest};
use afrofood_shared::validation::{money, validate_price};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

/// Category served by the aggregate endpoint when none is given
pub const DEFAULT_MEAL_CATEGORY: &str = "Big man Size";

/// Meal service
pub struct MealService;

impl MealService {
    pub async fn list(repos: &Repositories) -> ApiResult<Vec<Meal>> {
        Ok(repos.meals.list().await?)
    }

    pub async fn get(repos: &Repositories, id: Uuid) -> ApiResult<Meal> {
        repos
            .meals
            .find_by_id(id)
            .await?
            .ok_or_else(ApiError::not_found::<Meal>)
    }

    /// Meals tagged with `category`, defaulting to [`DEFAULT_MEAL_CATEGORY`]
    pub async fn by_category(repos: &Repositories, category: Option<&str>) -> ApiResult<Vec<Meal>> {
        let category = category
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_MEAL_CATEGORY);
        Ok(repos.meals.find_by_category(category).await?)
    }

    pub async fn create(repos: &Repositories, req: CreateMealRequest) -> ApiResult<Meal> {
        req.validate()?;
        validate_price(req.price).map_err(ApiError::Validation)?;

        let meal = repos
            .meals
            .insert(NewMeal {
                name: req.name.trim().to_string(),
                description: req.description,
                price: money(req.price),
                category: req.category,
                count_in_stock: req.count_in_stock,
            })
            .await?;

        info!(meal_id = %meal.id, "Meal created");
        Ok(meal)
    }

    pub async fn update(repos: &Repositories, id: Uuid, req: UpdateMealRequest) -> ApiResult<Meal> {
        req.validate()?;
        if let Some(price) = req.price {
            validate_price(price).map_err(ApiError::Validation)?;
        }

        let changes = MealChanges {
            name: req.name.map(|n| n.trim().to_string()),
            description: req.description,
            price: req.price.map(money),
            category: req.category,
            count_in_stock: req.count_in_stock,
        };

        repos
            .meals
            .update(id, changes)
            .await?
            .ok_or_else(ApiError::not_found::<Meal>)
    }

    pub async fn delete(repos: &Repositories, id: Uuid) -> ApiResult<()> {
        if !repos.meals.delete(id).await? {
            return Err(ApiError::not_found::<Meal>());
        }
        info!(meal_id = %id, "Meal deleted");
        Ok(())
    }
}
