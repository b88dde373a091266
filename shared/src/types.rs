//! API request and response types
//!
//! Every request body has an explicit schema. Required text fields
//! default to empty so that an absent field and a blank one fail the
//! same validation rule instead of a deserialization error.

use crate::models::{GeoLocation, OrderItem, PaymentResult, ShippingAddress, UserProfile};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

// ============================================================================
// Account Types
// ============================================================================

/// Registration request (users and admins)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default, alias = "firstname")]
    #[validate(length(min = 1, message = "first_name is required"))]
    pub first_name: String,
    #[serde(default, alias = "lastname")]
    #[validate(length(min = 1, message = "last_name is required"))]
    pub last_name: String,
    /// Format is checked after trimming and lower-casing
    #[serde(default)]
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    #[serde(default)]
    pub phone_no: Option<String>,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Password change request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "old_password is required"))]
    pub old_password: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "new_password is required"))]
    pub new_password: String,
}

/// Partial profile update. Email and password are not mutable here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[serde(default, alias = "firstname")]
    #[validate(length(min = 1, message = "first_name cannot be blank"))]
    pub first_name: Option<String>,
    #[serde(default, alias = "lastname")]
    #[validate(length(min = 1, message = "last_name cannot be blank"))]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone_no: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
}

/// Public profile plus a freshly issued bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResponse {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub token: String,
}

// ============================================================================
// Meal Types
// ============================================================================

/// Create meal request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateMealRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0, message = "count_in_stock cannot be negative"))]
    pub count_in_stock: i32,
}

/// Partial meal update
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateMealRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "name cannot be blank"))]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0, message = "count_in_stock cannot be negative"))]
    pub count_in_stock: Option<i32>,
}

/// Category filter for meals
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MealCategoryQuery {
    pub category: Option<String>,
}

// ============================================================================
// Order Types
// ============================================================================

/// Create order request. The owner is the authenticated caller.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateOrderRequest {
    pub order_item: OrderItem,
    #[serde(default)]
    pub order_date: Option<DateTime<Utc>>,
    pub shipping_address: ShippingAddress,
    #[serde(default)]
    #[validate(length(min = 1, message = "payment_method is required"))]
    pub payment_method: String,
    #[serde(default)]
    pub payment_result: Option<PaymentResult>,
    #[serde(default)]
    pub tax_price: Decimal,
    #[serde(default)]
    pub shipping_price: Decimal,
    #[serde(default)]
    pub total_price: Option<Decimal>,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_delivered: bool,
    #[serde(default)]
    pub delivered_at: Option<DateTime<Utc>>,
}

/// Partial order update
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateOrderRequest {
    #[serde(default)]
    pub order_item: Option<OrderItem>,
    #[serde(default)]
    pub order_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
    #[serde(default)]
    #[validate(length(min = 1, message = "payment_method cannot be blank"))]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub payment_result: Option<PaymentResult>,
    #[serde(default)]
    pub tax_price: Option<Decimal>,
    #[serde(default)]
    pub shipping_price: Option<Decimal>,
    #[serde(default)]
    pub total_price: Option<Decimal>,
    #[serde(default)]
    pub is_paid: Option<bool>,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_delivered: Option<bool>,
    #[serde(default)]
    pub delivered_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Review Types
// ============================================================================

/// Create review request. The author is the authenticated caller.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateReviewRequest {
    #[serde(default, alias = "comment")]
    pub comments: Option<String>,
    #[serde(alias = "rating")]
    #[validate(range(min = 0.0, max = 5.0, message = "ratings must be between 0 and 5"))]
    pub ratings: f64,
}

/// Partial review update
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateReviewRequest {
    #[serde(default, alias = "comment")]
    pub comments: Option<String>,
    #[serde(default, alias = "rating")]
    #[validate(range(min = 0.0, max = 5.0, message = "ratings must be between 0 and 5"))]
    pub ratings: Option<f64>,
}

// ============================================================================
// Vendor Types
// ============================================================================

/// Manager credential as submitted by clients (plaintext password)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagerInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub password: String,
}

/// Partial manager credential update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManagerUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Create vendor request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateVendorRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "address is required"))]
    pub address: String,
    #[serde(default)]
    pub phone_no: Option<String>,
    #[serde(default)]
    pub location: GeoLocation,
    pub manager: ManagerInput,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub meals: Vec<Uuid>,
    #[serde(default, alias = "review")]
    pub reviews: Vec<Uuid>,
}

/// Partial vendor update
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateVendorRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "name cannot be blank"))]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "address cannot be blank"))]
    pub address: Option<String>,
    #[serde(default)]
    pub phone_no: Option<String>,
    #[serde(default)]
    pub location: Option<GeoLocation>,
    #[serde(default)]
    pub manager: Option<ManagerUpdate>,
    #[serde(default)]
    pub verified: Option<bool>,
    #[serde(default)]
    pub meals: Option<Vec<Uuid>>,
    #[serde(default, alias = "review")]
    pub reviews: Option<Vec<Uuid>>,
}

// ============================================================================
// Seeding
// ============================================================================

/// Number of sample records inserted by a seed run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedSummary {
    pub meals: usize,
    pub reviews: usize,
    pub vendors: usize,
}
