//! Data models for the AfroFood ordering platform
//!
//! These are the stored shapes of every resource. Secrets (account and
//! manager password hashes) are never serialized.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default phone number recorded for vendors that do not supply one
pub const DEFAULT_VENDOR_PHONE: &str = "+234 000 000 000";

/// User account (regular customer or admin)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_no: Option<String>,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub is_admin: bool,
    pub profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public projection of a user, safe to return to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_no: Option<String>,
    pub is_admin: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            phone_no: user.phone_no,
            is_admin: user.is_admin,
            profile_picture: user.profile_picture,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// A purchasable menu item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Meal {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category: Option<String>,
    pub count_in_stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The single line item embedded in an order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    #[serde(alias = "meal")]
    pub meal_id: Uuid,
    pub name: String,
    pub quantity: i32,
    /// Unit price at the time of ordering
    pub price: Decimal,
    #[serde(default)]
    pub image: Option<String>,
}

impl OrderItem {
    /// Price of the line: quantity times unit price
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.price
    }
}

/// Delivery address embedded in an order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShippingAddress {
    pub address: String,
    pub city: String,
    pub postal_code: String,
}

/// Result reported by the payment provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentResult {
    /// Provider-side transaction id
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub update_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub email_address: Option<String>,
}

/// A purchase transaction owned by a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub order_item: OrderItem,
    pub order_date: DateTime<Utc>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    pub payment_result: Option<PaymentResult>,
    pub tax_price: Decimal,
    pub shipping_price: Decimal,
    pub total_price: Decimal,
    pub is_paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub is_delivered: bool,
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Items plus tax plus shipping
    pub fn expected_total(&self) -> Decimal {
        self.order_item.line_total() + self.tax_price + self.shipping_price
    }
}

/// A rating left by a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub comments: Option<String>,
    pub ratings: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Geographic position of a vendor
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct GeoLocation {
    pub lat: f64,
    pub lon: f64,
}

/// Credential of the person managing a vendor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VendorManager {
    pub name: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
}

/// A food outlet
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vendor {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub phone_no: String,
    pub location: GeoLocation,
    pub manager: VendorManager,
    pub verified: bool,
    pub meals: Vec<Uuid>,
    pub reviews: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vendor {
    /// Replace review references with the resolved review documents
    pub fn with_reviews(self, reviews: Vec<Review>) -> VendorDetail {
        VendorDetail {
            id: self.id,
            name: self.name,
            address: self.address,
            phone_no: self.phone_no,
            location: self.location,
            manager: self.manager,
            verified: self.verified,
            meals: self.meals,
            reviews,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Vendor with its reviews populated
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VendorDetail {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub phone_no: String,
    pub location: GeoLocation,
    pub manager: VendorManager,
    pub verified: bool,
    pub meals: Vec<Uuid>,
    pub reviews: Vec<Review>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
