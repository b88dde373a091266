//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories, the password hasher and the token service.

pub mod account;
pub mod meals;
pub mod orders;
pub mod reviews;
pub mod seed;
pub mod vendors;

pub use account::{AccountKind, AccountService};
pub use meals::{MealService, DEFAULT_MEAL_CATEGORY};
pub use orders::OrderService;
pub use reviews::ReviewService;
pub use seed::SeedService;
pub use vendors::VendorService;
