//! Authentication module
//!
//! Provides JWT bearer tokens, bcrypt password hashing and the
//! role-aware request gate.

mod jwt;
mod middleware;
mod password;

pub use jwt::{Claims, JwtService};
pub use middleware::{
    authenticate, enforce, require, AccessPolicy, AdminOnly, AdminUser, AnyAccount,
    AuthUser, Authenticated, Principal,
};
pub use password::PasswordService;
