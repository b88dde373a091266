//! Account service for registration, login and profile management
//!
//! Users and admins share one account model; [`AccountKind`] decides
//! which login endpoint an account may use and whether registration sets
//! the admin flag.
//!
//! Password hashing and verification run on the blocking thread pool.

use crate::auth::{PasswordService, Principal};
use crate::error::{ApiError, ApiResult};
use crate::repositories::{NewUser, ProfileChanges};
use crate::state::AppState;
use afrofood_shared::models::{User, UserProfile};
use afrofood_shared::types::{
    AccountResponse, ChangePasswordRequest, LoginRequest, RegisterRequest, UpdateProfileRequest,
};
use afrofood_shared::validation::{normalize_email, validate_email, validate_phone};
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

/// Which account surface a request came through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    User,
    Admin,
}

impl AccountKind {
    #[inline]
    pub fn is_admin(self) -> bool {
        matches!(self, AccountKind::Admin)
    }

    /// Metric/log label
    pub fn label(self) -> &'static str {
        match self {
            AccountKind::User => "user",
            AccountKind::Admin => "admin",
        }
    }
}

/// Account service
pub struct AccountService;

impl AccountService {
    /// Register a new account and issue its first token
    pub async fn register(
        state: &AppState,
        kind: AccountKind,
        req: RegisterRequest,
    ) -> ApiResult<AccountResponse> {
        if kind.is_admin() && !state.config().security.allow_admin_registration {
            return Err(ApiError::Forbidden(
                "Admin registration is disabled".to_string(),
            ));
        }

        req.validate()?;
        if let Some(phone) = req.phone_no.as_deref() {
            validate_phone(phone).map_err(ApiError::Validation)?;
        }

        let email = normalize_email(&req.email);
        validate_email(&email).map_err(ApiError::Validation)?;
        let users = &state.repos().users;

        if users.find_by_email(&email).await?.is_some() {
            return Err(ApiError::Conflict("Email already registered".to_string()));
        }

        let password_hash = state.passwords().hash_async(req.password).await?;

        // The unique index still guards against a concurrent registration
        let user = users
            .insert(NewUser {
                first_name: req.first_name.trim().to_string(),
                last_name: req.last_name.trim().to_string(),
                email,
                phone_no: req.phone_no,
                password_hash,
                is_admin: kind.is_admin(),
            })
            .await?;

        metrics::counter!("afrofood_accounts_registered_total", "kind" => kind.label())
            .increment(1);
        info!(user_id = %user.id, kind = kind.label(), "Account registered");

        Self::respond(state, user)
    }

    /// Authenticate with email and password
    ///
    /// Fails with `NotFound` for an unknown email, `Forbidden` when the
    /// account belongs to the other surface, `InvalidCredentials` when the
    /// password does not verify.
    pub async fn login(
        state: &AppState,
        kind: AccountKind,
        req: LoginRequest,
    ) -> ApiResult<AccountResponse> {
        req.validate()?;

        let email = normalize_email(&req.email);
        let user = state
            .repos()
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| ApiError::NotFound("No account with this email".to_string()))?;

        if user.is_admin != kind.is_admin() {
            Self::count_login(kind, "wrong_surface");
            let message = if kind.is_admin() {
                "This account is not an admin"
            } else {
                "Admins must use the admin login"
            };
            return Err(ApiError::Forbidden(message.to_string()));
        }

        let valid = PasswordService::verify_async(req.password, user.password_hash.clone()).await?;
        if !valid {
            Self::count_login(kind, "invalid_credentials");
            debug!(user_id = %user.id, "Password did not verify");
            return Err(ApiError::InvalidCredentials);
        }

        Self::count_login(kind, "success");
        info!(user_id = %user.id, kind = kind.label(), "Account logged in");

        Self::respond(state, user)
    }

    /// Replace the caller's password after checking the old one
    pub async fn change_password(
        state: &AppState,
        principal: &Principal,
        req: ChangePasswordRequest,
    ) -> ApiResult<AccountResponse> {
        req.validate()?;

        let users = &state.repos().users;
        let user = users
            .find_by_id(principal.id())
            .await?
            .ok_or_else(ApiError::not_found::<User>)?;

        let valid = PasswordService::verify_async(req.old_password, user.password_hash).await?;
        if !valid {
            return Err(ApiError::InvalidCredentials);
        }

        let password_hash = state.passwords().hash_async(req.new_password).await?;
        let user = users
            .set_password(principal.id(), password_hash)
            .await?
            .ok_or_else(ApiError::not_found::<User>)?;

        info!(user_id = %user.id, "Password changed");

        Self::respond(state, user)
    }

    /// Apply a partial profile update. Email and password are untouched.
    pub async fn update_profile(
        state: &AppState,
        principal: &Principal,
        req: UpdateProfileRequest,
    ) -> ApiResult<AccountResponse> {
        req.validate()?;
        if let Some(phone) = req.phone_no.as_deref() {
            validate_phone(phone).map_err(ApiError::Validation)?;
        }

        let changes = ProfileChanges {
            first_name: req.first_name.map(|s| s.trim().to_string()),
            last_name: req.last_name.map(|s| s.trim().to_string()),
            phone_no: req.phone_no,
            profile_picture: req.profile_picture,
        };

        let user = state
            .repos()
            .users
            .update(principal.id(), changes)
            .await?
            .ok_or_else(ApiError::not_found::<User>)?;

        Self::respond(state, user)
    }

    /// Remove the caller's account together with their orders and reviews
    pub async fn delete_account(state: &AppState, principal: &Principal) -> ApiResult<()> {
        let repos = state.repos();
        let user_id = principal.id();

        let orders = repos.orders.delete_by_user(user_id).await?;
        let reviews = repos.reviews.delete_by_user(user_id).await?;

        if !repos.users.delete(user_id).await? {
            return Err(ApiError::not_found::<User>());
        }

        info!(%user_id, orders, reviews, "Account deleted");
        Ok(())
    }

    /// Stored profile of any account
    pub async fn get_profile(state: &AppState, user_id: Uuid) -> ApiResult<UserProfile> {
        state
            .repos()
            .users
            .find_by_id(user_id)
            .await?
            .map(UserProfile::from)
            .ok_or_else(ApiError::not_found::<User>)
    }

    fn respond(state: &AppState, user: User) -> ApiResult<AccountResponse> {
        let token = state.jwt().issue(user.id)?;
        Ok(AccountResponse {
            profile: user.into(),
            token,
        })
    }

    fn count_login(kind: AccountKind, outcome: &'static str) {
        metrics::counter!(
            "afrofood_logins_total",
            "kind" => kind.label(),
            "outcome" => outcome
        )
        .increment(1);
    }
}
