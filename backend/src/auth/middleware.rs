//! Authentication middleware
//!
//! One policy-parameterized gate serves both route groups (via
//! [`require`] as a layer) and individual handlers (via the
//! [`Authenticated`] extractor). Either way the bearer token is verified,
//! the principal is loaded exactly once per request and stored in the
//! request extensions, and the [`AccessPolicy`] decides whether the
//! principal may proceed.

use crate::error::ApiError;
use crate::state::AppState;
use afrofood_shared::errors::AuthError;
use afrofood_shared::models::UserProfile;
use axum::{
    extract::{FromRef, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::marker::PhantomData;
use tracing::debug;
use uuid::Uuid;

/// The authenticated account acting on a request (password never present)
#[derive(Debug, Clone, PartialEq)]
pub struct Principal {
    pub profile: UserProfile,
}

impl Principal {
    #[inline]
    pub fn id(&self) -> Uuid {
        self.profile.id
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.profile.is_admin
    }

    /// Owners and admins may act on a record owned by `owner`
    pub fn ensure_can_act_for(&self, owner: Option<Uuid>) -> Result<(), ApiError> {
        if self.is_admin() || owner == Some(self.id()) {
            Ok(())
        } else {
            Err(AuthError::Forbidden.into())
        }
    }
}

/// Decides whether an authenticated principal may reach a route
pub trait AccessPolicy: Send + Sync + 'static {
    /// Label used in logs and metrics
    const NAME: &'static str;

    fn permits(principal: &Principal) -> bool;
}

/// Any authenticated account
pub struct AnyAccount;

impl AccessPolicy for AnyAccount {
    const NAME: &'static str = "authenticated";

    fn permits(_: &Principal) -> bool {
        true
    }
}

/// Accounts with the admin flag set
pub struct AdminOnly;

impl AccessPolicy for AdminOnly {
    const NAME: &'static str = "admin";

    fn permits(principal: &Principal) -> bool {
        principal.is_admin()
    }
}

/// Read the bearer token out of the `Authorization` header
fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingToken)
}

fn reject(reason: &'static str, error: AuthError) -> ApiError {
    metrics::counter!("afrofood_auth_rejections_total", "reason" => reason).increment(1);
    error.into()
}

/// Verify the bearer token and load the principal it names
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Principal, ApiError> {
    let token = bearer_token(headers).map_err(|e| reject("missing_token", e))?;

    let user_id = state.jwt().verify(token).map_err(|e| {
        debug!(error = %e, "Rejected bearer token");
        reject("invalid_token", e.into())
    })?;

    let user = state
        .repos()
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| reject("unknown_principal", AuthError::UnknownPrincipal))?;

    Ok(Principal {
        profile: user.into(),
    })
}

/// Apply a policy to an authenticated principal
pub fn enforce<P: AccessPolicy>(principal: &Principal) -> Result<(), ApiError> {
    if P::permits(principal) {
        Ok(())
    } else {
        debug!(user_id = %principal.id(), policy = P::NAME, "Principal lacks required role");
        Err(reject("forbidden", AuthError::Forbidden))
    }
}

/// Middleware for a group of routes
///
/// ```ignore
/// Router::new()
///     .route("/", get(list))
///     .route_layer(middleware::from_fn_with_state(state, require::<AnyAccount>))
/// ```
pub async fn require<P: AccessPolicy>(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let principal = authenticate(&state, request.headers()).await?;
    enforce::<P>(&principal)?;
    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

/// Extractor that authenticates the caller and checks policy `P`
///
/// Reuses a principal already resolved by [`require`] so the account is
/// never loaded twice for one request.
pub struct Authenticated<P: AccessPolicy = AnyAccount> {
    pub principal: Principal,
    _policy: PhantomData<fn() -> P>,
}

/// Any authenticated account
pub type AuthUser = Authenticated<AnyAccount>;

/// An authenticated admin
pub type AdminUser = Authenticated<AdminOnly>;

impl<P: AccessPolicy> std::ops::Deref for Authenticated<P> {
    type Target = Principal;

    fn deref(&self) -> &Principal {
        &self.principal
    }
}

#[axum::async_trait]
impl<S, P> axum::extract::FromRequestParts<S> for Authenticated<P>
where
    AppState: FromRef<S>,
    S: Send + Sync,
    P: AccessPolicy,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let principal = match parts.extensions.get::<Principal>() {
            Some(principal) => principal.clone(),
            None => {
                let app_state = AppState::from_ref(state);
                let principal = authenticate(&app_state, &parts.headers).await?;
                parts.extensions.insert(principal.clone());
                principal
            }
        };

        enforce::<P>(&principal)?;

        Ok(Self {
            principal,
            _policy: PhantomData,
        })
    }
}
