//! Error types shared between the backend and its clients

use thiserror::Error;

/// Reasons a bearer token can be rejected
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("Invalid token")]
    Invalid,

    #[error("Token expired")]
    Expired,
}

/// Authentication error types, in the order the auth layer checks them
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Unauthorized, no token")]
    MissingToken,

    #[error("Unauthorized, invalid token")]
    InvalidToken,

    #[error("Unauthorized")]
    UnknownPrincipal,

    #[error("Forbidden")]
    Forbidden,
}

impl From<TokenError> for AuthError {
    fn from(_: TokenError) -> Self {
        AuthError::InvalidToken
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_messages_are_short() {
        assert_eq!(AuthError::MissingToken.to_string(), "Unauthorized, no token");
        assert_eq!(AuthError::InvalidToken.to_string(), "Unauthorized, invalid token");
        assert_eq!(AuthError::UnknownPrincipal.to_string(), "Unauthorized");
    }

    #[test]
    fn test_expired_token_maps_to_invalid_token() {
        assert_eq!(AuthError::from(TokenError::Expired), AuthError::InvalidToken);
    }
}
