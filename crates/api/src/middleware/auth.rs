//! Authentication middleware and extractors.
//!
//! The bearer token is verified exactly once per request, producing a typed
//! [`AuthUser`] rather than an untyped claim map. Handlers that need the
//! admin capability take [`RequireAdmin`] instead of re-checking role
//! strings.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use storekeeper_core::{Role, UserId};

use crate::error::AppError;
use crate::state::AppState;

/// Claims carried in a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID.
    pub sub: i32,
    pub email: String,
    pub username: String,
    pub role: Role,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Expiry, seconds since epoch.
    pub exp: i64,
}

impl Claims {
    /// Build claims for a freshly authenticated user.
    #[must_use]
    pub fn new(
        user_id: UserId,
        email: String,
        username: String,
        role: Role,
        ttl_hours: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id.as_i32(),
            email,
            username,
            role,
            iat: now.timestamp(),
            exp: (now + Duration::hours(ttl_hours)).timestamp(),
        }
    }
}

/// Sign claims into a compact token.
///
/// # Errors
///
/// Returns a `jsonwebtoken` error if signing fails.
pub fn issue_token(
    claims: &Claims,
    key: &EncodingKey,
) -> Result<String, jsonwebtoken::errors::Error> {
    jsonwebtoken::encode(&Header::default(), claims, key)
}

/// Verify a compact token and extract its claims (checks expiry).
///
/// # Errors
///
/// Returns a `jsonwebtoken` error if the token is invalid or expired.
pub fn decode_token(
    token: &str,
    key: &DecodingKey,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let data = jsonwebtoken::decode::<Claims>(token, key, &Validation::default())?;
    Ok(data.claims)
}

/// Extractor for an authenticated user.
///
/// Rejects with 401 if the `Authorization: Bearer` header is missing,
/// malformed, or carries an invalid/expired token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: UserId,
    pub email: String,
    pub role: Role,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: UserId::new(claims.sub),
            email: claims.email,
            role: claims.role,
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("missing authorization header".to_owned()))?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("invalid token format".to_owned()))?;

        let claims = decode_token(token, state.decoding_key())
            .map_err(|_| AppError::Unauthorized("invalid or expired token".to_owned()))?;

        Ok(claims.into())
    }
}

/// Extractor that additionally requires the admin role.
///
/// Rejects with 403 when the token is valid but the role is not admin.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        if !user.role.is_admin() {
            return Err(AppError::Forbidden("admin access required".to_owned()));
        }

        Ok(Self(user))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn keys() -> (EncodingKey, DecodingKey) {
        let secret = b"0123456789abcdef0123456789abcdef";
        (
            EncodingKey::from_secret(secret),
            DecodingKey::from_secret(secret),
        )
    }

    fn claims(role: Role, ttl_hours: i64) -> Claims {
        Claims::new(
            UserId::new(7),
            "user@example.com".to_owned(),
            "user".to_owned(),
            role,
            ttl_hours,
        )
    }

    #[test]
    fn test_token_roundtrip() {
        let (enc, dec) = keys();
        let token = issue_token(&claims(Role::Customer, 72), &enc).unwrap();

        let decoded = decode_token(&token, &dec).unwrap();
        assert_eq!(decoded.sub, 7);
        assert_eq!(decoded.email, "user@example.com");
        assert_eq!(decoded.role, Role::Customer);
    }

    #[test]
    fn test_expired_token_rejected() {
        let (enc, dec) = keys();
        // Expired two hours ago (ttl of -2 hours); beyond default leeway.
        let token = issue_token(&claims(Role::Customer, -2), &enc).unwrap();

        assert!(decode_token(&token, &dec).is_err());
    }

    #[test]
    fn test_wrong_key_rejected() {
        let (enc, _) = keys();
        let token = issue_token(&claims(Role::Admin, 72), &enc).unwrap();

        let other = DecodingKey::from_secret(b"another-secret-another-secret!!!");
        assert!(decode_token(&token, &other).is_err());
    }

    #[test]
    fn test_auth_user_from_claims() {
        let user = AuthUser::from(claims(Role::Admin, 1));
        assert_eq!(user.user_id, UserId::new(7));
        assert!(user.role.is_admin());
    }
}
