//! JWT token creation and validation
//!
//! Tokens are HS256-signed. Issuing is only used by tests and operator
//! tooling; production tokens come from the identity provider sharing the
//! secret.

use crate::claims::Claims;
use campustrip_core::error::AppError;
use campustrip_core::models::UserRole;
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::{debug, error, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct JwtService {
    /// Default token lifetime in seconds
    expiration_secs: i64,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(secret: &str, expiration_secs: i64) -> Self {
        Self {
            expiration_secs,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Sign `claims`, stamping the default expiry when none is set
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidToken` if encoding fails
    pub fn create_token(&self, claims: &Claims) -> Result<String, AppError> {
        let mut token_claims = claims.clone();
        if token_claims.exp == 0 {
            token_claims.exp = (Utc::now() + Duration::seconds(self.expiration_secs)).timestamp();
        }

        debug!(
            user_id = %token_claims.sub,
            role = %token_claims.role,
            exp = token_claims.exp,
            "Creating JWT token"
        );

        encode(&Header::default(), &token_claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, "Failed to create JWT token");
            AppError::InvalidToken(format!("Token creation failed: {}", e))
        })
    }

    pub fn create_token_for_user(&self, user_id: Uuid, role: UserRole) -> Result<String, AppError> {
        self.create_token(&Claims::new(user_id, role))
    }

    /// Verify signature and expiry and return the claims
    ///
    /// # Errors
    ///
    /// - `AppError::TokenExpired` if the token has expired
    /// - `AppError::InvalidToken` for anything else
    pub fn validate_token(&self, token: &str) -> Result<Claims, AppError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => {
                    warn!("Token expired");
                    AppError::TokenExpired
                }
                _ => {
                    warn!(error = %e, "Invalid token");
                    AppError::InvalidToken(format!("Token validation failed: {}", e))
                }
            })?;

        let claims = token_data.claims;

        // decoding allows a leeway past exp
        if claims.is_expired() {
            warn!(user_id = %claims.sub, "Token expired within validation leeway");
            return Err(AppError::TokenExpired);
        }

        debug!(user_id = %claims.sub, role = %claims.role, "Token validated");
        Ok(claims)
    }

    pub fn expiration_secs(&self) -> i64 {
        self.expiration_secs
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("expiration_secs", &self.expiration_secs)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test-secret-key-for-jwt-testing-12345";

    #[test]
    fn test_create_and_validate_token() {
        let jwt_service = JwtService::new(TEST_SECRET, 3600);
        let id = Uuid::new_v4();

        let token = jwt_service.create_token(&Claims::new(id, UserRole::Admin)).unwrap();
        assert!(!token.is_empty());

        let decoded = jwt_service.validate_token(&token).unwrap();
        assert_eq!(decoded.sub, id);
        assert_eq!(decoded.role, UserRole::Admin);

        let now = Utc::now().timestamp();
        assert!(decoded.exp > now);
        assert!(decoded.exp <= now + 3600);
    }

    #[test]
    fn test_expired_token() {
        let jwt_service = JwtService::new(TEST_SECRET, 3600);
        let claims = Claims::with_expiration(Uuid::new_v4(), UserRole::Client, -10);
        let token = jwt_service.create_token(&claims).unwrap();

        assert!(matches!(
            jwt_service.validate_token(&token),
            Err(AppError::TokenExpired)
        ));
    }

    #[test]
    fn test_long_expired_token() {
        let jwt_service = JwtService::new(TEST_SECRET, 3600);
        let claims = Claims::with_expiration(Uuid::new_v4(), UserRole::Client, -7200);
        let token = jwt_service.create_token(&claims).unwrap();

        assert!(matches!(
            jwt_service.validate_token(&token),
            Err(AppError::TokenExpired)
        ));
    }

    #[test]
    fn test_invalid_token() {
        let jwt_service = JwtService::new(TEST_SECRET, 3600);
        assert!(matches!(
            jwt_service.validate_token("invalid.token.here"),
            Err(AppError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_token_with_different_secret() {
        let issuer = JwtService::new("secret1", 3600);
        let verifier = JwtService::new("secret2", 3600);

        let token = issuer
            .create_token_for_user(Uuid::new_v4(), UserRole::Client)
            .unwrap();
        assert!(matches!(
            verifier.validate_token(&token),
            Err(AppError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_debug_impl_hides_secret() {
        let debug_str = format!("{:?}", JwtService::new(TEST_SECRET, 3600));

        assert!(debug_str.contains("3600"));
        assert!(debug_str.contains("[REDACTED]"));
        assert!(!debug_str.contains(TEST_SECRET));
    }
}
