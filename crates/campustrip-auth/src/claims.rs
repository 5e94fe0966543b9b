//! JWT claims carried by CampusTrip tokens

use campustrip_core::models::UserRole;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject: the caller's user id
    pub sub: Uuid,

    pub role: UserRole,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp); zero until a service stamps it
    pub exp: i64,
}

impl Claims {
    /// Claims without an expiry; [`crate::JwtService::create_token`] sets one
    ///
    /// ```
    /// use campustrip_auth::Claims;
    /// use campustrip_core::models::UserRole;
    /// use uuid::Uuid;
    ///
    /// let id = Uuid::new_v4();
    /// let claims = Claims::new(id, UserRole::Admin);
    /// assert_eq!(claims.user_id(), id);
    /// ```
    pub fn new(user_id: Uuid, role: UserRole) -> Self {
        Self {
            sub: user_id,
            role,
            iat: Utc::now().timestamp(),
            exp: 0,
        }
    }

    pub fn with_expiration(user_id: Uuid, role: UserRole, expires_in_secs: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            role,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(expires_in_secs)).timestamp(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.exp <= Utc::now().timestamp()
    }

    pub fn user_id(&self) -> Uuid {
        self.sub
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_with_expiration() {
        let id = Uuid::new_v4();
        let claims = Claims::with_expiration(id, UserRole::Client, 3600);
        assert_eq!(claims.sub, id);
        assert!(!claims.is_expired());

        let now = Utc::now().timestamp();
        assert!(claims.exp > now);
        assert!(claims.exp <= now + 3600);
    }

    #[test]
    fn test_expired_claims() {
        let mut claims = Claims::new(Uuid::new_v4(), UserRole::Client);
        claims.exp = (Utc::now() - Duration::hours(1)).timestamp();
        assert!(claims.is_expired());
    }

    #[test]
    fn test_role_checks() {
        assert!(!Claims::new(Uuid::new_v4(), UserRole::Client).is_admin());
        assert!(Claims::new(Uuid::new_v4(), UserRole::Admin).is_admin());
    }

    #[test]
    fn test_subject_serializes_as_uuid_string() {
        let id = Uuid::parse_str("8f14e45f-ceea-467e-a1c9-2d6b2f6a5a10").unwrap();
        let json = serde_json::to_value(Claims::new(id, UserRole::Admin)).unwrap();
        assert_eq!(json["sub"], "8f14e45f-ceea-467e-a1c9-2d6b2f6a5a10");
        assert_eq!(json["role"], "admin");
    }
}
