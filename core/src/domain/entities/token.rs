//! Token entities for JWT-based authentication.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::User;

/// Access token lifetime (15 minutes)
pub const ACCESS_TOKEN_EXPIRY_SECONDS: i64 = 900;

/// Refresh token lifetime (7 days)
pub const REFRESH_TOKEN_EXPIRY_SECONDS: i64 = 604_800;

/// JWT issuer
pub const JWT_ISSUER: &str = "iam-api";

/// Discriminates what a token may be used for; carried as a claim so a
/// refresh token is rejected wherever an access token is required and
/// vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// Claims structure for the JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's login identifier (email)
    pub sub: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// What this token may be used for
    pub token_type: TokenType,

    /// Per-issuance identifier; set on refresh tokens so two tokens for
    /// the same subject are never byte-identical even in the same instant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,

    /// Role names copied verbatim from the user
    pub roles: Vec<String>,

    /// Permission names derived from the user's roles
    pub permissions: Vec<String>,
}

impl Claims {
    /// Creates claims for an access token
    pub fn new_access_token(user: &User) -> Self {
        let now = Utc::now();

        Self {
            sub: user.email.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ACCESS_TOKEN_EXPIRY_SECONDS)).timestamp(),
            iss: JWT_ISSUER.to_string(),
            token_type: TokenType::Access,
            jti: None,
            roles: user.role_names(),
            permissions: user.permission_names().into_iter().collect(),
        }
    }

    /// Creates claims for a refresh token
    pub fn new_refresh_token(user: &User) -> Self {
        let now = Utc::now();

        Self {
            sub: user.email.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(REFRESH_TOKEN_EXPIRY_SECONDS)).timestamp(),
            iss: JWT_ISSUER.to_string(),
            token_type: TokenType::Refresh,
            jti: Some(Uuid::new_v4().to_string()),
            roles: user.role_names(),
            permissions: user.permission_names().into_iter().collect(),
        }
    }

    /// Expiration as a UTC timestamp
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}

/// Refresh token ledger row
///
/// Created at login and rotation; mutated only to flip the revoked flag
/// and stamp the last use. Rows are never reactivated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshToken {
    /// Unique identifier for the ledger row
    pub id: Uuid,

    /// User this token belongs to
    pub user_id: Uuid,

    /// SHA-256 digest of the token string; the raw value is never stored
    pub token_hash: String,

    /// Timestamp when the token was issued
    pub created_at: DateTime<Utc>,

    /// Expiry copied from the token's own exp claim
    pub expires_at: DateTime<Utc>,

    /// Monotonic false -> true, never reverts
    pub is_revoked: bool,

    /// Set only when the token is consumed
    pub last_used_at: Option<DateTime<Utc>>,
}

impl RefreshToken {
    /// Creates a new active ledger row. `expires_at` must come from the
    /// issued token's own expiry claim so codec and ledger agree exactly.
    pub fn new(user_id: Uuid, token_hash: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            token_hash,
            created_at: Utc::now(),
            expires_at,
            is_revoked: false,
            last_used_at: None,
        }
    }

    /// Whether the token has passed its expiry
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Whether the token may still be consumed
    pub fn is_active(&self) -> bool {
        !self.is_revoked && !self.is_expired()
    }

    /// Revokes the token without marking a use
    pub fn revoke(&mut self) {
        self.is_revoked = true;
    }

    /// Consumes the token: revokes it and stamps the use time
    pub fn consume(&mut self) {
        self.is_revoked = true;
        self.last_used_at = Some(Utc::now());
    }
}

/// Durable record of an access token revoked before its natural expiry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlacklistedToken {
    /// Unique identifier for the row
    pub id: Uuid,

    /// SHA-256 digest of the access token string
    pub token_hash: String,

    /// User that owned the token
    pub user_id: Uuid,

    /// Expiry copied from the token's own exp claim; once past, the row
    /// is pure bookkeeping and safe to purge
    pub expires_at: DateTime<Utc>,

    /// When the token was invalidated
    pub revoked_at: DateTime<Utc>,
}

impl BlacklistedToken {
    /// Creates a new blacklist row
    pub fn new(user_id: Uuid, token_hash: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            token_hash,
            user_id,
            expires_at,
            revoked_at: Utc::now(),
        }
    }
}

/// Token pair returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// JWT access token
    pub access_token: String,

    /// JWT refresh token
    pub refresh_token: String,

    /// Access token expiry time in seconds
    pub access_expires_in: i64,

    /// Refresh token expiry time in seconds
    pub refresh_expires_in: i64,
}

impl TokenPair {
    /// Creates a new token pair with the configured expiry windows
    pub fn new(access_token: String, refresh_token: String) -> Self {
        Self {
            access_token,
            refresh_token,
            access_expires_in: ACCESS_TOKEN_EXPIRY_SECONDS,
            refresh_expires_in: REFRESH_TOKEN_EXPIRY_SECONDS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::role::Role;

    fn test_user() -> User {
        let role = Role::new("USER", ["profile:read".to_string()]);
        User::new("alice", "alice@example.com", "$2b$12$hash", role)
    }

    #[test]
    fn test_access_token_claims() {
        let user = test_user();
        let claims = Claims::new_access_token(&user);

        assert_eq!(claims.sub, user.email);
        assert_eq!(claims.iss, JWT_ISSUER);
        assert_eq!(claims.token_type, TokenType::Access);
        assert!(claims.jti.is_none());
        assert_eq!(claims.exp - claims.iat, ACCESS_TOKEN_EXPIRY_SECONDS);
        assert_eq!(claims.roles, vec!["USER".to_string()]);
        assert_eq!(claims.permissions, vec!["profile:read".to_string()]);
    }

    #[test]
    fn test_refresh_token_claims_carry_unique_jti() {
        let user = test_user();
        let first = Claims::new_refresh_token(&user);
        let second = Claims::new_refresh_token(&user);

        assert_eq!(first.token_type, TokenType::Refresh);
        assert_eq!(first.exp - first.iat, REFRESH_TOKEN_EXPIRY_SECONDS);
        assert!(first.jti.is_some());
        // Same subject, same instant: the jti still separates them
        assert_ne!(first.jti, second.jti);
    }

    #[test]
    fn test_refresh_token_lifecycle() {
        let user = test_user();
        let expires_at = Utc::now() + Duration::seconds(REFRESH_TOKEN_EXPIRY_SECONDS);
        let mut token = RefreshToken::new(user.id, "digest".to_string(), expires_at);

        assert!(token.is_active());
        assert!(token.last_used_at.is_none());

        token.consume();
        assert!(token.is_revoked);
        assert!(token.last_used_at.is_some());
        assert!(!token.is_active());
    }

    #[test]
    fn test_refresh_token_expiry_detection() {
        let user = test_user();
        let mut token = RefreshToken::new(user.id, "digest".to_string(), Utc::now());
        token.expires_at = Utc::now() - Duration::seconds(1);

        assert!(token.is_expired());
        assert!(!token.is_active());
        assert!(!token.is_revoked);
    }

    #[test]
    fn test_token_pair_expiry_windows() {
        let pair = TokenPair::new("access".to_string(), "refresh".to_string());

        assert_eq!(pair.access_expires_in, 900);
        assert_eq!(pair.refresh_expires_in, 7 * 24 * 60 * 60);
    }

    #[test]
    fn test_claims_serialization_round_trip() {
        let user = test_user();
        let claims = Claims::new_refresh_token(&user);

        let json = serde_json::to_string(&claims).unwrap();
        let decoded: Claims = serde_json::from_str(&json).unwrap();

        assert_eq!(claims, decoded);
    }

    #[test]
    fn test_access_claims_omit_jti_in_payload() {
        let user = test_user();
        let claims = Claims::new_access_token(&user);

        let json = serde_json::to_string(&claims).unwrap();
        assert!(!json.contains("jti"));
    }
}
