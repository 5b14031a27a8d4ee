//! Authentication response value object.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::token::TokenPair;

/// Returned after a successful login or token rotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Identifier of the authenticated user
    pub user_id: Uuid,

    /// JWT access token for API authentication
    pub access_token: String,

    /// JWT refresh token for obtaining the next pair
    pub refresh_token: String,

    /// Access token expiry time in seconds
    pub expires_in: i64,
}

impl AuthResponse {
    /// Builds a response from a freshly issued token pair
    pub fn from_token_pair(user_id: Uuid, pair: TokenPair) -> Self {
        Self {
            user_id,
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            expires_in: pair.access_expires_in,
        }
    }
}
