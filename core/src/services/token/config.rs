//! Configuration for the token service

/// Configuration for the token service
///
/// The signing secret is injected once at process start and held for the
/// process lifetime; there is no runtime rotation.
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// Ceiling on a user's active refresh tokens. Not enforced at login;
    /// rotation and the cleanup sweep trim back down to it.
    pub max_active_refresh_tokens: usize,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "development-secret-please-change-in-production".to_string(),
            max_active_refresh_tokens: 5,
        }
    }
}
