//! Main authentication service implementation

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::domain::entities::token::TokenType;
use crate::domain::entities::user::User;
use crate::domain::value_objects::AuthResponse;
use crate::errors::{AuthError, DomainResult, TokenError};
use crate::repositories::{BlacklistRepository, RoleRepository, TokenRepository, UserRepository};
use crate::services::token::{TokenCleanupService, TokenService};

use super::account_lock::AccountLockPolicy;
use super::config::AuthServiceConfig;
use super::secret::SecretHasher;

/// Authentication service orchestrating registration, login, refresh
/// token rotation and logout
pub struct AuthService<U, R, T, B, H>
where
    U: UserRepository,
    R: RoleRepository,
    T: TokenRepository + 'static,
    B: BlacklistRepository + 'static,
    H: SecretHasher,
{
    /// User repository for account lookups and lockout persistence
    user_repository: Arc<U>,
    /// Role repository for resolving the default registration role
    role_repository: Arc<R>,
    /// Token service for issuance, ledger and blacklist operations
    token_service: Arc<TokenService<T, B>>,
    /// Cleanup service for detached post-logout sweeps
    cleanup_service: Arc<TokenCleanupService<T, B>>,
    /// Secret hashing capability
    secret_hasher: Arc<H>,
    /// Lockout policy
    lock_policy: AccountLockPolicy,
    /// Service configuration
    config: AuthServiceConfig,
}

impl<U, R, T, B, H> AuthService<U, R, T, B, H>
where
    U: UserRepository,
    R: RoleRepository,
    T: TokenRepository + 'static,
    B: BlacklistRepository + 'static,
    H: SecretHasher,
{
    /// Create a new authentication service
    pub fn new(
        user_repository: Arc<U>,
        role_repository: Arc<R>,
        token_service: Arc<TokenService<T, B>>,
        cleanup_service: Arc<TokenCleanupService<T, B>>,
        secret_hasher: Arc<H>,
        config: AuthServiceConfig,
    ) -> Self {
        let lock_policy = AccountLockPolicy::new(config.lock.clone());

        Self {
            user_repository,
            role_repository,
            token_service,
            cleanup_service,
            secret_hasher,
            lock_policy,
            config,
        }
    }

    /// Register a new user under the default role
    ///
    /// # Returns
    /// * `Ok(User)` - The created user
    /// * `Err(DomainError)` - Email taken, default role missing, or
    ///   persistence failed
    pub async fn register(
        &self,
        nickname: &str,
        email: &str,
        password: &str,
    ) -> DomainResult<User> {
        if self.user_repository.find_by_email(email).await?.is_some() {
            return Err(AuthError::UserAlreadyExists.into());
        }

        let role = self
            .role_repository
            .find_by_name(&self.config.default_role)
            .await?
            .ok_or_else(|| AuthError::RoleNotFound {
                name: self.config.default_role.clone(),
            })?;

        let password_hash = self.secret_hasher.hash(password)?;
        let user = self
            .user_repository
            .create(User::new(nickname, email, password_hash, role))
            .await?;

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Authenticate a user and issue a token pair
    ///
    /// A failed attempt is persisted before the error is surfaced: the
    /// counter/lock mutation must be durable even though the operation
    /// reports failure.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AuthResponse> {
        let mut user = self
            .user_repository
            .find_by_email(email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        self.lock_policy.check_accessible(&user)?;

        let matches = self
            .secret_hasher
            .verify(password, &user.password_hash)?;

        if !matches {
            let err = self.lock_policy.on_failure(&mut user);
            self.user_repository.update(user).await?;
            return Err(err.into());
        }

        self.lock_policy.on_success(&mut user);
        let user = self.user_repository.update(user).await?;

        let pair = self.token_service.issue_pair(&user).await?;

        info!(user_id = %user.id, "User logged in");
        Ok(AuthResponse::from_token_pair(user.id, pair))
    }

    /// Exchange a refresh token for a new pair, invalidating the old one.
    ///
    /// Nothing mutates until the token is consumed; once consumption has
    /// happened it is final even if a later step fails, and the caller
    /// must re-authenticate.
    pub async fn refresh_token(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> DomainResult<AuthResponse> {
        // Step 1: the refresh token must verify as type=refresh, and the
        // paired access token must at least be present
        let claims = self
            .token_service
            .codec()
            .verify(refresh_token, TokenType::Refresh)?;

        if access_token.is_empty() {
            return Err(TokenError::InvalidToken.into());
        }

        // Step 2: an absent row and an already-consumed row are reported
        // identically; a replayed token must not reveal that it was valid
        let record = self
            .token_service
            .find_active_refresh_token(refresh_token)
            .await?
            .ok_or(TokenError::TokenRevoked)?;

        // Step 3: expiry is detected lazily; the row is retired so a
        // replay reports TokenRevoked, not TokenExpired again
        if record.expires_at < Utc::now() {
            self.token_service
                .revoke_refresh_token(refresh_token)
                .await?;
            return Err(TokenError::TokenExpired.into());
        }

        // Step 4: resolve the owner by the verified subject and apply the
        // same accessibility rules as login
        let user = self
            .user_repository
            .find_by_email(&claims.sub)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        self.lock_policy.check_accessible(&user)?;

        if record.user_id != user.id {
            return Err(TokenError::TokenNotOwnedByUser.into());
        }

        // Step 5: the reuse-detection boundary. Exactly one concurrent
        // rotation can win this conditional update; losers are told the
        // token is revoked.
        if !self
            .token_service
            .consume_refresh_token(refresh_token)
            .await?
        {
            warn!(user_id = %user.id, "Refresh token reuse detected");
            return Err(TokenError::TokenRevoked.into());
        }

        // Step 6: the paired access token becomes unusable immediately
        // instead of waiting out its expiry window
        self.token_service
            .blacklist_access_token(access_token, user.id)
            .await?;

        // Step 7: keep the ledger bounded
        self.token_service.trim_session_ceiling(user.id).await?;

        // Step 8: issue the replacement pair
        let pair = self.token_service.issue_pair(&user).await?;

        Ok(AuthResponse::from_token_pair(user.id, pair))
    }

    /// Revoke an access token and, best-effort, an accompanying refresh
    /// token, then trigger a detached cleanup sweep.
    ///
    /// The refresh half never fails the operation: a stale, foreign or
    /// malformed refresh token is ignored because the access-token
    /// revocation is what the caller actually needs.
    pub async fn logout(
        &self,
        access_token: &str,
        refresh_token: Option<&str>,
    ) -> DomainResult<()> {
        let claims = self
            .token_service
            .codec()
            .verify(access_token, TokenType::Access)?;

        let user = self
            .user_repository
            .find_by_email(&claims.sub)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        self.token_service
            .blacklist_access_token(access_token, user.id)
            .await?;

        if let Some(refresh) = refresh_token {
            self.revoke_refresh_on_logout(refresh, &user).await;
        }

        self.cleanup_service.spawn_sweep(user.id);

        info!(user_id = %user.id, "User logged out");
        Ok(())
    }

    /// Best-effort revocation of the optional logout refresh token
    async fn revoke_refresh_on_logout(&self, refresh_token: &str, user: &User) {
        let claims = match self
            .token_service
            .codec()
            .verify(refresh_token, TokenType::Refresh)
        {
            Ok(claims) => claims,
            Err(e) => {
                debug!(user_id = %user.id, "Ignoring invalid refresh token on logout: {}", e);
                return;
            }
        };

        if claims.sub != user.email {
            debug!(user_id = %user.id, "Ignoring foreign refresh token on logout");
            return;
        }

        let record = match self.token_service.find_active_refresh_token(refresh_token).await {
            Ok(Some(record)) if record.expires_at >= Utc::now() => record,
            Ok(_) => {
                debug!(user_id = %user.id, "Ignoring stale refresh token on logout");
                return;
            }
            Err(e) => {
                debug!(user_id = %user.id, "Refresh token lookup failed on logout: {}", e);
                return;
            }
        };

        if record.user_id != user.id {
            debug!(user_id = %user.id, "Ignoring refresh token owned by another user");
            return;
        }

        match self.token_service.consume_refresh_token(refresh_token).await {
            Ok(true) => {}
            Ok(false) => {
                debug!(user_id = %user.id, "Refresh token already consumed at logout")
            }
            Err(e) => {
                debug!(user_id = %user.id, "Refresh token revocation failed on logout: {}", e)
            }
        }
    }
}
