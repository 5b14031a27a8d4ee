//! Main token service implementation

use std::sync::Arc;

use chrono::Utc;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::domain::entities::token::{
    BlacklistedToken, Claims, RefreshToken, TokenPair, TokenType,
};
use crate::domain::entities::user::User;
use crate::errors::DomainResult;
use crate::repositories::{BlacklistRepository, TokenRepository};

use super::codec::TokenCodec;
use super::config::TokenServiceConfig;

/// Service for issuing token pairs and keeping the refresh ledger and
/// access-token blacklist
pub struct TokenService<R: TokenRepository, B: BlacklistRepository> {
    tokens: Arc<R>,
    blacklist: Arc<B>,
    codec: TokenCodec,
    config: TokenServiceConfig,
}

impl<R: TokenRepository, B: BlacklistRepository> TokenService<R, B> {
    /// Creates a new token service instance
    pub fn new(tokens: Arc<R>, blacklist: Arc<B>, config: TokenServiceConfig) -> Self {
        let codec = TokenCodec::new(&config.jwt_secret);

        Self {
            tokens,
            blacklist,
            codec,
            config,
        }
    }

    /// The codec used for all signing and verification
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Issues a fresh access+refresh pair for a user and records the
    /// refresh token in the ledger.
    ///
    /// The ledger row's expiry is taken from the refresh token's own exp
    /// claim so codec and ledger agree exactly. The session ceiling is
    /// deliberately not enforced here; rotation trims the ledger.
    pub async fn issue_pair(&self, user: &User) -> DomainResult<TokenPair> {
        let access = self.codec.issue(&Claims::new_access_token(user))?;

        let refresh_claims = Claims::new_refresh_token(user);
        let refresh = self.codec.issue(&refresh_claims)?;

        let row = RefreshToken::new(
            user.id,
            Self::hash_token(&refresh),
            refresh_claims.expires_at(),
        );
        self.tokens.save(row).await?;

        Ok(TokenPair::new(access, refresh))
    }

    /// Looks up the non-revoked ledger row for a refresh token string
    pub async fn find_active_refresh_token(
        &self,
        token: &str,
    ) -> DomainResult<Option<RefreshToken>> {
        self.tokens
            .find_active_by_hash(&Self::hash_token(token))
            .await
    }

    /// Atomically consumes a refresh token.
    ///
    /// Returns `false` when the token was absent or already consumed;
    /// under concurrent calls with the same string exactly one caller
    /// sees `true`.
    pub async fn consume_refresh_token(&self, token: &str) -> DomainResult<bool> {
        self.tokens
            .consume(&Self::hash_token(token), Utc::now())
            .await
    }

    /// Revokes a refresh token without stamping a use
    pub async fn revoke_refresh_token(&self, token: &str) -> DomainResult<bool> {
        self.tokens.revoke(&Self::hash_token(token)).await
    }

    /// Blacklists an access token under its own expiry claim.
    ///
    /// Idempotent: a token that is already blacklisted is left as is.
    /// The expiry claim is read leniently because the token may have
    /// aged out between issuance and revocation; signature and issuer
    /// are still enforced.
    pub async fn blacklist_access_token(&self, token: &str, user_id: Uuid) -> DomainResult<()> {
        let claims = self
            .codec
            .verify_ignoring_expiry(token, TokenType::Access)?;

        let token_hash = Self::hash_token(token);
        if !self.blacklist.exists_by_hash(&token_hash).await? {
            let entry = BlacklistedToken::new(user_id, token_hash, claims.expires_at());
            self.blacklist.save(entry).await?;
        }

        Ok(())
    }

    /// Whether an access token string has been blacklisted; consulted by
    /// the request-authorization boundary on every protected call
    pub async fn is_access_token_blacklisted(&self, token: &str) -> DomainResult<bool> {
        self.blacklist
            .exists_by_hash(&Self::hash_token(token))
            .await
    }

    /// Enforces the session ceiling: when the user's active refresh
    /// token count has reached the maximum, revokes the single oldest
    /// active one.
    ///
    /// Returns `true` when a token was revoked.
    pub async fn trim_session_ceiling(&self, user_id: Uuid) -> DomainResult<bool> {
        let active = self.tokens.count_active_for_user(user_id).await?;
        if active < self.config.max_active_refresh_tokens {
            return Ok(false);
        }

        match self.tokens.oldest_active_for_user(user_id).await? {
            Some(oldest) => self.tokens.revoke(&oldest.token_hash).await,
            None => Ok(false),
        }
    }

    /// Hashes a token string for storage and lookup
    pub(crate) fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}
