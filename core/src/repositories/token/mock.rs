//! Mock implementation of TokenRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::token::RefreshToken;
use crate::errors::DomainError;

use super::trait_::TokenRepository;

/// Mock refresh ledger for testing
///
/// The write lock makes `consume` atomic: the active check and the state
/// flip happen under one guard, matching the conditional-update contract.
pub struct MockTokenRepository {
    tokens: Arc<RwLock<HashMap<String, RefreshToken>>>,
}

impl MockTokenRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            tokens: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn active_for_user(tokens: &HashMap<String, RefreshToken>, user_id: Uuid) -> Vec<RefreshToken> {
        tokens
            .values()
            .filter(|t| t.user_id == user_id && !t.is_revoked)
            .cloned()
            .collect()
    }
}

impl Default for MockTokenRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenRepository for MockTokenRepository {
    async fn save(&self, token: RefreshToken) -> Result<RefreshToken, DomainError> {
        let mut tokens = self.tokens.write().await;

        if tokens.contains_key(&token.token_hash) {
            return Err(DomainError::Validation {
                message: "Token already exists".to_string(),
            });
        }

        tokens.insert(token.token_hash.clone(), token.clone());
        Ok(token)
    }

    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<RefreshToken>, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens.get(token_hash).cloned())
    }

    async fn find_active_by_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshToken>, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens.get(token_hash).filter(|t| !t.is_revoked).cloned())
    }

    async fn consume(&self, token_hash: &str, now: DateTime<Utc>) -> Result<bool, DomainError> {
        let mut tokens = self.tokens.write().await;

        match tokens.get_mut(token_hash) {
            Some(token) if !token.is_revoked => {
                token.is_revoked = true;
                token.last_used_at = Some(now);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn revoke(&self, token_hash: &str) -> Result<bool, DomainError> {
        let mut tokens = self.tokens.write().await;

        match tokens.get_mut(token_hash) {
            Some(token) if !token.is_revoked => {
                token.revoke();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn count_active_for_user(&self, user_id: Uuid) -> Result<usize, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(Self::active_for_user(&tokens, user_id).len())
    }

    async fn oldest_active_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<RefreshToken>, DomainError> {
        let tokens = self.tokens.read().await;
        let mut active = Self::active_for_user(&tokens, user_id);
        active.sort_by_key(|t| t.created_at);
        Ok(active.into_iter().next())
    }

    async fn active_for_user_newest_first(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<RefreshToken>, DomainError> {
        let tokens = self.tokens.read().await;
        let mut active = Self::active_for_user(&tokens, user_id);
        active.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(active)
    }

    async fn expired_active_for_user(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<RefreshToken>, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(Self::active_for_user(&tokens, user_id)
            .into_iter()
            .filter(|t| t.expires_at < now)
            .collect())
    }
}
