//! Mock implementation of BlacklistRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::token::BlacklistedToken;
use crate::errors::DomainError;

use super::trait_::BlacklistRepository;

/// Mock blacklist store for testing
pub struct MockBlacklistRepository {
    entries: Arc<RwLock<HashMap<String, BlacklistedToken>>>,
}

impl MockBlacklistRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of rows currently stored
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the store is empty
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for MockBlacklistRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlacklistRepository for MockBlacklistRepository {
    async fn save(&self, entry: BlacklistedToken) -> Result<(), DomainError> {
        let mut entries = self.entries.write().await;
        // First writer wins; a duplicate insert is a silent no-op
        entries.entry(entry.token_hash.clone()).or_insert(entry);
        Ok(())
    }

    async fn exists_by_hash(&self, token_hash: &str) -> Result<bool, DomainError> {
        let entries = self.entries.read().await;
        Ok(entries.contains_key(token_hash))
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at >= now);
        Ok(before - entries.len())
    }
}
