//! Cached bearer token for the cloud-drive add API.
//!
//! A single token slot shared by all in-flight requests. The slot is guarded
//! by an async mutex that stays held across a refresh, so concurrent requests
//! hitting an expired token perform exactly one login.

use jiff::Timestamp;
use tokio::sync::Mutex;

use crate::error::AppResult;

/// A freshly acquired token with its absolute expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Authorization header value, e.g. `"Bearer eyJ..."`
    pub value: String,
    /// Instant after which the token must not be reused
    pub expires_at: Timestamp,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: Timestamp,
}

/// Process-wide single-slot token cache.
#[derive(Debug, Default)]
pub struct TokenCache {
    slot: Mutex<Option<CachedToken>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached token while unexpired, otherwise awaits `refresh`
    /// and stores its result.
    ///
    /// The slot lock is held for the duration of the refresh call.
    pub async fn get_or_refresh<F, Fut>(&self, refresh: F) -> AppResult<String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<IssuedToken>>,
    {
        let mut slot = self.slot.lock().await;

        if let Some(cached) = slot.as_ref()
            && Timestamp::now() < cached.expires_at
        {
            return Ok(cached.value.clone());
        }

        let issued = refresh().await?;
        let value = issued.value.clone();
        *slot = Some(CachedToken {
            value: issued.value,
            expires_at: issued.expires_at,
        });
        Ok(value)
    }

    /// Drops the cached token so the next request performs a fresh login.
    pub async fn invalidate(&self) {
        *self.slot.lock().await = None;
    }

    /// Returns whether a token is cached and, if so, its expiry.
    pub async fn status(&self) -> Option<Timestamp> {
        self.slot.lock().await.as_ref().map(|t| t.expires_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::SignedDuration;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn in_one_hour() -> Timestamp {
        Timestamp::now() + SignedDuration::from_secs(3600)
    }

    #[tokio::test]
    async fn test_refresh_populates_slot() {
        let cache = TokenCache::new();
        let value = cache
            .get_or_refresh(|| async {
                Ok(IssuedToken {
                    value: "Bearer abc".to_string(),
                    expires_at: in_one_hour(),
                })
            })
            .await
            .unwrap();
        assert_eq!(value, "Bearer abc");
        assert!(cache.status().await.is_some());
    }

    #[tokio::test]
    async fn test_unexpired_token_is_reused() {
        let cache = TokenCache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let value = cache
                .get_or_refresh(|| async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(IssuedToken {
                        value: "Bearer abc".to_string(),
                        expires_at: in_one_hour(),
                    })
                })
                .await
                .unwrap();
            assert_eq!(value, "Bearer abc");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expired_token_triggers_refresh() {
        let cache = TokenCache::new();
        let expired = Timestamp::now() - SignedDuration::from_secs(1);

        cache
            .get_or_refresh(|| async {
                Ok(IssuedToken {
                    value: "Bearer old".to_string(),
                    expires_at: expired,
                })
            })
            .await
            .unwrap();

        let value = cache
            .get_or_refresh(|| async {
                Ok(IssuedToken {
                    value: "Bearer new".to_string(),
                    expires_at: in_one_hour(),
                })
            })
            .await
            .unwrap();
        assert_eq!(value, "Bearer new");
    }

    #[tokio::test]
    async fn test_invalidate_clears_slot() {
        let cache = TokenCache::new();
        cache
            .get_or_refresh(|| async {
                Ok(IssuedToken {
                    value: "Bearer abc".to_string(),
                    expires_at: in_one_hour(),
                })
            })
            .await
            .unwrap();
        cache.invalidate().await;
        assert!(cache.status().await.is_none());
    }

    #[tokio::test]
    async fn test_refresh_failure_leaves_slot_empty() {
        let cache = TokenCache::new();
        let result = cache
            .get_or_refresh(|| async {
                Err(crate::error::AppError::Upstream {
                    service: "cloud-drive".to_string(),
                    message: "login failed".to_string(),
                    source: None,
                })
            })
            .await;
        assert!(result.is_err());
        assert!(cache.status().await.is_none());
    }
}
