use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};

/// Seconds shaved off the provider's advertised lifetime so a token is never
/// used at the edge of expiry.
pub const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

/// Holds at most one service token. Replaced wholesale on refresh.
///
/// The lock is only held while reading or swapping the value, never across the
/// network exchange, so two callers that both see an expired token will both
/// refresh and the later write wins.
#[derive(Debug)]
pub struct TokenCache {
    slot: RwLock<Option<AccessToken>>,
    margin: Duration,
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenCache {
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(None),
            margin: Duration::seconds(EXPIRY_MARGIN_SECS),
        }
    }

    pub fn get(&self, now: DateTime<Utc>) -> Option<String> {
        let slot = self.slot.read().unwrap_or_else(|e| e.into_inner());
        slot.as_ref()
            .filter(|token| now < token.expires_at)
            .map(|token| token.value.clone())
    }

    /// Caches `value` until `expires_in_secs` minus the margin after `now`.
    ///
    /// Returns `None` and leaves the cache untouched when the lifetime does not
    /// fit in a timestamp.
    pub fn store(
        &self,
        value: String,
        expires_in_secs: i64,
        now: DateTime<Utc>,
    ) -> Option<AccessToken> {
        let expires_at = Duration::try_seconds(expires_in_secs)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .and_then(|at| at.checked_sub_signed(self.margin))?;

        let token = AccessToken { value, expires_at };
        let mut slot = self.slot.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(token.clone());
        Some(token)
    }

    pub fn clear(&self) {
        let mut slot = self.slot.write().unwrap_or_else(|e| e.into_inner());
        *slot = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cache_has_nothing() {
        let cache = TokenCache::new();
        assert_eq!(cache.get(Utc::now()), None);
    }

    #[test]
    fn token_is_reused_until_margin() {
        let cache = TokenCache::new();
        let now = Utc::now();
        let token = cache.store("abc".to_string(), 3600, now).unwrap();
        assert_eq!(token.expires_at, now + Duration::seconds(3540));

        assert_eq!(cache.get(now), Some("abc".to_string()));
        assert_eq!(cache.get(now + Duration::seconds(3539)), Some("abc".to_string()));
        assert_eq!(cache.get(now + Duration::seconds(3540)), None);
        assert_eq!(cache.get(now + Duration::seconds(3600)), None);
    }

    #[test]
    fn refresh_replaces_the_whole_token() {
        let cache = TokenCache::new();
        let now = Utc::now();
        cache.store("old".to_string(), 3600, now);

        let later = now + Duration::seconds(4000);
        assert_eq!(cache.get(later), None);
        cache.store("new".to_string(), 3600, later);
        assert_eq!(cache.get(later), Some("new".to_string()));
    }

    #[test]
    fn short_lived_token_is_never_served() {
        let cache = TokenCache::new();
        let now = Utc::now();
        cache.store("tiny".to_string(), 30, now);
        assert_eq!(cache.get(now), None);
    }

    #[test]
    fn clear_drops_token() {
        let cache = TokenCache::new();
        let now = Utc::now();
        cache.store("abc".to_string(), 3600, now);
        cache.clear();
        assert_eq!(cache.get(now), None);
    }

    #[test]
    fn out_of_range_lifetime_is_refused() {
        let cache = TokenCache::new();
        let now = Utc::now();
        cache.store("abc".to_string(), 3600, now);

        assert_eq!(cache.store("huge".to_string(), 9_000_000_000_000_000, now), None);
        assert_eq!(cache.store("huge".to_string(), i64::MAX, now), None);
        assert_eq!(cache.store("neg".to_string(), i64::MIN, now), None);
        assert_eq!(cache.get(now), Some("abc".to_string()));
    }
}
