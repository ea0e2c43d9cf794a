//! Cached reference data: markets and users.
//!
//! Markets and users change rarely, so they are memoized through the TTL
//! cache and refetched only after expiry. Cached entities are eventually
//! consistent: overlapping in-flight refreshes race and the last write wins,
//! which is acceptable for reference data.

use crate::api::{LedgerClient, LedgerError};
use crate::cache::TtlCache;
use crate::domain::rent::{MarketRates, RuleParseError};
use shared::User;
use thiserror::Error;
use tracing::{debug, info};

pub const MARKETS_CACHE_KEY: &str = "markets";
pub const USERS_CACHE_KEY: &str = "users";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReferenceError {
    #[error(transparent)]
    Remote(#[from] LedgerError),
    /// A market arrived with rules that do not normalize. The quote for that
    /// market would be wrong, so the whole fetch fails with a displayable
    /// message instead of defaulting the rent to zero.
    #[error("market `{market}` has invalid rent rules: {source}")]
    Rules {
        market: String,
        source: RuleParseError,
    },
}

/// Cache-or-fetch access to reference data.
pub struct ReferenceData {
    api: LedgerClient,
    cache: TtlCache,
}

impl ReferenceData {
    pub fn new(api: LedgerClient, cache: TtlCache) -> Self {
        Self { api, cache }
    }

    /// Markets with rules normalized at ingestion. Cache hit skips the remote
    /// call entirely; a miss fetches, normalizes, populates the cache and
    /// returns.
    pub async fn markets(&self) -> Result<Vec<MarketRates>, ReferenceError> {
        if let Some(cached) = self.cache.get::<Vec<MarketRates>>(MARKETS_CACHE_KEY).await {
            debug!("markets served from cache ({} entries)", cached.len());
            return Ok(cached);
        }

        info!("fetching markets from ledger");
        let wire = self.api.get_markets().await?;
        let mut markets = Vec::with_capacity(wire.len());
        for market in wire {
            let name = market.name.clone();
            let normalized = MarketRates::from_wire(market)
                .map_err(|source| ReferenceError::Rules { market: name, source })?;
            markets.push(normalized);
        }

        self.cache.set(MARKETS_CACHE_KEY, &markets).await;
        Ok(markets)
    }

    /// User directory (admin view), memoized the same way.
    pub async fn users(&self, phone: &str) -> Result<Vec<User>, ReferenceError> {
        if let Some(cached) = self.cache.get::<Vec<User>>(USERS_CACHE_KEY).await {
            debug!("users served from cache ({} entries)", cached.len());
            return Ok(cached);
        }

        info!("fetching users from ledger");
        let users = self.api.get_users(phone).await?;
        self.cache.set(USERS_CACHE_KEY, &users).await;
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rent::RentRuleSet;
    use crate::store::CacheStore;
    use shared::Role;

    // Clients here point at the discard port: any actual network use fails,
    // which is how these tests prove the cache path never goes remote.
    async fn setup_test() -> (ReferenceData, TtlCache) {
        let store = CacheStore::open_test()
            .await
            .expect("Failed to create test store");
        let cache = TtlCache::new(store);
        let api = LedgerClient::new("http://127.0.0.1:9/exec");
        (ReferenceData::new(api, cache.clone()), cache)
    }

    fn sample_markets() -> Vec<MarketRates> {
        vec![MarketRates {
            id: "m1".to_string(),
            name: "North Gate".to_string(),
            rules: RentRuleSet::parse("1-4:2600,5:2800,6-7:3400").unwrap(),
        }]
    }

    #[tokio::test]
    async fn test_cache_hit_skips_remote_call() {
        let (reference, cache) = setup_test().await;
        cache.set(MARKETS_CACHE_KEY, &sample_markets()).await;

        // The API endpoint is unreachable, so this only succeeds because the
        // cache satisfied the lookup
        let markets = reference.markets().await.expect("cache should satisfy");
        assert_eq!(markets, sample_markets());
    }

    #[tokio::test]
    async fn test_cache_miss_with_unreachable_ledger_propagates_remote_error() {
        let (reference, _cache) = setup_test().await;

        let result = reference.markets().await;
        assert!(matches!(result, Err(ReferenceError::Remote(_))));
    }

    #[tokio::test]
    async fn test_users_cache_hit() {
        let (reference, cache) = setup_test().await;
        let users = vec![User {
            id: "0911222333".to_string(),
            phone: "0911222333".to_string(),
            name: "Mei".to_string(),
            role: Role::Admin,
        }];
        cache.set(USERS_CACHE_KEY, &users).await;

        let cached = reference
            .users("0911222333")
            .await
            .expect("cache should satisfy");
        assert_eq!(cached, users);
    }

    #[test]
    fn test_rules_error_names_the_market() {
        let error = ReferenceError::Rules {
            market: "Old Pier".to_string(),
            source: RuleParseError::Empty,
        };
        let message = error.to_string();
        assert!(message.contains("Old Pier"));
        assert!(message.contains("rent rule"));
    }
}
