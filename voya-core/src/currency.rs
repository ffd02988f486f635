use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::warn;

use crate::CoreResult;

/// The display currency everything is converted into.
pub const TARGET_CURRENCY: &str = "EUR";

/// Source of currency → EUR conversion rates.
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn eur_rate(&self, currency: &str) -> CoreResult<f64>;
}

/// Process-lifetime memo of conversion rates.
///
/// Populated lazily, never invalidated. Staleness over a process lifetime
/// is an accepted tradeoff. Two requests racing on the same code both
/// fetch and overwrite with equivalent values, which is harmless.
#[derive(Debug, Default)]
pub struct RateCache {
    rates: RwLock<HashMap<String, f64>>,
}

impl RateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, currency: &str) -> Option<f64> {
        let rates = self.rates.read().unwrap_or_else(|e| e.into_inner());
        rates.get(currency).copied()
    }

    pub fn put(&self, currency: &str, rate: f64) {
        let mut rates = self.rates.write().unwrap_or_else(|e| e.into_inner());
        rates.insert(currency.to_string(), rate);
    }
}

/// Converts offer prices into EUR through the cache, falling back to the
/// rate source on a miss and to no conversion at all when the lookup fails.
pub struct EurConverter<'a> {
    cache: &'a RateCache,
    source: &'a dyn RateSource,
}

impl<'a> EurConverter<'a> {
    pub fn new(cache: &'a RateCache, source: &'a dyn RateSource) -> Self {
        Self { cache, source }
    }

    /// Multiplier turning one unit of `currency` into EUR.
    ///
    /// Same-currency is always 1.0. A failed lookup also yields 1.0 (no
    /// conversion) and is not cached, so a later request retries.
    pub async fn rate_for(&self, currency: &str) -> f64 {
        if currency.eq_ignore_ascii_case(TARGET_CURRENCY) {
            return 1.0;
        }
        if let Some(rate) = self.cache.get(currency) {
            return rate;
        }
        match self.source.eur_rate(currency).await {
            Ok(rate) => {
                self.cache.put(currency, rate);
                rate
            }
            Err(err) => {
                warn!("Rate lookup failed for {}: {}; leaving price unconverted", currency, err);
                1.0
            }
        }
    }

    pub async fn to_eur(&self, amount: f64, currency: &str) -> f64 {
        amount * self.rate_for(currency).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CoreError;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct StubSource {
        rate: Option<f64>,
        calls: AtomicU32,
    }

    impl StubSource {
        fn returning(rate: f64) -> Self {
            Self { rate: Some(rate), calls: AtomicU32::new(0) }
        }

        fn failing() -> Self {
            Self { rate: None, calls: AtomicU32::new(0) }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RateSource for StubSource {
        async fn eur_rate(&self, _currency: &str) -> CoreResult<f64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.rate
                .ok_or_else(|| CoreError::UpstreamError("rates unavailable".to_string()))
        }
    }

    #[tokio::test]
    async fn test_same_currency_never_hits_source() {
        let cache = RateCache::new();
        let source = StubSource::returning(2.0);
        let converter = EurConverter::new(&cache, &source);

        assert_eq!(converter.rate_for("EUR").await, 1.0);
        assert_eq!(converter.rate_for("eur").await, 1.0);
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn test_rate_is_fetched_once_then_cached() {
        let cache = RateCache::new();
        let source = StubSource::returning(0.92);
        let converter = EurConverter::new(&cache, &source);

        assert_eq!(converter.to_eur(100.0, "USD").await, 92.0);
        assert_eq!(converter.to_eur(200.0, "USD").await, 184.0);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_failed_lookup_falls_back_to_no_conversion() {
        let cache = RateCache::new();
        let source = StubSource::failing();
        let converter = EurConverter::new(&cache, &source);

        assert_eq!(converter.to_eur(150.0, "GBP").await, 150.0);
        // Failure is not cached; the next request retries the source.
        assert_eq!(converter.to_eur(150.0, "GBP").await, 150.0);
        assert_eq!(source.calls(), 2);
    }
}
