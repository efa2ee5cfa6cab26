//! ABOUTME: Per-tenant/per-provider token-bucket rate limiting with retry-with-backoff
//! ABOUTME: Limits are tier-driven at the tenant boundary, provider-driven at the dispatch boundary

use dashmap::DashMap;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Backoff schedule used by [`ProviderRateLimiter::execute_with_retry`] and,
/// conceptually, by the provider dispatcher's own retry loop (spec §4.5:
/// base 500ms, exponential, full jitter, capped at 8s there; this module's
/// default cap of 5 minutes suits the slower provider-level backoff used
/// for 429s with no `Retry-After` header).
#[derive(Debug, Clone, Copy)]
pub enum BackoffStrategy {
    Linear { increment_ms: u64 },
    Exponential { base_ms: u64 },
}

const MAX_BACKOFF_MS: u64 = 300_000;

impl BackoffStrategy {
    #[must_use]
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        let millis = match self {
            Self::Linear { increment_ms } => increment_ms.saturating_mul(u64::from(attempt) + 1),
            Self::Exponential { base_ms } => base_ms.saturating_mul(1u64 << attempt.min(20)),
        };
        Duration::from_millis(millis.min(MAX_BACKOFF_MS))
    }

    /// Apply full jitter: a uniformly random delay in `[0, calculate_delay(attempt)]`.
    #[must_use]
    pub fn calculate_delay_with_jitter(&self, attempt: u32) -> Duration {
        let max = self.calculate_delay(attempt);
        if max.is_zero() {
            return max;
        }
        let jittered_ms = rand::Rng::gen_range(&mut rand::thread_rng(), 0..=max.as_millis() as u64);
        Duration::from_millis(jittered_ms)
    }
}

/// Per-provider request budget.
#[derive(Debug, Clone)]
pub struct ProviderLimits {
    pub requests_per_minute: u32,
    pub allow_burst: bool,
}

impl ProviderLimits {
    #[must_use]
    pub fn generic() -> Self {
        Self {
            requests_per_minute: 60,
            allow_burst: false,
        }
    }

    #[must_use]
    pub fn openai() -> Self {
        Self {
            requests_per_minute: 3_500,
            allow_burst: true,
        }
    }

    #[must_use]
    pub fn duckduckgo() -> Self {
        Self {
            requests_per_minute: 20,
            allow_burst: false,
        }
    }

    #[must_use]
    pub fn for_provider(name: &str) -> Self {
        match name {
            "openai" => Self::openai(),
            "duckduckgo" => Self::duckduckgo(),
            _ => Self::generic(),
        }
    }

    /// Per-tier request budget, matching the tenancy usage accountant's
    /// `api_calls_hourly` limits expressed per-minute.
    #[must_use]
    pub fn for_tenant_tier(tier: archon_core::types::tenant::SubscriptionTier) -> Self {
        use archon_core::types::tenant::SubscriptionTier as T;
        let requests_per_minute = match tier {
            T::Free => 100 / 60 + 2,
            T::Starter => 1_000 / 60 + 2,
            T::Professional => 5_000 / 60 + 2,
            T::Enterprise => 50_000 / 60 + 2,
        };
        Self {
            requests_per_minute,
            allow_burst: matches!(tier, T::Professional | T::Enterprise),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("rate limit exceeded, retry after {retry_after_secs}s")]
    Exceeded { retry_after_secs: u64 },
    #[error("unknown provider {0}")]
    UnknownProvider(String),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RateLimitMetrics {
    pub requests_allowed: u64,
    pub requests_denied: u64,
}

struct TokenBucket {
    limits: ProviderLimits,
    tokens: f64,
    last_refill: Instant,
    metrics: RateLimitMetrics,
}

impl TokenBucket {
    fn new(limits: ProviderLimits) -> Self {
        let capacity = f64::from(limits.requests_per_minute);
        Self {
            limits,
            tokens: capacity,
            last_refill: Instant::now(),
            metrics: RateLimitMetrics::default(),
        }
    }

    fn refill(&mut self) {
        let capacity = f64::from(self.limits.requests_per_minute);
        let elapsed = self.last_refill.elapsed().as_secs_f64();
        let refill_rate_per_sec = capacity / 60.0;
        self.tokens = (self.tokens + elapsed * refill_rate_per_sec).min(capacity);
        self.last_refill = Instant::now();
    }

    fn try_consume(&mut self) -> Result<(), RateLimitError> {
        self.refill();
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            self.metrics.requests_allowed += 1;
            Ok(())
        } else {
            self.metrics.requests_denied += 1;
            let refill_rate_per_sec = f64::from(self.limits.requests_per_minute) / 60.0;
            let retry_after_secs = if refill_rate_per_sec > 0.0 { (1.0 / refill_rate_per_sec).ceil() as u64 } else { 60 };
            Err(RateLimitError::Exceeded { retry_after_secs })
        }
    }
}

/// Token-bucket rate limiter keyed by provider (or tenant id, when used at
/// the admission boundary in `archon-tenancy`).
#[derive(Clone)]
pub struct ProviderRateLimiter {
    buckets: Arc<DashMap<String, Mutex<TokenBucket>>>,
}

impl Default for ProviderRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderRateLimiter {
    #[must_use]
    pub fn new() -> Self {
        Self { buckets: Arc::new(DashMap::new()) }
    }

    pub async fn with_configs(configs: HashMap<String, ProviderLimits>) -> Result<Self, RateLimitError> {
        let limiter = Self::new();
        for (name, limits) in configs {
            limiter.add_provider(&name, limits).await?;
        }
        Ok(limiter)
    }

    pub async fn add_provider(&self, name: &str, limits: ProviderLimits) -> Result<(), RateLimitError> {
        self.buckets.insert(name.to_string(), Mutex::new(TokenBucket::new(limits)));
        Ok(())
    }

    pub async fn check_rate_limit(&self, name: &str) -> Result<(), RateLimitError> {
        let bucket = self
            .buckets
            .entry(name.to_string())
            .or_insert_with(|| Mutex::new(TokenBucket::new(ProviderLimits::for_provider(name))));
        bucket.lock().await.try_consume()
    }

    pub async fn get_metrics(&self, name: &str) -> Option<RateLimitMetrics> {
        let bucket = self.buckets.get(name)?;
        Some(bucket.lock().await.metrics)
    }

    pub async fn get_all_metrics(&self) -> HashMap<String, RateLimitMetrics> {
        let mut out = HashMap::new();
        for entry in self.buckets.iter() {
            out.insert(entry.key().clone(), entry.value().lock().await.metrics);
        }
        out
    }

    /// Retry `op` with exponential-backoff-with-jitter on error, up to
    /// `max_attempts` (default 3, matching the dispatcher's provider retry
    /// budget). Does not itself consult the token bucket; callers check
    /// `check_rate_limit` before invoking.
    pub async fn execute_with_retry<F, T>(&self, _provider: &str, mut op: F) -> Result<T, Box<dyn std::error::Error + Send + Sync>>
    where
        F: FnMut() -> Pin<Box<dyn Future<Output = Result<T, Box<dyn std::error::Error + Send + Sync>>> + Send>>,
    {
        let strategy = BackoffStrategy::Exponential { base_ms: 500 };
        let max_attempts = 3u32;
        let mut last_err = None;

        for attempt in 0..max_attempts {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    last_err = Some(err);
                    if attempt + 1 < max_attempts {
                        tokio::time::sleep(strategy.calculate_delay(attempt)).await;
                    }
                }
            }
        }

        Err(last_err.expect("loop runs at least once"))
    }
}

/// Rate-limit metadata parsed from an HTTP response's headers, used to
/// reconcile the local token bucket with the provider's own accounting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateLimitInfo {
    pub remaining: Option<u64>,
    pub limit: Option<u64>,
    pub reset_at: Option<u64>,
    pub retry_after: Option<Duration>,
}

impl RateLimitInfo {
    #[must_use]
    pub fn wait_time(&self) -> Option<Duration> {
        if self.remaining == Some(0) {
            return Some(self.retry_after.unwrap_or(Duration::from_secs(1)));
        }
        None
    }

    #[cfg(feature = "rate-limiting-http")]
    #[must_use]
    pub fn from_headers(headers: &reqwest::header::HeaderMap) -> Self {
        let parse_u64 = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).and_then(|s| s.parse::<u64>().ok());

        Self {
            remaining: parse_u64("x-ratelimit-remaining"),
            limit: parse_u64("x-ratelimit-limit"),
            reset_at: parse_u64("x-ratelimit-reset"),
            retry_after: parse_u64("retry-after").map(Duration::from_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_backoff_increases_by_fixed_increment() {
        let strategy = BackoffStrategy::Linear { increment_ms: 100 };
        assert_eq!(strategy.calculate_delay(0), Duration::from_millis(100));
        assert_eq!(strategy.calculate_delay(2), Duration::from_millis(300));
    }

    #[test]
    fn exponential_backoff_doubles_and_caps() {
        let strategy = BackoffStrategy::Exponential { base_ms: 100 };
        assert_eq!(strategy.calculate_delay(0), Duration::from_millis(100));
        assert_eq!(strategy.calculate_delay(3), Duration::from_millis(800));
        assert_eq!(strategy.calculate_delay(20), Duration::from_millis(MAX_BACKOFF_MS));
    }

    #[test]
    fn provider_limits_differ_by_name() {
        assert_eq!(ProviderLimits::openai().requests_per_minute, 3_500);
        assert_eq!(ProviderLimits::duckduckgo().requests_per_minute, 20);
        assert_eq!(ProviderLimits::for_provider("unknown").requests_per_minute, 60);
    }

    #[tokio::test]
    async fn first_request_is_always_allowed() {
        let limiter = ProviderRateLimiter::new();
        limiter.add_provider("test_api", ProviderLimits::generic()).await.unwrap();
        assert!(limiter.check_rate_limit("test_api").await.is_ok());
        let metrics = limiter.get_metrics("test_api").await.unwrap();
        assert_eq!(metrics.requests_allowed, 1);
    }

    #[tokio::test]
    async fn exhausting_the_bucket_denies_further_requests() {
        let limiter = ProviderRateLimiter::new();
        limiter
            .add_provider("low_limit", ProviderLimits { requests_per_minute: 1, allow_burst: false })
            .await
            .unwrap();
        assert!(limiter.check_rate_limit("low_limit").await.is_ok());
        assert!(limiter.check_rate_limit("low_limit").await.is_err());
    }

    #[tokio::test]
    async fn retry_succeeds_after_transient_failures() {
        let limiter = ProviderRateLimiter::new();
        let attempts = Arc::new(std::sync::atomic::AtomicU32::new(0));
        let attempts_clone = Arc::clone(&attempts);

        let result = limiter
            .execute_with_retry("test_provider", move || {
                let attempts = Arc::clone(&attempts_clone);
                Box::pin(async move {
                    let count = attempts.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                    if count < 2 {
                        Err(Box::new(std::io::Error::other("rate limit exceeded")) as Box<dyn std::error::Error + Send + Sync>)
                    } else {
                        Ok("success".to_string())
                    }
                })
            })
            .await;

        assert_eq!(result.unwrap(), "success");
        assert_eq!(attempts.load(std::sync::atomic::Ordering::SeqCst), 3);
    }
}
