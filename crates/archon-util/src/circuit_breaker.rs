//! ABOUTME: Per-(provider,model) circuit breaker: opens after consecutive failures
//! ABOUTME: and short-circuits calls until a cool-down elapses and a probe succeeds

use dashmap::DashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(thiserror::Error, Debug)]
pub enum CircuitBreakerError<E> {
    #[error("circuit is open")]
    Open,
    #[error(transparent)]
    Inner(#[from] E),
}

type AlertHandler = Arc<dyn Fn(String) + Send + Sync>;

/// Tunable thresholds for a single circuit breaker.
#[derive(Clone)]
pub struct CircuitBreakerConfig {
    pub failure_threshold_count: u32,
    pub success_threshold_count: u32,
    pub reset_timeout: Duration,
    alert_handler: Option<AlertHandler>,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold_count: 5,
            success_threshold_count: 1,
            reset_timeout: Duration::from_secs(30),
            alert_handler: None,
        }
    }
}

impl CircuitBreakerConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_failure_threshold(mut self, count: u32) -> Self {
        self.failure_threshold_count = count;
        self
    }

    #[must_use]
    pub fn with_success_threshold(mut self, count: u32) -> Self {
        self.success_threshold_count = count;
        self
    }

    #[must_use]
    pub fn with_reset_timeout(mut self, timeout: Duration) -> Self {
        self.reset_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_alert_handler(mut self, handler: impl Fn(String) + Send + Sync + 'static) -> Self {
        self.alert_handler = Some(Arc::new(handler));
        self
    }
}

/// Presets for common service shapes, per spec §4.5's (provider, model) resilience knobs.
pub struct ServicePresets;

impl ServicePresets {
    #[must_use]
    pub fn http_api() -> CircuitBreakerConfig {
        CircuitBreakerConfig::new().with_failure_threshold(5).with_reset_timeout(Duration::from_secs(30))
    }

    #[must_use]
    pub fn database() -> CircuitBreakerConfig {
        CircuitBreakerConfig::new().with_failure_threshold(3).with_reset_timeout(Duration::from_secs(60))
    }

    #[must_use]
    pub fn critical_service() -> CircuitBreakerConfig {
        CircuitBreakerConfig::new().with_failure_threshold(2).with_reset_timeout(Duration::from_secs(300))
    }

    #[must_use]
    pub fn high_volume() -> CircuitBreakerConfig {
        CircuitBreakerConfig::new().with_failure_threshold(10).with_reset_timeout(Duration::from_secs(15))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CircuitMetrics {
    pub total_allowed: u64,
    pub total_successes: u64,
    pub total_failures: u64,
    pub current_state: CircuitStateSnapshot,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CircuitStateSnapshot {
    #[default]
    Closed,
    Open,
    HalfOpen,
}

impl CircuitMetrics {
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        let total = self.total_successes + self.total_failures;
        if total == 0 {
            return 100.0;
        }
        (self.total_successes as f64 / total as f64) * 100.0
    }

    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.success_rate() > 95.0
    }

    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.success_rate() < 90.0
    }
}

struct Inner {
    state: CircuitState,
    consecutive_failures: u32,
    consecutive_successes: u32,
    opened_at: Option<Instant>,
    total_allowed: u64,
    total_successes: u64,
    total_failures: u64,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            state: CircuitState::Closed,
            consecutive_failures: 0,
            consecutive_successes: 0,
            opened_at: None,
            total_allowed: 0,
            total_successes: 0,
            total_failures: 0,
        }
    }
}

/// A single circuit breaker, guarding calls to one (provider, model) pair.
pub struct CircuitBreaker {
    config: CircuitBreakerConfig,
    inner: RwLock<Inner>,
}

impl CircuitBreaker {
    #[must_use]
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            config,
            inner: RwLock::new(Inner::default()),
        }
    }

    pub async fn current_state(&self) -> CircuitState {
        self.inner.read().await.state
    }

    /// Admit a request if the circuit is closed or half-open (after cool-down).
    /// Transitions `Open` -> `HalfOpen` when the reset timeout has elapsed.
    pub async fn allow_request(&self) -> Result<(), CircuitBreakerError<std::convert::Infallible>> {
        let mut inner = self.inner.write().await;

        if inner.state == CircuitState::Open {
            if let Some(opened_at) = inner.opened_at {
                if opened_at.elapsed() >= self.config.reset_timeout {
                    inner.state = CircuitState::HalfOpen;
                    inner.consecutive_successes = 0;
                }
            }
        }

        if inner.state == CircuitState::Open {
            return Err(CircuitBreakerError::Open);
        }

        inner.total_allowed += 1;
        Ok(())
    }

    pub async fn record_success(&self) {
        let mut inner = self.inner.write().await;
        inner.total_successes += 1;
        inner.consecutive_failures = 0;

        match inner.state {
            CircuitState::HalfOpen => {
                inner.consecutive_successes += 1;
                if inner.consecutive_successes >= self.config.success_threshold_count {
                    inner.state = CircuitState::Closed;
                    inner.opened_at = None;
                }
            }
            CircuitState::Closed => {}
            CircuitState::Open => {}
        }
    }

    pub async fn record_failure(&self) {
        let mut inner = self.inner.write().await;
        inner.total_failures += 1;
        inner.consecutive_successes = 0;

        match inner.state {
            CircuitState::HalfOpen => {
                self.open(&mut inner);
            }
            CircuitState::Closed => {
                inner.consecutive_failures += 1;
                if inner.consecutive_failures >= self.config.failure_threshold_count {
                    self.open(&mut inner);
                }
            }
            CircuitState::Open => {}
        }
    }

    fn open(&self, inner: &mut Inner) {
        inner.state = CircuitState::Open;
        inner.opened_at = Some(Instant::now());
        if let Some(handler) = &self.config.alert_handler {
            handler(format!("Circuit opened after {} consecutive failures", inner.consecutive_failures));
        }
    }

    pub async fn force_state(&self, state: CircuitState) {
        let mut inner = self.inner.write().await;
        inner.state = state;
        if state == CircuitState::Open {
            inner.opened_at = Some(Instant::now());
        }
        if state == CircuitState::Closed {
            inner.consecutive_failures = 0;
            inner.opened_at = None;
        }
    }

    pub async fn metrics(&self) -> CircuitMetrics {
        let inner = self.inner.read().await;
        CircuitMetrics {
            total_allowed: inner.total_allowed,
            total_successes: inner.total_successes,
            total_failures: inner.total_failures,
            current_state: match inner.state {
                CircuitState::Closed => CircuitStateSnapshot::Closed,
                CircuitState::Open => CircuitStateSnapshot::Open,
                CircuitState::HalfOpen => CircuitStateSnapshot::HalfOpen,
            },
        }
    }

    /// Run `op` if the circuit admits it, recording the outcome.
    pub async fn execute<F, T, E>(&self, op: F) -> Result<T, CircuitBreakerError<E>>
    where
        F: FnOnce() -> Pin<Box<dyn Future<Output = Result<T, E>> + Send>>,
    {
        self.allow_request().await.map_err(|_| CircuitBreakerError::Open)?;

        match op().await {
            Ok(value) => {
                self.record_success().await;
                Ok(value)
            }
            Err(err) => {
                self.record_failure().await;
                Err(CircuitBreakerError::Inner(err))
            }
        }
    }
}

/// Registry of named circuit breakers, one per (provider, model) key.
#[derive(Default)]
pub struct CircuitBreakerManager {
    breakers: DashMap<String, Arc<CircuitBreaker>>,
    default_config: Option<fn() -> CircuitBreakerConfig>,
}

impl CircuitBreakerManager {
    #[must_use]
    pub fn with_default_config(default_config: fn() -> CircuitBreakerConfig) -> Self {
        Self {
            breakers: DashMap::new(),
            default_config: Some(default_config),
        }
    }

    pub async fn configure_service(&self, name: &str, config: CircuitBreakerConfig) {
        self.breakers.insert(name.to_string(), Arc::new(CircuitBreaker::new(config)));
    }

    pub async fn get_or_create(&self, name: &str) -> Arc<CircuitBreaker> {
        if let Some(existing) = self.breakers.get(name) {
            return Arc::clone(&existing);
        }
        let config = self.default_config.map_or_else(CircuitBreakerConfig::default, |f| f());
        let breaker = Arc::new(CircuitBreaker::new(config));
        self.breakers.insert(name.to_string(), Arc::clone(&breaker));
        breaker
    }

    pub async fn execute<F, T, E>(&self, name: &str, op: F) -> Result<T, CircuitBreakerError<E>>
    where
        F: FnOnce() -> Pin<Box<dyn Future<Output = Result<T, E>> + Send>>,
    {
        let breaker = self.get_or_create(name).await;
        breaker.execute(op).await
    }

    pub async fn all_metrics(&self) -> std::collections::HashMap<String, CircuitMetrics> {
        let mut out = std::collections::HashMap::new();
        for entry in &self.breakers {
            out.insert(entry.key().clone(), entry.value().metrics().await);
        }
        out
    }

    pub async fn open_circuits(&self) -> Vec<String> {
        let mut open = Vec::new();
        for entry in &self.breakers {
            if entry.value().current_state().await == CircuitState::Open {
                open.push(entry.key().clone());
            }
        }
        open
    }
}
