// ABOUTME: Circuit breaker pattern implementation for weather provider calls
// ABOUTME: Fails fast while the provider is down and probes it again after a cool-down
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::future::Future;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::constants::circuit_breaker::{
    DEFAULT_FAILURE_THRESHOLD, DEFAULT_HALF_OPEN_MAX_CALLS, DEFAULT_RECOVERY_TIMEOUT_SECS,
};
use crate::errors::ProviderError;

/// Circuit breaker states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Normal operation - requests pass through
    Closed,
    /// Circuit is open - requests fail immediately
    Open,
    /// Testing recovery - a limited number of trial requests pass through
    HalfOpen,
}

impl CircuitState {
    /// Lowercase name used in health output
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Open => "open",
            Self::HalfOpen => "half_open",
        }
    }

    /// Convert from atomic representation
    const fn from_u32(value: u32) -> Self {
        match value {
            0 => Self::Closed,
            1 => Self::Open,
            _ => Self::HalfOpen,
        }
    }

    /// Convert to atomic representation
    const fn to_u32(self) -> u32 {
        match self {
            Self::Closed => 0,
            Self::Open => 1,
            Self::HalfOpen => 2,
        }
    }
}

/// Configuration for circuit breaker behavior
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitBreakerConfig {
    /// Number of consecutive failures before opening circuit
    pub failure_threshold: u32,
    /// Duration to wait before attempting recovery (half-open state)
    pub recovery_timeout: Duration,
    /// Trial calls admitted while half-open
    pub half_open_max_calls: u32,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            recovery_timeout: Duration::from_secs(DEFAULT_RECOVERY_TIMEOUT_SECS),
            half_open_max_calls: DEFAULT_HALF_OPEN_MAX_CALLS,
        }
    }
}

impl CircuitBreakerConfig {
    /// Create a new circuit breaker configuration
    #[must_use]
    pub const fn new(
        failure_threshold: u32,
        recovery_timeout: Duration,
        half_open_max_calls: u32,
    ) -> Self {
        Self {
            failure_threshold,
            recovery_timeout,
            half_open_max_calls,
        }
    }

    /// Stricter configuration for unreliable providers
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            failure_threshold: 3,
            recovery_timeout: Duration::from_secs(60),
            half_open_max_calls: 1,
        }
    }

    /// Lenient configuration for generally reliable providers
    #[must_use]
    pub const fn lenient() -> Self {
        Self {
            failure_threshold: 10,
            recovery_timeout: Duration::from_secs(15),
            half_open_max_calls: 3,
        }
    }
}

fn pack_trial_slots(window: u32, issued: u32) -> u64 {
    (u64::from(window) << 32) | u64::from(issued)
}

#[allow(clippy::cast_possible_truncation)]
const fn unpack_trial_slots(word: u64) -> (u32, u32) {
    ((word >> 32) as u32, word as u32)
}

/// Ticket returned by a guard for one admitted call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    trial_window: Option<u32>,
}

impl Admission {
    /// Admission that does not consume a rationed slot
    #[must_use]
    pub const fn regular() -> Self {
        Self { trial_window: None }
    }

    /// Admission holding a trial slot in the given half-open window
    #[must_use]
    pub const fn trial(window: u32) -> Self {
        Self {
            trial_window: Some(window),
        }
    }

    /// Whether this call is a recovery trial
    #[must_use]
    pub const fn is_trial(self) -> bool {
        self.trial_window.is_some()
    }
}

/// Admission control in front of an external dependency
///
/// Constructed once at startup and shared by handle, so tests can substitute
/// a fake implementation.
pub trait FaultGuard: Send + Sync {
    /// Ask permission to make one upstream call
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::CircuitOpen` when the call must fail fast
    fn try_acquire(&self) -> Result<Admission, ProviderError>;

    /// Report that an admitted call succeeded
    fn record_success(&self);

    /// Report that an admitted call failed in a way that implicates the dependency
    fn record_failure(&self);

    /// Report that an admitted call was dropped before it produced an outcome
    ///
    /// Guards that ration admissions hand the slot back here.
    fn release(&self, _admission: Admission) {}

    /// Current breaker state
    fn state(&self) -> CircuitState;
}

/// Run `operation` under `guard`, reporting its outcome
///
/// The operation future is only polled after the guard admits the call, so a
/// rejected call never reaches the network. Failures that do not implicate the
/// provider (see `ProviderError::is_retryable`) count as a healthy response.
/// If the returned future is dropped mid-call (a caller deadline firing, say),
/// the admission is released instead of being left outstanding.
///
/// # Errors
///
/// Returns `ProviderError::CircuitOpen` when rejected, otherwise the operation's error
pub async fn guarded_call<G, F, T>(guard: &G, operation: F) -> Result<T, ProviderError>
where
    G: FaultGuard + ?Sized,
    F: Future<Output = Result<T, ProviderError>>,
{
    let admission = guard.try_acquire()?;
    let mut pending = PendingCall {
        guard,
        admission,
        settled: false,
    };

    let outcome = operation.await;
    pending.settled = true;

    match outcome {
        Ok(result) => {
            guard.record_success();
            Ok(result)
        }
        Err(e) => {
            if e.is_retryable() {
                guard.record_failure();
            } else {
                guard.record_success();
            }
            Err(e)
        }
    }
}

/// Admitted call whose outcome has not been reported yet
struct PendingCall<'a, G: FaultGuard + ?Sized> {
    guard: &'a G,
    admission: Admission,
    settled: bool,
}

impl<G: FaultGuard + ?Sized> Drop for PendingCall<'_, G> {
    fn drop(&mut self) {
        if !self.settled {
            self.guard.release(self.admission);
        }
    }
}

/// Thread-safe circuit breaker for external API calls
///
/// # States
///
/// - **Closed**: Normal operation, requests pass through. Consecutive failures are counted.
/// - **Open**: Tripped after `failure_threshold` failures. All requests fail immediately.
/// - **Half-Open**: After `recovery_timeout`, up to `half_open_max_calls` trial requests
///   pass. One success closes the circuit, one failure reopens it.
///
/// # Thread Safety
///
/// All state is held in atomics. Each transition is a single compare-and-swap on
/// the state word, and only the caller that wins it touches the trial slots.
/// Trial slots are tagged with the half-open window that issued them, so a slot
/// claimed or returned across a transition never leaks into a later window.
pub struct CircuitBreaker {
    /// Provider name for logging and error messages
    provider_name: String,
    /// Current state (0=Closed, 1=Open, 2=HalfOpen)
    state: AtomicU32,
    /// Count of consecutive failures while closed
    failure_count: AtomicU32,
    /// Half-open window number (high 32 bits) and trial calls issued in it (low 32 bits)
    trial_slots: AtomicU64,
    /// Milliseconds since `start_instant` when the circuit last opened
    opened_at_ms: AtomicU64,
    /// Configuration for thresholds and timeouts
    config: CircuitBreakerConfig,
    /// Start time for calculating elapsed durations
    start_instant: Instant,
}

impl CircuitBreaker {
    /// Create a new circuit breaker with default configuration
    #[must_use]
    pub fn new(provider_name: &str) -> Self {
        Self::with_config(provider_name, CircuitBreakerConfig::default())
    }

    /// Create a new circuit breaker with custom configuration
    #[must_use]
    pub fn with_config(provider_name: &str, config: CircuitBreakerConfig) -> Self {
        Self {
            provider_name: provider_name.to_owned(),
            state: AtomicU32::new(CircuitState::Closed.to_u32()),
            failure_count: AtomicU32::new(0),
            trial_slots: AtomicU64::new(pack_trial_slots(0, 0)),
            opened_at_ms: AtomicU64::new(0),
            config,
            start_instant: Instant::now(),
        }
    }

    /// Get current circuit state
    #[must_use]
    pub fn state(&self) -> CircuitState {
        CircuitState::from_u32(self.state.load(Ordering::SeqCst))
    }

    /// Get current failure count
    #[must_use]
    pub fn failure_count(&self) -> u32 {
        self.failure_count.load(Ordering::SeqCst)
    }

    /// Check if circuit allows a request, consuming a trial slot when half-open
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        self.admit().is_some()
    }

    fn admit(&self) -> Option<Admission> {
        match self.state() {
            CircuitState::Closed => Some(Admission::regular()),
            CircuitState::Open => {
                if self.should_attempt_recovery() {
                    self.take_trial_slot().map(Admission::trial)
                } else {
                    None
                }
            }
            CircuitState::HalfOpen => self.take_trial_slot().map(Admission::trial),
        }
    }

    /// Move from open to half-open once the cool-down has elapsed
    fn should_attempt_recovery(&self) -> bool {
        if self.millis_since_open() < self.recovery_millis() {
            return false;
        }

        let transitioned = self
            .state
            .compare_exchange(
                CircuitState::Open.to_u32(),
                CircuitState::HalfOpen.to_u32(),
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_ok();
        if transitioned {
            info!(
                provider = %self.provider_name,
                "Circuit breaker transitioning to half-open state for recovery test"
            );
        }
        // Another caller may have won the transition; either way we are half-open now
        self.state() == CircuitState::HalfOpen
    }

    /// Claim one of the half-open trial slots, returning the window it belongs to
    fn take_trial_slot(&self) -> Option<u32> {
        let max_calls = self.config.half_open_max_calls.max(1);
        let previous = self
            .trial_slots
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |word| {
                let (window, issued) = unpack_trial_slots(word);
                if issued < max_calls {
                    Some(pack_trial_slots(window, issued + 1))
                } else {
                    None
                }
            })
            .ok()?;
        let (window, _) = unpack_trial_slots(previous);

        // The circuit may have re-opened between reading the state and claiming
        if self.state() == CircuitState::HalfOpen && self.trial_window() == window {
            Some(window)
        } else {
            self.return_trial_slot(window);
            None
        }
    }

    /// Give back a trial slot if its window is still current
    fn return_trial_slot(&self, window: u32) -> bool {
        self.trial_slots
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |word| {
                let (current, issued) = unpack_trial_slots(word);
                if current == window && issued > 0 {
                    Some(pack_trial_slots(current, issued - 1))
                } else {
                    None
                }
            })
            .is_ok()
    }

    fn trial_window(&self) -> u32 {
        unpack_trial_slots(self.trial_slots.load(Ordering::SeqCst)).0
    }

    /// Get elapsed time in milliseconds since circuit breaker creation
    fn elapsed_millis(&self) -> u64 {
        // Breakers live for the process lifetime, well within u64 milliseconds
        #[allow(clippy::cast_possible_truncation)]
        {
            self.start_instant.elapsed().as_millis() as u64
        }
    }

    fn recovery_millis(&self) -> u64 {
        #[allow(clippy::cast_possible_truncation)]
        {
            self.config.recovery_timeout.as_millis() as u64
        }
    }

    fn millis_since_open(&self) -> u64 {
        self.elapsed_millis()
            .saturating_sub(self.opened_at_ms.load(Ordering::SeqCst))
    }

    /// Open the circuit from `from`, returning whether this caller made the transition
    fn trip(&self, from: CircuitState) -> bool {
        // Stamped before the swap: a caller that sees Open must not read the previous open time
        self.opened_at_ms.store(self.elapsed_millis(), Ordering::SeqCst);
        let tripped = self
            .state
            .compare_exchange(
                from.to_u32(),
                CircuitState::Open.to_u32(),
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_ok();
        if tripped {
            // Each open period gets a fresh window; slots from earlier windows no longer count
            let fresh = pack_trial_slots(self.trial_window().wrapping_add(1), 0);
            self.trial_slots.store(fresh, Ordering::SeqCst);
        }
        tripped
    }

    /// Record a successful operation
    pub fn record_success(&self) {
        match self.state() {
            CircuitState::Closed => {
                self.failure_count.store(0, Ordering::SeqCst);
            }
            CircuitState::HalfOpen => {
                if self
                    .state
                    .compare_exchange(
                        CircuitState::HalfOpen.to_u32(),
                        CircuitState::Closed.to_u32(),
                        Ordering::SeqCst,
                        Ordering::SeqCst,
                    )
                    .is_ok()
                {
                    self.failure_count.store(0, Ordering::SeqCst);
                    info!(
                        provider = %self.provider_name,
                        "Circuit breaker closed - provider recovered"
                    );
                }
            }
            CircuitState::Open => {
                // Late result from a call admitted before the circuit opened
                debug!(provider = %self.provider_name, "Ignoring success while circuit is open");
            }
        }
    }

    /// Record a failed operation
    pub fn record_failure(&self) {
        match self.state() {
            CircuitState::Closed => {
                let count = self.failure_count.fetch_add(1, Ordering::SeqCst) + 1;
                if count >= self.config.failure_threshold && self.trip(CircuitState::Closed) {
                    warn!(
                        provider = %self.provider_name,
                        failures = count,
                        threshold = self.config.failure_threshold,
                        recovery_timeout_secs = self.config.recovery_timeout.as_secs(),
                        "Circuit breaker opened - provider failing"
                    );
                }
            }
            CircuitState::HalfOpen => {
                if self.trip(CircuitState::HalfOpen) {
                    warn!(
                        provider = %self.provider_name,
                        "Circuit breaker re-opened - recovery test failed"
                    );
                }
            }
            CircuitState::Open => {
                self.opened_at_ms.store(self.elapsed_millis(), Ordering::SeqCst);
            }
        }
    }

    /// Hand back the trial slot of a call that was abandoned mid-flight
    pub fn release(&self, admission: Admission) {
        if let Some(window) = admission.trial_window {
            if self.return_trial_slot(window) {
                debug!(
                    provider = %self.provider_name,
                    "Recovery trial abandoned - slot returned"
                );
            }
        }
    }

    /// Calculate time remaining until recovery can be attempted, rounded up to seconds
    fn time_until_recovery(&self) -> u64 {
        self.recovery_millis()
            .saturating_sub(self.millis_since_open())
            .saturating_add(999)
            / 1000
    }

    /// Force reset the circuit breaker to closed state
    ///
    /// Use sparingly - this should typically only be called during testing
    /// or after manual verification that the provider has recovered.
    pub fn reset(&self) {
        self.state.store(CircuitState::Closed.to_u32(), Ordering::SeqCst);
        self.failure_count.store(0, Ordering::SeqCst);
        info!(
            provider = %self.provider_name,
            "Circuit breaker manually reset to closed state"
        );
    }
}

impl FaultGuard for CircuitBreaker {
    fn try_acquire(&self) -> Result<Admission, ProviderError> {
        self.admit().ok_or_else(|| ProviderError::CircuitOpen {
            provider: self.provider_name.clone(),
            retry_after_secs: self.time_until_recovery(),
        })
    }

    fn record_success(&self) {
        Self::record_success(self);
    }

    fn record_failure(&self) {
        Self::record_failure(self);
    }

    fn release(&self, admission: Admission) {
        Self::release(self, admission);
    }

    fn state(&self) -> CircuitState {
        Self::state(self)
    }
}
