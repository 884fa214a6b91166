//! Mock implementations for testing.
//!
//! These mocks provide in-memory implementations of domain traits
//! that can be configured to simulate connection and ping failures.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::domain::{
    AppError, ConnectionProfile, DatabaseConnector, DatabaseError, DatabaseHandle, DatabaseKind,
};

/// Configuration for mock behavior.
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// If true, `connect` fails.
    pub should_fail: bool,
    /// If true, `ping` on returned handles fails.
    pub fail_ping: bool,
    /// Custom error message for failures.
    pub error_message: Option<String>,
}

impl MockConfig {
    #[must_use]
    pub fn success() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            should_fail: true,
            fail_ping: false,
            error_message: Some(message.into()),
        }
    }

    // Mimics the error type the real driver for `kind` would raise.
    fn error(&self, kind: DatabaseKind) -> AppError {
        let msg = self
            .error_message
            .clone()
            .unwrap_or_else(|| "Mock driver error".to_string());
        match kind {
            DatabaseKind::Mssql => {
                AppError::Database(DatabaseError::Mssql(tiberius::error::Error::Protocol(
                    msg.into(),
                )))
            }
            DatabaseKind::MariaDb => {
                AppError::Database(DatabaseError::MariaDb(sqlx::Error::Protocol(msg)))
            }
        }
    }
}

#[derive(Default)]
struct Counters {
    connects: AtomicU64,
    pings: AtomicU64,
    closes: AtomicU64,
}

/// Mock connector that hands out in-memory handles.
///
/// # Example
///
/// ```ignore
/// use datalab::test_utils::{MockConnector, mocks::MockConfig};
///
/// let ok = MockConnector::new();
/// let failing = MockConnector::with_config(MockConfig::failure("login failed"));
/// ```
pub struct MockConnector {
    config: MockConfig,
    counters: Arc<Counters>,
    last_profile: Mutex<Option<ConnectionProfile>>,
}

impl MockConnector {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MockConfig::success())
    }

    #[must_use]
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            config,
            counters: Arc::new(Counters::default()),
            last_profile: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_config(MockConfig::failure(message))
    }

    /// Handles from this connector fail on `ping`.
    #[must_use]
    pub fn with_failing_ping(mut self) -> Self {
        self.config.fail_ping = true;
        self
    }

    pub fn connect_count(&self) -> u64 {
        self.counters.connects.load(Ordering::Relaxed)
    }

    pub fn ping_count(&self) -> u64 {
        self.counters.pings.load(Ordering::Relaxed)
    }

    pub fn closed_count(&self) -> u64 {
        self.counters.closes.load(Ordering::Relaxed)
    }

    /// Profile passed to the most recent `connect` call.
    pub fn last_profile(&self) -> Option<ConnectionProfile> {
        self.last_profile.lock().unwrap().clone()
    }
}

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatabaseConnector for MockConnector {
    async fn connect(
        &self,
        profile: &ConnectionProfile,
    ) -> Result<Box<dyn DatabaseHandle>, AppError> {
        self.counters.connects.fetch_add(1, Ordering::Relaxed);
        *self.last_profile.lock().unwrap() = Some(profile.clone());

        if self.config.should_fail {
            return Err(self.config.error(profile.kind()));
        }
        Ok(Box::new(MockHandle {
            kind: profile.kind(),
            config: self.config.clone(),
            counters: Arc::clone(&self.counters),
        }))
    }
}

/// Handle returned by [`MockConnector`].
pub struct MockHandle {
    kind: DatabaseKind,
    config: MockConfig,
    counters: Arc<Counters>,
}

#[async_trait]
impl DatabaseHandle for MockHandle {
    fn kind(&self) -> DatabaseKind {
        self.kind
    }

    async fn ping(&mut self) -> Result<(), AppError> {
        self.counters.pings.fetch_add(1, Ordering::Relaxed);
        if self.config.fail_ping {
            return Err(self.config.error(self.kind));
        }
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<(), AppError> {
        self.counters.closes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
