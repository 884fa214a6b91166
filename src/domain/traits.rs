//! Domain traits defining contracts for external systems.

use std::collections::HashMap;

use async_trait::async_trait;

use super::error::AppError;
use super::types::{ConnectionProfile, DatabaseKind};

/// Read-only view of a string-to-string environment.
///
/// Resolution never mutates the source, so the same source always yields
/// the same profile.
pub trait EnvSource {
    /// Returns the raw value of `key`, if present.
    fn var(&self, key: &str) -> Option<String>;

    /// Returns the value of `key`, treating an empty string as unset.
    fn non_empty(&self, key: &str) -> Option<String> {
        self.var(key).filter(|v| !v.is_empty())
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl EnvSource for HashMap<&str, &str> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).map(|v| (*v).to_string())
    }
}

/// An open connection to one database.
///
/// Closing is the caller's job; dropping a handle without calling
/// [`DatabaseHandle::close`] leaves the shutdown to the driver.
#[async_trait]
pub trait DatabaseHandle: Send {
    fn kind(&self) -> DatabaseKind;

    /// Round-trips a trivial query.
    async fn ping(&mut self) -> Result<(), AppError>;

    /// Closes the connection.
    async fn close(self: Box<Self>) -> Result<(), AppError>;
}

/// Opens handles for resolved profiles.
#[async_trait]
pub trait DatabaseConnector: Send + Sync {
    /// Opens a connection, or returns the driver's error. Never retries.
    async fn connect(
        &self,
        profile: &ConnectionProfile,
    ) -> Result<Box<dyn DatabaseHandle>, AppError>;
}
