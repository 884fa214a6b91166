//! Concrete database client implementations.
//!
//! This module contains the driver-backed adapters that implement the
//! `DatabaseConnector` and `DatabaseHandle` traits defined in the domain layer.

pub mod mariadb;
pub mod mssql;

use async_trait::async_trait;
use tracing::instrument;

use crate::domain::{AppError, ConnectionProfile, DatabaseConnector, DatabaseHandle};

pub use mariadb::MariaDbHandle;
pub use mssql::MssqlHandle;

/// Connector that dispatches to the real drivers.
#[derive(Debug, Clone, Copy, Default)]
pub struct DriverConnector;

#[async_trait]
impl DatabaseConnector for DriverConnector {
    #[instrument(skip(self, profile), fields(kind = %profile.kind()))]
    async fn connect(
        &self,
        profile: &ConnectionProfile,
    ) -> Result<Box<dyn DatabaseHandle>, AppError> {
        match profile {
            ConnectionProfile::Mssql(p) => Ok(Box::new(MssqlHandle::connect(p).await?)),
            ConnectionProfile::MariaDb(p) => Ok(Box::new(MariaDbHandle::connect(p).await?)),
        }
    }
}
