//! Application service layer.
//!
//! Resolves profiles from an environment source and drives the connector
//! through the trait abstractions, so the same flow runs against real
//! drivers or test doubles.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, instrument, warn};

use crate::domain::{
    AppError, ConnectionProfile, DatabaseConnector, DatabaseHandle, DatabaseKind, EnvSource,
    ProbeReport,
};

use super::resolver;

/// Opens connections described by the environment.
///
/// # Example
///
/// ```ignore
/// let service = ProbeService::new(Arc::new(ProcessEnv), Arc::new(DriverConnector));
/// let mut handle = service.open(DatabaseKind::MariaDb).await?;
/// handle.ping().await?;
/// handle.close().await?;
/// ```
pub struct ProbeService {
    env: Arc<dyn EnvSource + Send + Sync>,
    connector: Arc<dyn DatabaseConnector>,
}

impl ProbeService {
    #[must_use]
    pub fn new(
        env: Arc<dyn EnvSource + Send + Sync>,
        connector: Arc<dyn DatabaseConnector>,
    ) -> Self {
        Self { env, connector }
    }

    /// Resolves the profile for `kind` from the configured environment.
    pub fn profile(&self, kind: DatabaseKind) -> Result<ConnectionProfile, AppError> {
        Ok(resolver::resolve(self.env.as_ref(), kind)?)
    }

    /// Resolves and connects. The caller owns the returned handle and must
    /// close it.
    #[instrument(skip(self))]
    pub async fn open(&self, kind: DatabaseKind) -> Result<Box<dyn DatabaseHandle>, AppError> {
        let profile = self.profile(kind)?;
        self.connector.connect(&profile).await
    }

    /// Connects, pings and closes.
    ///
    /// The handle is closed whether or not the ping succeeded. Resolution
    /// errors are returned as `Err`; driver errors are captured in the report.
    #[instrument(skip(self))]
    pub async fn probe(&self, kind: DatabaseKind) -> Result<ProbeReport, AppError> {
        let profile = self.profile(kind)?;
        let descriptor = profile.summary().descriptor;
        let started = Instant::now();

        let outcome = match self.connector.connect(&profile).await {
            Ok(mut handle) => {
                let pinged = handle.ping().await;
                let closed = handle.close().await;
                pinged.and(closed)
            }
            Err(e) => Err(e),
        };
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let report = match outcome {
            Ok(()) => {
                info!(%kind, elapsed_ms, "Database reachable");
                ProbeReport {
                    kind,
                    descriptor,
                    reachable: true,
                    elapsed_ms,
                    error: None,
                }
            }
            Err(e) => {
                warn!(%kind, error = %e, "Database probe failed");
                ProbeReport {
                    kind,
                    descriptor,
                    reachable: false,
                    elapsed_ms,
                    error: Some(e.to_string()),
                }
            }
        };
        Ok(report)
    }
}
