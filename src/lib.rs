//! datalab
//!
//! Reproducible core of a local notebook environment that talks to a
//! SQL-Server-compatible database and a MariaDB/MySQL-compatible database.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               Application Layer              │
//! │  Environment resolver, probe orchestration   │
//! ├─────────────────────────────────────────────┤
//! │                 Domain Layer                 │
//! │  Profiles, traits, errors (no driver code)   │
//! ├─────────────────────────────────────────────┤
//! │             Infrastructure Layer             │
//! │  TDS / MySQL drivers, notebook launcher,     │
//! │  workspace layout, logging                   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! The `analysis` module holds the helpers that notebooks import from the
//! workspace's `utils/` directory.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use datalab::app::ProbeService;
//! use datalab::domain::DatabaseKind;
//! use datalab::infra::{DriverConnector, ProcessEnv};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let service = ProbeService::new(Arc::new(ProcessEnv), Arc::new(DriverConnector));
//!     let mut handle = service.open(DatabaseKind::MariaDb).await?;
//!     handle.ping().await?;
//!     handle.close().await?;
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod app;
pub mod domain;
pub mod infra;

// Test utilities are available in tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
