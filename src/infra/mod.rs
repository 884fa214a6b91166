//! Infrastructure layer implementations.

pub mod database;
pub mod env;
pub mod notebook;
pub mod observability;
pub mod workspace;

pub use database::{DriverConnector, MariaDbHandle, MssqlHandle};
pub use env::ProcessEnv;
pub use observability::{LogFormat, init_tracing};
pub use workspace::WorkspaceLayout;
