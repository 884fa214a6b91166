//! Domain layer containing core types, traits, and error definitions.

pub mod env_vars;
pub mod error;
pub mod traits;
pub mod types;

pub use error::{AnalysisError, AppError, ConfigError, DatabaseError, NotebookError};
pub use traits::{DatabaseConnector, DatabaseHandle, EnvSource};
pub use types::{
    ConnectionProfile, DatabaseKind, MariaDbProfile, MssqlProfile, NotebookServerConfig,
    ProbeReport, ProfileSummary, DEFAULT_HOST, MARIADB_CHARSET, MARIADB_DEFAULT_PORT,
    MSSQL_DEFAULT_PORT, MSSQL_DEFAULT_TDS_VERSION,
};
