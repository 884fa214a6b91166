//! Environment resolver.
//!
//! Maps a fixed set of environment variable names onto typed profiles.
//! Every variable is optional: unset or empty values fall back to the
//! documented default. The only conversion performed is the MariaDB port,
//! which must parse as an integer.

use std::path::PathBuf;

use secrecy::SecretString;
use tracing::{debug, warn};

use crate::domain::types::{
    DEFAULT_HOST, MARIADB_DEFAULT_PORT, MSSQL_DEFAULT_ENCRYPT, MSSQL_DEFAULT_PORT,
    MSSQL_DEFAULT_TDS_VERSION, MSSQL_DEFAULT_TRUST_CERT,
};
use crate::domain::{
    ConfigError, ConnectionProfile, DatabaseKind, EnvSource, MariaDbProfile, MssqlProfile,
    NotebookServerConfig,
};

pub use crate::domain::env_vars::*;

fn or_default(env: &dyn EnvSource, key: &str, default: &str) -> String {
    env.non_empty(key).unwrap_or_else(|| default.to_string())
}

fn secret(env: &dyn EnvSource, key: &str) -> SecretString {
    SecretString::from(env.non_empty(key).unwrap_or_default())
}

/// Resolves the SQL-Server profile. Cannot fail.
pub fn resolve_mssql(env: &dyn EnvSource) -> MssqlProfile {
    let profile = MssqlProfile {
        host: or_default(env, MSSQL_HOST, DEFAULT_HOST),
        port: or_default(env, MSSQL_PORT, MSSQL_DEFAULT_PORT),
        database: or_default(env, MSSQL_DB, ""),
        user: or_default(env, MSSQL_USER, ""),
        password: secret(env, MSSQL_PASSWORD),
        tds_version: or_default(env, MSSQL_TDS_VERSION, MSSQL_DEFAULT_TDS_VERSION),
        encrypt: or_default(env, MSSQL_ENCRYPT, MSSQL_DEFAULT_ENCRYPT),
        trust_cert: or_default(env, MSSQL_TRUST_CERT, MSSQL_DEFAULT_TRUST_CERT),
    };
    debug!(host = %profile.host, port = %profile.port, "Resolved SQL Server profile");
    profile
}

/// Resolves the MariaDB profile.
///
/// # Errors
///
/// Returns [`ConfigError::TypeConversion`] when `MARIADB_PORT` is set to
/// something that is not a valid port number.
pub fn resolve_mariadb(env: &dyn EnvSource) -> Result<MariaDbProfile, ConfigError> {
    let port = match env.non_empty(MARIADB_PORT) {
        Some(raw) => raw
            .trim()
            .parse::<u16>()
            .map_err(|e| ConfigError::type_conversion(MARIADB_PORT, &raw, "u16", e))?,
        None => MARIADB_DEFAULT_PORT,
    };

    let profile = MariaDbProfile {
        host: or_default(env, MARIADB_HOST, DEFAULT_HOST),
        port,
        user: or_default(env, MARIADB_USER, ""),
        password: secret(env, MARIADB_PASSWORD),
        database: or_default(env, MARIADB_DB, ""),
    };
    debug!(host = %profile.host, port = profile.port, "Resolved MariaDB profile");
    Ok(profile)
}

/// Resolves the profile for `kind`.
pub fn resolve(env: &dyn EnvSource, kind: DatabaseKind) -> Result<ConnectionProfile, ConfigError> {
    match kind {
        DatabaseKind::Mssql => Ok(ConnectionProfile::Mssql(resolve_mssql(env))),
        DatabaseKind::MariaDb => resolve_mariadb(env).map(ConnectionProfile::MariaDb),
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::type_conversion(
            key,
            raw,
            "bool",
            "expected one of true/false/yes/no/1/0/on/off",
        )),
    }
}

/// Resolves the notebook server settings.
///
/// Unauthenticated access stays enabled unless
/// `NOTEBOOK_ALLOW_UNAUTHENTICATED` turns it off, matching the container's
/// local-development default.
pub fn resolve_notebook(env: &dyn EnvSource) -> Result<NotebookServerConfig, ConfigError> {
    let defaults = NotebookServerConfig::default();

    let port = match env.non_empty(NOTEBOOK_PORT) {
        Some(raw) => raw
            .trim()
            .parse::<u16>()
            .map_err(|e| ConfigError::type_conversion(NOTEBOOK_PORT, &raw, "u16", e))?,
        None => defaults.port,
    };
    let allow_unauthenticated = match env.non_empty(NOTEBOOK_ALLOW_UNAUTHENTICATED) {
        Some(raw) => parse_flag(NOTEBOOK_ALLOW_UNAUTHENTICATED, &raw)?,
        None => defaults.allow_unauthenticated,
    };
    let token = env.non_empty(NOTEBOOK_TOKEN).map(SecretString::from);

    if allow_unauthenticated && token.is_none() {
        warn!("Notebook server will accept unauthenticated requests; use for local development only");
    }

    Ok(NotebookServerConfig {
        program: env.non_empty(NOTEBOOK_PROGRAM).unwrap_or(defaults.program),
        ip: env.non_empty(NOTEBOOK_IP).unwrap_or(defaults.ip),
        port,
        notebook_dir: env
            .non_empty(NOTEBOOK_DIR)
            .map(PathBuf::from)
            .unwrap_or(defaults.notebook_dir),
        token,
        allow_unauthenticated,
    })
}
