use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Host that resolves to the container host from inside Docker Desktop.
pub const DEFAULT_HOST: &str = "host.docker.internal";
pub const MSSQL_DEFAULT_PORT: &str = "1433";
pub const MSSQL_DEFAULT_TDS_VERSION: &str = "7.4";
pub const MSSQL_DEFAULT_ENCRYPT: &str = "yes";
pub const MSSQL_DEFAULT_TRUST_CERT: &str = "yes";
pub const MARIADB_DEFAULT_PORT: u16 = 3306;
/// Not configurable.
pub const MARIADB_CHARSET: &str = "utf8mb4";

const REDACTED: &str = "***";

/// The two database engines the environment is wired for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseKind {
    Mssql,
    MariaDb,
}

impl DatabaseKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseKind::Mssql => "mssql",
            DatabaseKind::MariaDb => "mariadb",
        }
    }
}

impl fmt::Display for DatabaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatabaseKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mssql" | "sqlserver" => Ok(DatabaseKind::Mssql),
            "mariadb" | "mysql" => Ok(DatabaseKind::MariaDb),
            other => Err(format!("Unknown database kind: {}", other)),
        }
    }
}

/// Resolved settings for a SQL-Server-compatible connection.
///
/// All fields stay strings: beyond defaulting nothing is validated at
/// resolution time. The bootstrapper interprets them when connecting.
pub struct MssqlProfile {
    pub(crate) host: String,
    pub(crate) port: String,
    pub(crate) database: String,
    pub(crate) user: String,
    pub(crate) password: SecretString,
    pub(crate) tds_version: String,
    pub(crate) encrypt: String,
    pub(crate) trust_cert: String,
}

impl MssqlProfile {
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> &str {
        &self.port
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn password(&self) -> &SecretString {
        &self.password
    }

    pub fn tds_version(&self) -> &str {
        &self.tds_version
    }

    pub fn encrypt(&self) -> &str {
        &self.encrypt
    }

    pub fn trust_cert(&self) -> &str {
        &self.trust_cert
    }

    /// ODBC connection string for the FreeTDS driver, password included.
    ///
    /// Only hand this to a driver; use [`Self::redacted_connection_string`]
    /// for anything that gets printed.
    #[must_use]
    pub fn odbc_connection_string(&self) -> String {
        self.render_odbc(self.password.expose_secret())
    }

    #[must_use]
    pub fn redacted_connection_string(&self) -> String {
        self.render_odbc(REDACTED)
    }

    fn render_odbc(&self, password: &str) -> String {
        format!(
            "DRIVER={{FreeTDS}};SERVER={};PORT={};DATABASE={};UID={};PWD={};TDS_Version={};Encrypt={};TrustServerCertificate={}",
            self.host,
            self.port,
            self.database,
            self.user,
            password,
            self.tds_version,
            self.encrypt,
            self.trust_cert
        )
    }
}

impl Default for MssqlProfile {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: MSSQL_DEFAULT_PORT.to_string(),
            database: String::new(),
            user: String::new(),
            password: SecretString::from(String::new()),
            tds_version: MSSQL_DEFAULT_TDS_VERSION.to_string(),
            encrypt: MSSQL_DEFAULT_ENCRYPT.to_string(),
            trust_cert: MSSQL_DEFAULT_TRUST_CERT.to_string(),
        }
    }
}

impl Clone for MssqlProfile {
    fn clone(&self) -> Self {
        Self {
            host: self.host.clone(),
            port: self.port.clone(),
            database: self.database.clone(),
            user: self.user.clone(),
            password: SecretString::from(self.password.expose_secret().to_owned()),
            tds_version: self.tds_version.clone(),
            encrypt: self.encrypt.clone(),
            trust_cert: self.trust_cert.clone(),
        }
    }
}

impl PartialEq for MssqlProfile {
    fn eq(&self, other: &Self) -> bool {
        self.host == other.host
            && self.port == other.port
            && self.database == other.database
            && self.user == other.user
            && self.password.expose_secret() == other.password.expose_secret()
            && self.tds_version == other.tds_version
            && self.encrypt == other.encrypt
            && self.trust_cert == other.trust_cert
    }
}

impl Eq for MssqlProfile {}

impl fmt::Debug for MssqlProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MssqlProfile")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &REDACTED)
            .field("tds_version", &self.tds_version)
            .field("encrypt", &self.encrypt)
            .field("trust_cert", &self.trust_cert)
            .finish()
    }
}

/// Resolved settings for a MariaDB/MySQL-compatible connection.
pub struct MariaDbProfile {
    pub(crate) host: String,
    pub(crate) port: u16,
    pub(crate) user: String,
    pub(crate) password: SecretString,
    pub(crate) database: String,
}

impl MariaDbProfile {
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn password(&self) -> &SecretString {
        &self.password
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    /// Always `utf8mb4`.
    pub fn charset(&self) -> &'static str {
        MARIADB_CHARSET
    }

    #[must_use]
    pub fn redacted_url(&self) -> String {
        format!(
            "mysql://{}:{}@{}:{}/{}?charset={}",
            self.user,
            REDACTED,
            self.host,
            self.port,
            self.database,
            self.charset()
        )
    }
}

impl Default for MariaDbProfile {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: MARIADB_DEFAULT_PORT,
            user: String::new(),
            password: SecretString::from(String::new()),
            database: String::new(),
        }
    }
}

impl Clone for MariaDbProfile {
    fn clone(&self) -> Self {
        Self {
            host: self.host.clone(),
            port: self.port,
            user: self.user.clone(),
            password: SecretString::from(self.password.expose_secret().to_owned()),
            database: self.database.clone(),
        }
    }
}

impl PartialEq for MariaDbProfile {
    fn eq(&self, other: &Self) -> bool {
        self.host == other.host
            && self.port == other.port
            && self.user == other.user
            && self.password.expose_secret() == other.password.expose_secret()
            && self.database == other.database
    }
}

impl Eq for MariaDbProfile {}

impl fmt::Debug for MariaDbProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MariaDbProfile")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &REDACTED)
            .field("database", &self.database)
            .field("charset", &MARIADB_CHARSET)
            .finish()
    }
}

/// A resolved profile for one of the supported engines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionProfile {
    Mssql(MssqlProfile),
    MariaDb(MariaDbProfile),
}

impl ConnectionProfile {
    #[must_use]
    pub fn kind(&self) -> DatabaseKind {
        match self {
            ConnectionProfile::Mssql(_) => DatabaseKind::Mssql,
            ConnectionProfile::MariaDb(_) => DatabaseKind::MariaDb,
        }
    }

    /// Printable form with the password masked.
    #[must_use]
    pub fn summary(&self) -> ProfileSummary {
        match self {
            ConnectionProfile::Mssql(p) => ProfileSummary {
                kind: DatabaseKind::Mssql,
                host: p.host.clone(),
                port: p.port.clone(),
                database: p.database.clone(),
                user: p.user.clone(),
                password_set: !p.password.expose_secret().is_empty(),
                descriptor: p.redacted_connection_string(),
            },
            ConnectionProfile::MariaDb(p) => ProfileSummary {
                kind: DatabaseKind::MariaDb,
                host: p.host.clone(),
                port: p.port.to_string(),
                database: p.database.clone(),
                user: p.user.clone(),
                password_set: !p.password.expose_secret().is_empty(),
                descriptor: p.redacted_url(),
            },
        }
    }
}

/// Serializable, secret-free view of a [`ConnectionProfile`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileSummary {
    pub kind: DatabaseKind,
    pub host: String,
    pub port: String,
    pub database: String,
    pub user: String,
    pub password_set: bool,
    pub descriptor: String,
}

/// Outcome of a connect-ping-close round trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeReport {
    pub kind: DatabaseKind,
    pub descriptor: String,
    pub reachable: bool,
    pub elapsed_ms: u64,
    pub error: Option<String>,
}

/// Settings for the notebook server process.
///
/// The defaults keep the local-development behaviour of the container:
/// plain HTTP on 8888, no token.
#[derive(Validate)]
pub struct NotebookServerConfig {
    #[validate(length(min = 1, message = "program must not be empty"))]
    pub program: String,
    #[validate(length(min = 1, message = "bind address must not be empty"))]
    pub ip: String,
    #[validate(range(min = 1, message = "port must be non-zero"))]
    pub port: u16,
    pub notebook_dir: PathBuf,
    pub token: Option<SecretString>,
    pub allow_unauthenticated: bool,
}

impl Default for NotebookServerConfig {
    fn default() -> Self {
        Self {
            program: "jupyter".to_string(),
            ip: "0.0.0.0".to_string(),
            port: 8888,
            notebook_dir: PathBuf::from("notebooks"),
            token: None,
            allow_unauthenticated: true,
        }
    }
}

impl fmt::Debug for NotebookServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotebookServerConfig")
            .field("program", &self.program)
            .field("ip", &self.ip)
            .field("port", &self.port)
            .field("notebook_dir", &self.notebook_dir)
            .field("token", &self.token.as_ref().map(|_| REDACTED))
            .field("allow_unauthenticated", &self.allow_unauthenticated)
            .finish()
    }
}
