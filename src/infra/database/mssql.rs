//! SQL Server connection bootstrap over TDS.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use tiberius::{AuthMethod, Client, Config, EncryptionLevel};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};
use tracing::{info, instrument};

use crate::domain::env_vars::MSSQL_PORT;
use crate::domain::{
    AppError, ConfigError, DatabaseError, DatabaseHandle, DatabaseKind, MssqlProfile,
};

/// TDS versions the driver negotiates.
const SUPPORTED_TDS_VERSIONS: &[&str] = &["7.4"];

/// Maps an ODBC-style `Encrypt` value onto the driver's encryption level.
pub(crate) fn encryption_level(flag: &str) -> EncryptionLevel {
    match flag.trim().to_ascii_lowercase().as_str() {
        "yes" | "true" | "required" | "mandatory" | "strict" => EncryptionLevel::Required,
        "no" | "false" | "off" | "optional" => EncryptionLevel::Off,
        _ => EncryptionLevel::On,
    }
}

pub(crate) fn is_enabled(flag: &str) -> bool {
    matches!(
        flag.trim().to_ascii_lowercase().as_str(),
        "yes" | "true" | "1" | "on"
    )
}

/// Builds the driver configuration for `profile`.
///
/// The port is kept as a string in the profile and converted here.
pub(crate) fn build_config(profile: &MssqlProfile) -> Result<Config, AppError> {
    let version = profile.tds_version().trim();
    if !SUPPORTED_TDS_VERSIONS.contains(&version) {
        return Err(DatabaseError::UnsupportedProtocol(version.to_string()).into());
    }

    let port = profile
        .port()
        .trim()
        .parse::<u16>()
        .map_err(|e| ConfigError::type_conversion(MSSQL_PORT, profile.port(), "u16", e))?;

    let mut config = Config::new();
    config.host(profile.host());
    config.port(port);
    if !profile.database().is_empty() {
        config.database(profile.database());
    }
    config.authentication(AuthMethod::sql_server(
        profile.user(),
        profile.password().expose_secret(),
    ));
    config.encryption(encryption_level(profile.encrypt()));
    if is_enabled(profile.trust_cert()) {
        config.trust_cert();
    }
    config.application_name("datalab");
    Ok(config)
}

/// Open SQL Server client.
pub struct MssqlHandle {
    client: Client<Compat<TcpStream>>,
}

impl MssqlHandle {
    /// Connects once. Driver failures are returned untouched.
    #[instrument(skip(profile), fields(host = %profile.host(), port = %profile.port()))]
    pub async fn connect(profile: &MssqlProfile) -> Result<Self, AppError> {
        let config = build_config(profile)?;
        let addr = config.get_addr();

        info!("Connecting to SQL Server...");
        let tcp = TcpStream::connect(&addr)
            .await
            .map_err(DatabaseError::from)?;
        tcp.set_nodelay(true).map_err(DatabaseError::from)?;

        let client = Client::connect(config, tcp.compat_write())
            .await
            .map_err(DatabaseError::from)?;
        info!("Connected to SQL Server");
        Ok(Self { client })
    }

    /// Driver client for running queries.
    pub fn client_mut(&mut self) -> &mut Client<Compat<TcpStream>> {
        &mut self.client
    }

    pub fn into_inner(self) -> Client<Compat<TcpStream>> {
        self.client
    }
}

#[async_trait]
impl DatabaseHandle for MssqlHandle {
    fn kind(&self) -> DatabaseKind {
        DatabaseKind::Mssql
    }

    #[instrument(skip(self))]
    async fn ping(&mut self) -> Result<(), AppError> {
        self.client
            .simple_query("SELECT 1")
            .await?
            .into_row()
            .await?;
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<(), AppError> {
        self.client.close().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::app::resolver::resolve_mssql;
    use crate::domain::env_vars::{MSSQL_HOST, MSSQL_TDS_VERSION};

    #[test]
    fn test_encryption_level_mapping() {
        assert!(matches!(encryption_level("yes"), EncryptionLevel::Required));
        assert!(matches!(encryption_level("TRUE"), EncryptionLevel::Required));
        assert!(matches!(encryption_level("no"), EncryptionLevel::Off));
        assert!(matches!(encryption_level("whatever"), EncryptionLevel::On));
    }

    #[test]
    fn test_trust_flag() {
        assert!(is_enabled("yes"));
        assert!(is_enabled(" True "));
        assert!(!is_enabled("no"));
        assert!(!is_enabled(""));
    }

    #[test]
    fn test_build_config_uses_profile_address() {
        let env: HashMap<&str, &str> = HashMap::from([(MSSQL_HOST, "db.example.com")]);
        let config = build_config(&resolve_mssql(&env)).unwrap();
        assert_eq!(config.get_addr(), "db.example.com:1433");
    }

    #[test]
    fn test_build_config_rejects_unknown_protocol() {
        let env: HashMap<&str, &str> = HashMap::from([(MSSQL_TDS_VERSION, "8.0")]);
        let err = build_config(&resolve_mssql(&env)).unwrap_err();
        assert!(matches!(
            err,
            AppError::Database(DatabaseError::UnsupportedProtocol(v)) if v == "8.0"
        ));
    }

    #[test]
    fn test_build_config_converts_port() {
        let env: HashMap<&str, &str> = HashMap::from([(MSSQL_PORT, "fourteen")]);
        let err = build_config(&resolve_mssql(&env)).unwrap_err();
        assert!(matches!(
            err,
            AppError::Config(ConfigError::TypeConversion { .. })
        ));
    }

    #[test]
    fn test_build_config_accepts_only_tds_74() {
        let env: HashMap<&str, &str> = HashMap::from([(MSSQL_TDS_VERSION, " 7.4 ")]);
        assert!(build_config(&resolve_mssql(&env)).is_ok());

        let env: HashMap<&str, &str> = HashMap::from([(MSSQL_TDS_VERSION, "7.3")]);
        let err = build_config(&resolve_mssql(&env)).unwrap_err();
        assert!(matches!(
            err,
            AppError::Database(DatabaseError::UnsupportedProtocol(v)) if v == "7.3"
        ));
    }

    #[tokio::test]
    async fn test_refused_connection_surfaces_io_error() {
        let env: HashMap<&str, &str> =
            HashMap::from([(MSSQL_HOST, "127.0.0.1"), (MSSQL_PORT, "1")]);
        match MssqlHandle::connect(&resolve_mssql(&env)).await {
            Err(AppError::Database(DatabaseError::Io(e))) => {
                assert_eq!(e.kind(), std::io::ErrorKind::ConnectionRefused);
            }
            Err(other) => panic!("Expected Io error, got {:?}", other),
            Ok(_) => panic!("Expected connection to port 1 to fail"),
        }
    }
}
