//! Names of the environment variables the environment recognizes.

pub const MSSQL_HOST: &str = "MSSQL_HOST";
pub const MSSQL_PORT: &str = "MSSQL_PORT";
pub const MSSQL_DB: &str = "MSSQL_DB";
pub const MSSQL_USER: &str = "MSSQL_USER";
pub const MSSQL_PASSWORD: &str = "MSSQL_PASSWORD";
pub const MSSQL_TDS_VERSION: &str = "MSSQL_TDS_VERSION";
pub const MSSQL_ENCRYPT: &str = "MSSQL_ENCRYPT";
pub const MSSQL_TRUST_CERT: &str = "MSSQL_TRUST_CERT";

pub const MARIADB_HOST: &str = "MARIADB_HOST";
pub const MARIADB_PORT: &str = "MARIADB_PORT";
pub const MARIADB_USER: &str = "MARIADB_USER";
pub const MARIADB_PASSWORD: &str = "MARIADB_PASSWORD";
pub const MARIADB_DB: &str = "MARIADB_DB";

pub const NOTEBOOK_PROGRAM: &str = "NOTEBOOK_PROGRAM";
pub const NOTEBOOK_IP: &str = "NOTEBOOK_IP";
pub const NOTEBOOK_PORT: &str = "NOTEBOOK_PORT";
pub const NOTEBOOK_DIR: &str = "NOTEBOOK_DIR";
pub const NOTEBOOK_TOKEN: &str = "NOTEBOOK_TOKEN";
pub const NOTEBOOK_ALLOW_UNAUTHENTICATED: &str = "NOTEBOOK_ALLOW_UNAUTHENTICATED";

/// Every variable the resolver reads, in documentation order.
pub const RECOGNIZED_VARS: &[&str] = &[
    MSSQL_HOST,
    MSSQL_PORT,
    MSSQL_DB,
    MSSQL_USER,
    MSSQL_PASSWORD,
    MSSQL_TDS_VERSION,
    MSSQL_ENCRYPT,
    MSSQL_TRUST_CERT,
    MARIADB_HOST,
    MARIADB_PORT,
    MARIADB_USER,
    MARIADB_PASSWORD,
    MARIADB_DB,
];
