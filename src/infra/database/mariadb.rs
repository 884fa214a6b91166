//! MariaDB/MySQL connection bootstrap.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::Connection;
use tracing::{info, instrument};

use crate::domain::{AppError, DatabaseError, DatabaseHandle, DatabaseKind, MariaDbProfile};

/// Builds connect options for `profile`. Charset is always `utf8mb4`.
pub(crate) fn connect_options(profile: &MariaDbProfile) -> MySqlConnectOptions {
    let options = MySqlConnectOptions::new()
        .host(profile.host())
        .port(profile.port())
        .username(profile.user())
        .password(profile.password().expose_secret())
        .charset(profile.charset());

    if profile.database().is_empty() {
        options
    } else {
        options.database(profile.database())
    }
}

/// Single MariaDB connection. Not pooled.
pub struct MariaDbHandle {
    conn: MySqlConnection,
}

impl MariaDbHandle {
    #[instrument(skip(profile), fields(host = %profile.host(), port = profile.port()))]
    pub async fn connect(profile: &MariaDbProfile) -> Result<Self, AppError> {
        info!("Connecting to MariaDB...");
        let conn = MySqlConnection::connect_with(&connect_options(profile))
            .await
            .map_err(DatabaseError::from)?;
        info!("Connected to MariaDB");
        Ok(Self { conn })
    }

    pub fn connection_mut(&mut self) -> &mut MySqlConnection {
        &mut self.conn
    }

    pub fn into_inner(self) -> MySqlConnection {
        self.conn
    }
}

#[async_trait]
impl DatabaseHandle for MariaDbHandle {
    fn kind(&self) -> DatabaseKind {
        DatabaseKind::MariaDb
    }

    #[instrument(skip(self))]
    async fn ping(&mut self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&mut self.conn)
            .await
            .map_err(DatabaseError::from)?;
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<(), AppError> {
        self.conn.close().await.map_err(DatabaseError::from)?;
        Ok(())
    }
}
