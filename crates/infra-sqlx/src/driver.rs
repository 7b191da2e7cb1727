// sqlx DatabaseDriver

use crate::connection::SqlxConnection;
use crate::connection_url::connection_url;
use crate::error::map_sqlx_error;
use async_trait::async_trait;
use sqlx::{AnyConnection, Connection};
use std::sync::{Arc, Once};
use suno_core::domain::Credentials;
use suno_core::port::{DatabaseConnection, DatabaseDriver, DriverError};
use tracing::debug;

static INSTALL_DRIVERS: Once = Once::new();

/// Opens `sqlx::AnyConnection`s (sqlite and postgres drivers installed)
pub struct SqlxDriver;

impl SqlxDriver {
    pub fn new() -> Self {
        INSTALL_DRIVERS.call_once(sqlx::any::install_default_drivers);
        Self
    }
}

impl Default for SqlxDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatabaseDriver for SqlxDriver {
    async fn connect(
        &self,
        credentials: &Credentials,
    ) -> Result<Arc<dyn DatabaseConnection>, DriverError> {
        let url = connection_url(credentials)?;
        debug!(address = %credentials.address(), "Opening sqlx connection");

        let conn = AnyConnection::connect(&url)
            .await
            .map_err(|e| map_sqlx_error("Failed to connect", e))?;

        debug!(backend = conn.backend_name(), "sqlx connection opened");
        Ok(Arc::new(SqlxConnection::new(conn)))
    }
}
