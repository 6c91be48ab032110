use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};

use crate::core::error::ConfigError;

const MAX_CONNECTIONS: u32 = 5;

pub(crate) fn connect(database_url: &str) -> Result<PgPool, ConfigError> {
    let options = PgConnectOptions::from_str(database_url)?;

    Ok(PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(Duration::from_secs(5))
        .connect_lazy_with(options))
}
