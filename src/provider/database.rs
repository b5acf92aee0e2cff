use std::str::FromStr;

use sqlx::sqlite::SqliteConnectOptions;

use crate::{
    configuration::Config,
    dao::{PoolOption, PoolType},
    error::Error,
    model::{Table, Trade},
};

#[derive(Debug)]
pub struct DatabasePool {
    pub trade: Table<Trade>,
    pub pool: PoolType,
}

impl DatabasePool {
    pub async fn new(config: &Config) -> Result<DatabasePool, Error> {
        Self::open(&config.database_url).await
    }

    /// Opens the database file, creating it when absent.
    pub async fn open(database_url: &str) -> Result<DatabasePool, Error> {
        let options =
            SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let pool = PoolOption::new()
            .max_connections(4)
            .connect_with(options)
            .await?;

        Ok(DatabasePool {
            trade: Table::new(pool.clone()),
            pool,
        })
    }

    pub fn get_pool(&self) -> &PoolType {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
