use std::{
    env::{self, VarError},
    ops::Deref,
    path::PathBuf,
    sync::Arc,
};

use url::Url;

use crate::{
    error::Error,
    migration::run_migrations,
    provider::{DatabasePool, HTTP},
};

pub const DEFAULT_TRADES_API_URL: &str = "https://api.thetagang.com/trades";
pub const DEFAULT_SITE_URL: &str = "https://thetagang.com/";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://feeds.db";
pub const DEFAULT_OUTPUT_DIR: &str = ".";
pub const DEFAULT_FEED_LIMIT: i64 = 100;
pub const DEFAULT_TIMEOUT: u64 = 30;

#[derive(Debug)]
pub struct AppState<T>(Arc<T>);

impl<T> AppState<T> {
    pub fn new(state: T) -> AppState<T> {
        AppState(Arc::new(state))
    }
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> AppState<T> {
        AppState(Arc::clone(&self.0))
    }
}

impl<T> Deref for AppState<T> {
    type Target = Arc<T>;

    fn deref(&self) -> &Arc<T> {
        &self.0
    }
}

#[derive(Debug)]
pub struct State {
    pub config: Config,
    pub database: DatabasePool,
    pub http: HTTP,
}

impl State {
    pub async fn new(
        config: Config,
        database: DatabasePool,
        http: HTTP,
    ) -> Result<State, Error> {
        run_migrations(database.get_pool()).await?;
        Ok(Self {
            config,
            database,
            http,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub trades_api_url: Url,
    pub site_url: Url,
    pub database_url: String,
    pub output_dir: PathBuf,
    pub feed_limit: i64,
    pub timeout: u64,
}

impl Config {
    pub fn get_trade_url(&self, user_name: &str, guid: &str) -> String {
        format!("{}{}/{}", self.site_url, user_name, guid)
    }
}

fn env_or(key: &str, default: &str) -> Result<String, Error> {
    match env::var(key) {
        Ok(value) => Ok(value),
        Err(VarError::NotPresent) => Ok(default.to_owned()),
        Err(e) => Err(Error::VAR(e)),
    }
}

fn parse_url(key: &str, value: &str) -> Result<Url, Error> {
    Url::parse(value).map_err(|e| {
        Error::ConfigurationError(format!("{} ({}): {}", key, value, e))
    })
}

pub fn get_configuration() -> Result<Config, Error> {
    let trades_api_url = parse_url(
        "TRADES_API_URL",
        &env_or("TRADES_API_URL", DEFAULT_TRADES_API_URL)?,
    )?;

    let mut site_url =
        parse_url("SITE_URL", &env_or("SITE_URL", DEFAULT_SITE_URL)?)?;
    if !site_url.path().ends_with('/') {
        let path = format!("{}/", site_url.path());
        site_url.set_path(&path);
    }

    let database_url = env_or("DATABASE_URL", DEFAULT_DATABASE_URL)?;
    let output_dir = PathBuf::from(env_or("OUTPUT_DIR", DEFAULT_OUTPUT_DIR)?);

    let feed_limit: i64 =
        env_or("FEED_LIMIT", &DEFAULT_FEED_LIMIT.to_string())?.parse()?;
    if feed_limit <= 0 {
        return Err(Error::ConfigurationError(format!(
            "FEED_LIMIT must be positive, got {}",
            feed_limit
        )));
    }

    let timeout = env_or("TIMEOUT", &DEFAULT_TIMEOUT.to_string())?.parse()?;

    let config = Config {
        trades_api_url,
        site_url,
        database_url,
        output_dir,
        feed_limit,
        timeout,
    };

    Ok(config)
}

/// Loads `.env` from the working directory into the process environment.
/// A missing file is fine; variables already set are kept.
pub fn set_configuration() -> Result<(), Error> {
    match dotenvy::dotenv() {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(Error::ConfigurationError(e.to_string())),
    }
}
