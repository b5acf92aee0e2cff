use std::{env::VarError, io::Error as IO_ERROR, num::ParseIntError};

use reqwest::Error as REQWEST_ERROR;
use rss::Error as RSS_ERROR;
use serde_json::Error as JSON_ERROR;
use sqlx::{error::Error as SQL_ERROR, migrate::MigrateError as MIGRATE_ERROR};
use thiserror::Error;
use tracing::subscriber::SetGlobalDefaultError as TRACING_GLOBAL_DEFAULT_ERROR;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Io(#[from] IO_ERROR),

    #[error("{0}")]
    INT(#[from] ParseIntError),

    #[error("{0}")]
    SQL(#[from] SQL_ERROR),

    #[error("Migration error: {0}")]
    MigrateError(#[from] MIGRATE_ERROR),

    #[error("{0}")]
    VAR(#[from] VarError),

    #[error("{0}")]
    JsonError(#[from] JSON_ERROR),

    #[error("{0}")]
    ReqwestError(#[from] REQWEST_ERROR),

    #[error("Feed error: {0}")]
    RssError(#[from] RSS_ERROR),

    #[error("Tracing error: {0}")]
    SetGlobalDefaultError(#[from] TRACING_GLOBAL_DEFAULT_ERROR),

    #[error("Invalid field {field}: {value}")]
    InvalidField { field: String, value: String },

    #[error("Trade at position {index} ({guid}): {source}")]
    InvalidTrade {
        index: usize,
        guid: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Unexpected HTTP status: {0}")]
    HttpStatus(u16),
}
