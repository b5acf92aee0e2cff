use sqlx::{
    sqlite::{SqlitePoolOptions, SqliteQueryResult, SqliteRow},
    Sqlite, SqlitePool,
};

pub type PoolType = SqlitePool;
pub type PoolOption = SqlitePoolOptions;
pub type DBRow = SqliteRow;
pub type QueryResult = SqliteQueryResult;
pub type DataBase = Sqlite;
