pub use self::types::{DBRow, DataBase, PoolOption, PoolType, QueryResult};

mod trade;
mod types;
