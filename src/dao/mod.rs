mod sqlite;

pub use sqlite::{DBRow, DataBase, PoolOption, PoolType, QueryResult};
