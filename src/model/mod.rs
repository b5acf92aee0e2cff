mod table;
mod trade;

pub use table::Table;
pub use trade::{Trade, TradeFilter};
