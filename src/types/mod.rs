mod trades;

pub use trades::{parse_trade, parse_trades};

#[cfg(test)]
pub(crate) use trades::tests;
