use chrono::{DateTime, NaiveDate, Utc};

/// One trade as published by thetagang.com.
///
/// `close_date` being set is what makes a trade closed; `win` only carries
/// meaning once it is.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub guid: String,

    pub long_put: Option<f64>,
    pub long_call: Option<f64>,
    pub short_put: Option<f64>,
    pub short_call: Option<f64>,
    pub price_filled: Option<f64>,
    pub price_closed: Option<f64>,

    pub payment: String,
    pub quantity: i64,
    pub symbol: String,
    pub trade_type: String,

    pub assigned: Option<bool>,
    pub earnings: bool,
    pub win: Option<bool>,

    pub expiry_date: Option<NaiveDate>,
    pub close_date: Option<DateTime<Utc>>,
    pub open_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    pub opening_note: Option<String>,
    pub closing_note: Option<String>,

    pub user_name: String,
    pub user_role: String,
}

impl Trade {
    pub fn is_closed(&self) -> bool {
        self.close_date.is_some()
    }
}

/// Equality filters understood by the trade table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TradeFilter {
    All,
    UserRole(String),
    Win(bool),
    TradeType(String),
}
