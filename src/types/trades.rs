use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::{
    error::Error,
    helpers::{
        deserialize_date_opt, deserialize_datetime, deserialize_datetime_opt,
        deserialize_f64_opt, deserialize_i64, deserialize_text,
    },
    model::Trade,
};

/// Envelope of the trades listing. Items stay raw so a failure can still
/// report the guid of the item it came from.
#[derive(Debug, Deserialize)]
pub struct TradesResponse {
    pub data: TradesData,
}

#[derive(Debug, Deserialize)]
pub struct TradesData {
    pub trades: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub struct TradeUser {
    pub username: String,
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct TradeItem {
    pub guid: String,

    #[serde(default, deserialize_with = "deserialize_f64_opt")]
    pub long_put: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_f64_opt")]
    pub long_call: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_f64_opt")]
    pub short_put: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_f64_opt")]
    pub short_call: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_f64_opt")]
    pub price_filled: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_f64_opt")]
    pub price_closed: Option<f64>,

    #[serde(deserialize_with = "deserialize_text")]
    pub payment: String,
    #[serde(deserialize_with = "deserialize_i64")]
    pub quantity: i64,
    pub symbol: String,
    #[serde(rename = "type")]
    pub trade_type: String,

    #[serde(default)]
    pub assigned: Option<bool>,
    pub earnings: bool,
    #[serde(default)]
    pub win: Option<bool>,

    #[serde(default, deserialize_with = "deserialize_date_opt")]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_datetime_opt")]
    pub close_date: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "deserialize_datetime")]
    pub open_date: DateTime<Utc>,
    #[serde(rename = "updatedAt", deserialize_with = "deserialize_datetime")]
    pub updated_at: DateTime<Utc>,

    #[serde(default, rename = "note")]
    pub opening_note: Option<String>,
    #[serde(default)]
    pub closing_note: Option<String>,

    #[serde(rename = "User")]
    pub user: TradeUser,
}

impl TryFrom<TradeItem> for Trade {
    type Error = Error;

    fn try_from(item: TradeItem) -> Result<Self, Self::Error> {
        let guid = Uuid::parse_str(&item.guid).map_err(|_| {
            Error::InvalidField {
                field: String::from("guid"),
                value: item.guid.to_owned(),
            }
        })?;

        Ok(Trade {
            guid: guid.hyphenated().to_string(),
            long_put: item.long_put,
            long_call: item.long_call,
            short_put: item.short_put,
            short_call: item.short_call,
            price_filled: item.price_filled,
            price_closed: item.price_closed,
            payment: item.payment,
            quantity: item.quantity,
            symbol: item.symbol,
            trade_type: item.trade_type,
            assigned: item.assigned,
            earnings: item.earnings,
            win: item.win,
            expiry_date: item.expiry_date,
            close_date: item.close_date,
            open_date: item.open_date,
            updated_at: item.updated_at,
            opening_note: item.opening_note,
            closing_note: item.closing_note,
            user_name: item.user.username,
            user_role: item.user.role,
        })
    }
}

/// Pulls `data.trades` out of a trades listing body and validates each item.
pub fn parse_trades(body: &Value) -> Result<Vec<Trade>, Error> {
    let response = TradesResponse::deserialize(body).map_err(|e| {
        Error::InvalidResponse(format!("expected a list at data.trades: {}", e))
    })?;

    let items = response.data.trades;
    let mut trades = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        let trade = parse_trade(item).map_err(|e| Error::InvalidTrade {
            index,
            guid: item
                .get("guid")
                .and_then(Value::as_str)
                .unwrap_or("unknown guid")
                .to_owned(),
            source: Box::new(e),
        })?;
        trades.push(trade);
    }

    Ok(trades)
}

pub fn parse_trade(item: &Value) -> Result<Trade, Error> {
    let item = TradeItem::deserialize(item)?;
    Trade::try_from(item)
}
