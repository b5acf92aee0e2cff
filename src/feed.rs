//! RSS 2.0 rendering of trade lists.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rss::{Channel, ChannelBuilder, GuidBuilder, Item, ItemBuilder};
use tokio::fs;

use crate::{configuration::Config, error::Error, model::Trade};

pub const FEED_TITLE_PREFIX: &str = "ThetaGang Trades";

/// Result of a trade as far as it is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Open,
    Won,
    Lost,
}

impl Outcome {
    pub fn of(trade: &Trade) -> Outcome {
        match (trade.is_closed(), trade.win) {
            (false, _) => Outcome::Open,
            (true, Some(true)) => Outcome::Won,
            (true, _) => Outcome::Lost,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeSummary {
    pub short: String,
    pub long: String,
    /// Not part of either text yet.
    pub outcome: Outcome,
}

pub fn get_emoji(trade: &Trade) -> &'static str {
    if trade.is_closed() {
        "🏁"
    } else {
        "🌅"
    }
}

/// Feed item identity; a trade gets a second item once it closes.
pub fn get_item_id(trade: &Trade) -> String {
    if trade.is_closed() {
        format!("{}-closing", trade.guid)
    } else {
        format!("{}-opening", trade.guid)
    }
}

pub fn get_trade_summary(trade: &Trade, config: &Config) -> TradeSummary {
    let action = if trade.is_closed() {
        "closed a"
    } else {
        "opened a"
    };

    let expiration = match trade.expiry_date {
        Some(date) => format!("expiring {}", date.format("%Y-%m-%d")),
        None => String::new(),
    };

    let short = format!(
        "{} {} {} {} on ${} {}",
        get_emoji(trade),
        trade.user_name,
        action,
        trade.trade_type.to_lowercase(),
        trade.symbol,
        expiration
    );

    let long = format!(
        "For more details, <a href='{}'>view this trade on thetagang.com</a>",
        config.get_trade_url(&trade.user_name, &trade.guid)
    );

    TradeSummary {
        short,
        long,
        outcome: Outcome::of(trade),
    }
}

fn build_item(trade: &Trade, config: &Config) -> Item {
    let summary = get_trade_summary(trade, config);
    let guid = GuidBuilder::default()
        .value(get_item_id(trade))
        .permalink(false)
        .build();

    ItemBuilder::default()
        .guid(Some(guid))
        .link(Some(config.get_trade_url(&trade.user_name, &trade.guid)))
        .title(Some(summary.short))
        .description(Some(summary.long))
        .pub_date(Some(trade.updated_at.to_rfc2822()))
        .build()
}

pub fn build_channel(
    trades: &[Trade],
    description: &str,
    config: &Config,
    build_date: DateTime<Utc>,
) -> Channel {
    let title = format!("{}: {}", FEED_TITLE_PREFIX, description);
    let items: Vec<Item> =
        trades.iter().map(|trade| build_item(trade, config)).collect();

    ChannelBuilder::default()
        .title(title.to_owned())
        .link(config.site_url.to_string())
        .description(title)
        .generator(Some(format!(
            "{} {}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        )))
        .last_build_date(Some(build_date.to_rfc2822()))
        .items(items)
        .build()
}

pub fn render_channel(channel: &Channel) -> Result<Vec<u8>, Error> {
    let buffer = channel.pretty_write_to(Vec::new(), b' ', 2)?;
    Ok(buffer)
}

/// Replaces `path` with `data` through a sibling temp file and a rename.
pub async fn write_atomic(path: &Path, data: &[u8]) -> Result<(), Error> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, data).await?;
    if let Err(e) = fs::rename(&tmp, path).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(Error::Io(e));
    }

    Ok(())
}
