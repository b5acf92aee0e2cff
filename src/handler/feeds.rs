use std::path::PathBuf;

use chrono::Utc;
use tracing::info;

use crate::{
    configuration::{AppState, State},
    error::Error,
    feed::{build_channel, render_channel, write_atomic},
    helpers::feed_file_name,
    model::TradeFilter,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedDefinition {
    pub name: String,
    pub description: String,
    pub filter: TradeFilter,
}

impl FeedDefinition {
    pub fn new(name: &str, description: &str, filter: TradeFilter) -> Self {
        FeedDefinition {
            name: name.to_owned(),
            description: description.to_owned(),
            filter,
        }
    }

    pub fn trade_type(trade_type: &str) -> Self {
        FeedDefinition {
            name: trade_type.to_owned(),
            description: format!("Only {} trades", trade_type.to_lowercase()),
            filter: TradeFilter::TradeType(trade_type.to_owned()),
        }
    }

    pub fn file_name(&self) -> String {
        feed_file_name(&self.name)
    }
}

pub fn fixed_feeds() -> Vec<FeedDefinition> {
    vec![
        FeedDefinition::new("all", "All trades", TradeFilter::All),
        FeedDefinition::new(
            "patron",
            "Patreon trades only",
            TradeFilter::UserRole(String::from("patron")),
        ),
        FeedDefinition::new(
            "winning",
            "Winning trades only",
            TradeFilter::Win(true),
        ),
        FeedDefinition::new(
            "losing",
            "Losing trades only",
            TradeFilter::Win(false),
        ),
    ]
}

/// The fixed feeds followed by one feed per stored trade type.
pub async fn get_feeds(
    app_state: &AppState<State>,
) -> Result<Vec<FeedDefinition>, Error> {
    let mut feeds = fixed_feeds();
    let trade_types = app_state.database.trade.get_trade_types().await?;

    feeds.extend(
        trade_types
            .iter()
            .map(|trade_type| FeedDefinition::trade_type(trade_type)),
    );

    Ok(feeds)
}

#[derive(Debug)]
pub struct RenderedFeed {
    pub path: PathBuf,
    pub items: usize,
    pub data: Vec<u8>,
}

pub async fn render(
    app_state: &AppState<State>,
    feed: &FeedDefinition,
) -> Result<RenderedFeed, Error> {
    let config = &app_state.config;
    let trades = app_state
        .database
        .trade
        .get(&feed.filter, config.feed_limit)
        .await?;

    let channel = build_channel(&trades, &feed.description, config, Utc::now());

    Ok(RenderedFeed {
        path: config.output_dir.join(feed.file_name()),
        items: trades.len(),
        data: render_channel(&channel)?,
    })
}

/// Renders every feed before touching the output directory, so a failing
/// query or render leaves the previous files in place.
pub async fn publish_all(
    app_state: &AppState<State>,
) -> Result<Vec<PathBuf>, Error> {
    let feeds = get_feeds(app_state).await?;
    let mut rendered = Vec::with_capacity(feeds.len());

    for feed in &feeds {
        rendered.push(render(app_state, feed).await?);
    }

    let mut paths = Vec::with_capacity(rendered.len());

    for feed in rendered {
        write_atomic(&feed.path, &feed.data).await?;
        info!("Wrote {} with {} item(s)", feed.path.display(), feed.items);
        paths.push(feed.path);
    }

    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        handler::trades::insert,
        helpers::test_state,
        types::{parse_trades, tests::trade_json},
    };
    use serde_json::json;
    use std::fs;

    fn read(path: &std::path::Path) -> String {
        fs::read_to_string(path).unwrap()
    }

    fn strip_build_date(xml: &str) -> String {
        xml.lines()
            .filter(|line| !line.contains("<lastBuildDate>"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_trade_type_feed() {
        let feed = FeedDefinition::trade_type("Iron Condor");
        assert_eq!(feed.file_name(), "trades_iron_condor.xml");
        assert_eq!(feed.description, "Only iron condor trades");
        assert_eq!(
            feed.filter,
            TradeFilter::TradeType(String::from("Iron Condor"))
        );
    }

    #[test]
    fn test_fixed_feed_files() {
        let files: Vec<String> =
            fixed_feeds().iter().map(|f| f.file_name()).collect();
        assert_eq!(
            files,
            vec![
                "trades_all.xml",
                "trades_patron.xml",
                "trades_winning.xml",
                "trades_losing.xml"
            ]
        );
    }

    #[tokio::test]
    async fn test_publish_single_open_trade() {
        let dir = tempfile::tempdir().unwrap();
        let app_state = test_state(dir.path()).await;
        let guid = "0f8fad5b-d9cb-469f-a165-70867728950e";
        let mut item = trade_json(guid, "2021-03-02T09:00:00.000Z");
        item["expiry_date"] = serde_json::Value::Null;

        let trades =
            parse_trades(&json!({ "data": { "trades": [item] } })).unwrap();
        insert(&app_state, &trades).await.unwrap();

        let paths = publish_all(&app_state).await.unwrap();
        assert_eq!(paths.len(), 5);

        for name in ["trades_all.xml", "trades_patron.xml"] {
            let channel =
                rss::Channel::read_from(read(&dir.path().join(name)).as_bytes())
                    .unwrap();
            assert_eq!(channel.items().len(), 1);

            let item = &channel.items()[0];
            assert!(item
                .title()
                .unwrap()
                .starts_with("🌅 alice opened a cash secured put on $AAPL"));
            assert!(item.guid().unwrap().value().ends_with("-opening"));
        }

        for name in ["trades_winning.xml", "trades_losing.xml"] {
            let channel =
                rss::Channel::read_from(read(&dir.path().join(name)).as_bytes())
                    .unwrap();
            assert!(channel.items().is_empty());
        }

        let channel = rss::Channel::read_from(
            read(&dir.path().join("trades_cash_secured_put.xml")).as_bytes(),
        )
        .unwrap();
        assert_eq!(
            channel.title(),
            "ThetaGang Trades: Only cash secured put trades"
        );
        assert_eq!(channel.items().len(), 1);
    }

    #[tokio::test]
    async fn test_publish_filters_by_role_and_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let app_state = test_state(dir.path()).await;

        let patron = trade_json(
            "0f8fad5b-d9cb-469f-a165-70867728950e",
            "2021-03-02T09:00:00.000Z",
        );
        let mut member = trade_json(
            "7c9e6679-7425-40de-944b-e07fc1f90ae7",
            "2021-03-03T09:00:00.000Z",
        );
        member["User"] = json!({ "username": "bob", "role": "member" });
        member["close_date"] = json!("2021-03-03T08:00:00.000Z");
        member["win"] = json!(true);
        member["type"] = json!("Iron Condor");

        let trades =
            parse_trades(&json!({ "data": { "trades": [patron, member] } }))
                .unwrap();
        insert(&app_state, &trades).await.unwrap();
        publish_all(&app_state).await.unwrap();

        let patron_feed = rss::Channel::read_from(
            read(&dir.path().join("trades_patron.xml")).as_bytes(),
        )
        .unwrap();
        assert_eq!(patron_feed.items().len(), 1);
        assert!(patron_feed.items()[0]
            .link()
            .unwrap()
            .contains("/alice/"));

        let winning = rss::Channel::read_from(
            read(&dir.path().join("trades_winning.xml")).as_bytes(),
        )
        .unwrap();
        assert_eq!(winning.items().len(), 1);
        let item = &winning.items()[0];
        assert!(item.guid().unwrap().value().ends_with("-closing"));
        assert!(item
            .title()
            .unwrap()
            .starts_with("🏁 bob closed a iron condor on $AAPL"));

        let all = rss::Channel::read_from(
            read(&dir.path().join("trades_all.xml")).as_bytes(),
        )
        .unwrap();
        assert_eq!(all.items().len(), 2);
        assert!(all.items()[0].link().unwrap().contains("/bob/"));

        assert!(dir.path().join("trades_iron_condor.xml").exists());
        assert!(dir.path().join("trades_cash_secured_put.xml").exists());
    }

    #[tokio::test]
    async fn test_publish_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let app_state = test_state(dir.path()).await;
        let trades = parse_trades(&json!({
            "data": {
                "trades": [
                    trade_json(
                        "0f8fad5b-d9cb-469f-a165-70867728950e",
                        "2021-03-02T09:00:00.000Z"
                    ),
                    trade_json(
                        "7c9e6679-7425-40de-944b-e07fc1f90ae7",
                        "2021-03-02T09:00:00.000Z"
                    )
                ]
            }
        }))
        .unwrap();

        insert(&app_state, &trades).await.unwrap();
        publish_all(&app_state).await.unwrap();
        let first = read(&dir.path().join("trades_all.xml"));

        insert(&app_state, &trades).await.unwrap();
        publish_all(&app_state).await.unwrap();
        let second = read(&dir.path().join("trades_all.xml"));

        assert_eq!(strip_build_date(&first), strip_build_date(&second));
    }
}
