use std::time::Duration;

use reqwest::{header::USER_AGENT, Client};
use serde_json::Value;
use tracing::info;

use crate::{
    configuration::Config, error::Error, model::Trade, types::parse_trades,
};

#[derive(Debug)]
pub struct HTTP {
    pub config: Config,
    pub http: Client,
}

impl HTTP {
    pub fn new(config: Config) -> Result<HTTP, Error> {
        let http = match Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
        {
            Ok(c) => c,
            Err(e) => {
                return Err(Error::ReqwestError(e));
            },
        };

        Ok(HTTP { config, http })
    }

    pub async fn get_trades(&self) -> Result<Vec<Trade>, Error> {
        let url = self.config.trades_api_url.clone();
        info!("Fetching trades from {}", &url);

        let response = self
            .http
            .get(url)
            .header(
                USER_AGENT,
                concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")),
            )
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus(status.as_u16()));
        }

        let json = response.json::<Value>().await?;
        parse_trades(&json)
    }
}
