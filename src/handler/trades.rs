use tracing::info;

use crate::{
    configuration::{AppState, State},
    error::Error,
    model::Trade,
};

/// Fetches the current trade listing and upserts it, returning how many
/// trades were received.
pub async fn fetch_insert(app_state: AppState<State>) -> Result<usize, Error> {
    let trades = app_state.http.get_trades().await?;
    info!("Fetched {} trade(s)", trades.len());

    insert(&app_state, &trades).await
}

pub async fn insert(
    app_state: &AppState<State>,
    trades: &[Trade],
) -> Result<usize, Error> {
    app_state.database.trade.upsert_many(trades).await?;
    info!("Upserted {} trade(s)", trades.len());

    Ok(trades.len())
}
