use sqlx::{
    error::Error, query::Query, sqlite::SqliteArguments, FromRow,
    QueryBuilder, Row,
};

use super::{DBRow, DataBase, QueryResult};
use crate::model::{Table, Trade, TradeFilter};

impl FromRow<'_, DBRow> for Trade {
    fn from_row(row: &DBRow) -> Result<Self, Error> {
        Ok(Trade {
            guid: row.try_get("guid")?,
            long_put: row.try_get("long_put")?,
            long_call: row.try_get("long_call")?,
            short_put: row.try_get("short_put")?,
            short_call: row.try_get("short_call")?,
            price_filled: row.try_get("price_filled")?,
            price_closed: row.try_get("price_closed")?,
            payment: row.try_get("payment")?,
            quantity: row.try_get("quantity")?,
            symbol: row.try_get("symbol")?,
            trade_type: row.try_get("trade_type")?,
            assigned: row.try_get("assigned")?,
            earnings: row.try_get("earnings")?,
            win: row.try_get("win")?,
            expiry_date: row.try_get("expiry_date")?,
            close_date: row.try_get("close_date")?,
            open_date: row.try_get("open_date")?,
            updated_at: row.try_get("updated_at")?,
            opening_note: row.try_get("opening_note")?,
            closing_note: row.try_get("closing_note")?,
            user_name: row.try_get("user_name")?,
            user_role: row.try_get("user_role")?,
        })
    }
}

fn upsert_query(data: &Trade) -> Query<'_, DataBase, SqliteArguments<'_>> {
    sqlx::query(
        r#"
        INSERT INTO trade (
            guid,
            long_put, long_call, short_put, short_call,
            price_filled, price_closed,
            payment, quantity, symbol, trade_type,
            assigned, earnings, win,
            expiry_date, close_date, open_date, updated_at,
            opening_note, closing_note,
            user_name, user_role
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT (guid) DO UPDATE SET
            long_put = excluded.long_put,
            long_call = excluded.long_call,
            short_put = excluded.short_put,
            short_call = excluded.short_call,
            price_filled = excluded.price_filled,
            price_closed = excluded.price_closed,
            payment = excluded.payment,
            quantity = excluded.quantity,
            symbol = excluded.symbol,
            trade_type = excluded.trade_type,
            assigned = excluded.assigned,
            earnings = excluded.earnings,
            win = excluded.win,
            expiry_date = excluded.expiry_date,
            close_date = excluded.close_date,
            open_date = excluded.open_date,
            updated_at = excluded.updated_at,
            opening_note = excluded.opening_note,
            closing_note = excluded.closing_note,
            user_name = excluded.user_name,
            user_role = excluded.user_role
        "#,
    )
    .bind(&data.guid)
    .bind(data.long_put)
    .bind(data.long_call)
    .bind(data.short_put)
    .bind(data.short_call)
    .bind(data.price_filled)
    .bind(data.price_closed)
    .bind(&data.payment)
    .bind(data.quantity)
    .bind(&data.symbol)
    .bind(&data.trade_type)
    .bind(data.assigned)
    .bind(data.earnings)
    .bind(data.win)
    .bind(data.expiry_date)
    .bind(data.close_date)
    .bind(data.open_date)
    .bind(data.updated_at)
    .bind(&data.opening_note)
    .bind(&data.closing_note)
    .bind(&data.user_name)
    .bind(&data.user_role)
}

impl Table<Trade> {
    /// Inserts the trade, or replaces every column of the row sharing its guid.
    pub async fn upsert(&self, data: &Trade) -> Result<QueryResult, Error> {
        upsert_query(data).execute(&self.pool).await
    }

    /// Upserts all trades inside one transaction; either all land or none.
    pub async fn upsert_many(&self, data: &[Trade]) -> Result<(), Error> {
        if data.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;

        for trade in data {
            upsert_query(trade).execute(&mut *tx).await?;
        }

        tx.commit().await
    }

    /// Latest trades matching `filter`, newest `updated_at` first.
    pub async fn get(
        &self,
        filter: &TradeFilter,
        limit: i64,
    ) -> Result<Vec<Trade>, Error> {
        let mut query_builder: QueryBuilder<DataBase> =
            QueryBuilder::new("SELECT * FROM trade");

        match filter {
            TradeFilter::All => {},
            TradeFilter::UserRole(role) => {
                query_builder.push(" WHERE user_role = ").push_bind(role);
            },
            TradeFilter::Win(win) => {
                query_builder.push(" WHERE win = ").push_bind(*win);
            },
            TradeFilter::TradeType(trade_type) => {
                query_builder
                    .push(" WHERE trade_type = ")
                    .push_bind(trade_type);
            },
        }

        query_builder
            .push(" ORDER BY updated_at DESC, guid ASC LIMIT ")
            .push_bind(limit);

        query_builder
            .build_query_as::<Trade>()
            .fetch_all(&self.pool)
            .await
    }

    pub async fn get_one(&self, guid: &str) -> Result<Option<Trade>, Error> {
        sqlx::query_as(
            r#"
            SELECT * FROM trade WHERE guid = ?
            "#,
        )
        .bind(guid)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn count(&self) -> Result<i64, Error> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM trade
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    pub async fn get_trade_types(&self) -> Result<Vec<String>, Error> {
        let data: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT DISTINCT trade_type FROM trade ORDER BY trade_type ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(data.into_iter().map(|(trade_type,)| trade_type).collect())
    }
}
