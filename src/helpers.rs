use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{de::Error as _, Deserialize, Deserializer};
use serde_json::Value;

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS[.f]` (also with a `T`) and a bare
/// `YYYY-MM-DD`. Values without an offset are taken as UTC.
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Calendar date of a timestamp in the offset it was written with.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.date());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

pub fn deserialize_datetime<'de, D>(
    deserializer: D,
) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse_datetime(&value).ok_or_else(|| {
        D::Error::custom(format!("invalid timestamp \"{}\"", value))
    })
}

pub fn deserialize_datetime_opt<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(value) => parse_datetime(&value).map(Some).ok_or_else(|| {
            D::Error::custom(format!("invalid timestamp \"{}\"", value))
        }),
    }
}

pub fn deserialize_date_opt<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(value) => parse_date(&value).map(Some).ok_or_else(|| {
            D::Error::custom(format!("invalid date \"{}\"", value))
        }),
    }
}

/// Number, numeric string, empty string or null.
pub fn deserialize_f64_opt<'de, D>(
    deserializer: D,
) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_f64().map(Some).ok_or_else(|| {
            D::Error::custom(format!("invalid number {}", n))
        }),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s.trim().parse::<f64>().map(Some).map_err(
            |_| D::Error::custom(format!("invalid number \"{}\"", s)),
        ),
        Some(value) => {
            Err(D::Error::custom(format!("expected a number, got {}", value)))
        },
    }
}

pub fn deserialize_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64().ok_or_else(|| {
            D::Error::custom(format!("invalid integer {}", n))
        }),
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| {
            D::Error::custom(format!("invalid integer \"{}\"", s))
        }),
        value => Err(D::Error::custom(format!(
            "expected an integer, got {}",
            value
        ))),
    }
}

/// String, or a number kept in its JSON form.
pub fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        value => {
            Err(D::Error::custom(format!("expected a string, got {}", value)))
        },
    }
}

/// `Iron Condor` -> `trades_iron_condor.xml`. Path separators are replaced
/// too, so every feed lands directly in the output directory.
pub fn feed_file_name(name: &str) -> String {
    let name: String = name
        .to_lowercase()
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            c => c,
        })
        .collect();
    format!("trades_{}.xml", name)
}

#[cfg(test)]
pub fn test_config<P: Into<std::path::PathBuf>>(
    output_dir: P,
) -> crate::configuration::Config {
    use crate::configuration::{
        Config, DEFAULT_FEED_LIMIT, DEFAULT_SITE_URL, DEFAULT_TIMEOUT,
        DEFAULT_TRADES_API_URL,
    };
    use url::Url;

    Config {
        trades_api_url: Url::parse(DEFAULT_TRADES_API_URL).unwrap(),
        site_url: Url::parse(DEFAULT_SITE_URL).unwrap(),
        database_url: String::from("sqlite::memory:"),
        output_dir: output_dir.into(),
        feed_limit: DEFAULT_FEED_LIMIT,
        timeout: DEFAULT_TIMEOUT,
    }
}

#[cfg(test)]
pub async fn test_state(
    dir: &std::path::Path,
) -> crate::configuration::AppState<crate::configuration::State> {
    use crate::{
        configuration::{AppState, State},
        provider::{DatabasePool, HTTP},
    };

    let mut config = test_config(dir);
    config.database_url =
        format!("sqlite://{}", dir.join("feeds.db").display());

    let database = DatabasePool::new(&config).await.unwrap();
    let http = HTTP::new(config.clone()).unwrap();

    AppState::new(State::new(config, database, http).await.unwrap())
}
