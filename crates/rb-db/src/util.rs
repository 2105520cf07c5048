use chrono::{DateTime, SecondsFormat, Utc};
use rb_core::types::{UserId, UserSummary};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("json encode failed: {message}")]
    JsonEncode { message: String },
    #[error("json decode failed: {message}")]
    JsonDecode { message: String },
    #[error("invalid enum value: {value}")]
    InvalidEnum { value: String },
    #[error("invalid timestamp: {value}")]
    InvalidTimestamp { value: String },
    #[error("invalid id: {message}")]
    InvalidId { message: String },
    #[error("row read failed: {message}")]
    Row { message: String },
}

/// Fixed-width UTC encoding; range filters compare these as text.
pub fn to_rfc3339(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn from_rfc3339(value: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| DbError::InvalidTimestamp {
            value: value.to_string(),
        })
}

pub fn from_opt_rfc3339(value: Option<String>) -> Result<Option<DateTime<Utc>>, DbError> {
    value.as_deref().map(from_rfc3339).transpose()
}

pub fn encode_enum<T: Serialize>(value: &T) -> Result<String, DbError> {
    let json = serde_json::to_value(value).map_err(|err| DbError::JsonEncode {
        message: err.to_string(),
    })?;
    match json {
        Value::String(value) => Ok(value),
        other => Err(DbError::InvalidEnum {
            value: other.to_string(),
        }),
    }
}

pub fn decode_enum<T: DeserializeOwned>(value: &str) -> Result<T, DbError> {
    let json = Value::String(value.to_string());
    serde_json::from_value(json).map_err(|err| DbError::JsonDecode {
        message: err.to_string(),
    })
}

/// Reads the three user name/email columns starting at `offset`.
pub fn map_user(row: &rusqlite::Row<'_>, id: i64, offset: usize) -> Result<UserSummary, DbError> {
    let column = |index: usize| -> Result<String, DbError> {
        row.get(index).map_err(|err| DbError::Row {
            message: err.to_string(),
        })
    };
    Ok(UserSummary {
        id: UserId::new(id).map_err(|err| DbError::InvalidId {
            message: err.to_string(),
        })?,
        first_name: column(offset)?,
        last_name: column(offset + 1)?,
        email: column(offset + 2)?,
    })
}
