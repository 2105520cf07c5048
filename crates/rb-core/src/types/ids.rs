use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(transparent)]
pub struct UserId(i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(transparent)]
pub struct RetrospectiveId(i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(transparent)]
pub struct SprintId(i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(transparent)]
pub struct FeedbackId(i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(transparent)]
pub struct SprintTaskId(i64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    NotNumeric { kind: &'static str, value: String },
    NotPositive { kind: &'static str, value: i64 },
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotNumeric { kind, value } => write!(f, "invalid {kind} id: {value}"),
            Self::NotPositive { kind, value } => write!(f, "invalid {kind} id: {value}"),
        }
    }
}

impl std::error::Error for IdError {}

macro_rules! id_type {
    ($name:ident, $kind:expr) => {
        impl $name {
            pub const KIND: &'static str = $kind;

            pub fn new(value: i64) -> Result<Self, IdError> {
                if value <= 0 {
                    return Err(IdError::NotPositive {
                        kind: Self::KIND,
                        value,
                    });
                }
                Ok(Self(value))
            }

            pub fn parse(value: &str) -> Result<Self, IdError> {
                let number = value
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| IdError::NotNumeric {
                        kind: Self::KIND,
                        value: value.to_string(),
                    })?;
                Self::new(number)
            }

            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let value = i64::deserialize(deserializer)?;
                Self::new(value).map_err(serde::de::Error::custom)
            }
        }
    };
}

id_type!(UserId, "user");
id_type!(RetrospectiveId, "retrospective");
id_type!(SprintId, "sprint");
id_type!(FeedbackId, "feedback");
id_type!(SprintTaskId, "sprint task");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numeric_ids() {
        let id = RetrospectiveId::parse("42").unwrap();
        assert_eq!(id.get(), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn rejects_non_numeric_ids() {
        let err = RetrospectiveId::parse("abc").unwrap_err();
        assert_eq!(err.to_string(), "invalid retrospective id: abc");
    }

    #[test]
    fn rejects_zero_and_negative_ids() {
        assert!(SprintId::parse("0").is_err());
        assert!(SprintTaskId::new(-3).is_err());
    }

    #[test]
    fn deserialize_validates() {
        let ok: UserId = serde_json::from_str("7").unwrap();
        assert_eq!(ok.get(), 7);
        assert!(serde_json::from_str::<UserId>("0").is_err());
    }
}
