use std::sync::LazyLock;

use diesel::result::DatabaseErrorInformation;
use diesel_async::pooled_connection::deadpool;
use regex::Regex;
use serde::Serialize;

static DETAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Key \((.+)\)=\((.+)\).+").unwrap());

#[derive(thiserror::Error, Debug, Serialize, Clone)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Error {
    #[error("{entity} with {} = {} already exists", field.clone().unwrap_or_default(), value.clone().unwrap_or_default())]
    DuplicateRecord {
        entity: String,
        field: Option<String>,
        value: Option<String>,
    },
    #[error("unable to create reference between {entity} and {referenced_entity} with value {} not found", value.clone().unwrap_or_default())]
    ReferenceNotFound {
        entity: String,
        referenced_entity: String,
        value: Option<String>,
    },
    #[error("record not found")]
    RecordNotFound,
    #[error("{message}")]
    InvalidData { message: String },
    #[error("{message}")]
    Other { message: String },
}

impl Error {
    fn from_other_error(err: impl std::error::Error) -> Self {
        Self::Other {
            message: format!("{err:?}"),
        }
    }

    pub(super) fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }
}

impl From<diesel::result::Error> for Error {
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::Error::{DatabaseError, NotFound};
        match err {
            DatabaseError(kind, info) => Self::from((kind, info)),
            NotFound => Self::RecordNotFound,
            _ => Self::from_other_error(err),
        }
    }
}

impl From<deadpool::PoolError> for Error {
    fn from(err: deadpool::PoolError) -> Self {
        Self::from_other_error(err)
    }
}

impl From<diesel::ConnectionError> for Error {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::from_other_error(err)
    }
}

type PgError = (
    diesel::result::DatabaseErrorKind,
    Box<dyn DatabaseErrorInformation + Send + Sync>,
);

/// Splits a postgres detail such as `Key (name)=(DD) already exists.` into
/// the offending column and value.
fn key_and_value(details: &str) -> (Option<String>, Option<String>) {
    let Some(caps) = DETAIL_REGEX.captures(details) else {
        return (None, None);
    };
    let group = |i| caps.get(i).map(|m| m.as_str().to_string());

    (group(1), group(2))
}

/// The last word of a foreign-key detail names the referenced table, as in
/// `... is not present in table "panel".`
fn referenced_table(details: &str) -> String {
    details
        .split_whitespace()
        .last()
        .map(|word| word.trim_end_matches('.').replace('"', ""))
        .unwrap_or_default()
}

impl From<PgError> for Error {
    fn from((kind, info): PgError) -> Self {
        use diesel::result::DatabaseErrorKind::{ForeignKeyViolation, UniqueViolation};

        let entity = info.table_name().unwrap_or_default().to_string();
        let details = info.details().unwrap_or_default();
        let (field, value) = key_and_value(details);

        match kind {
            UniqueViolation => Self::DuplicateRecord {
                entity,
                field,
                value,
            },
            ForeignKeyViolation => Self::ReferenceNotFound {
                entity,
                referenced_entity: referenced_table(details),
                value,
            },
            _ => Self::from_other_error(diesel::result::Error::DatabaseError(kind, info)),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
