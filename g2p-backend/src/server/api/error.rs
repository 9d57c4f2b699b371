use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use diesel_async::pooled_connection::deadpool;
use serde::Serialize;

use crate::db;

#[derive(thiserror::Error, Serialize, Debug, Clone)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Error {
    #[error(transparent)]
    Database {
        #[from]
        error: db::error::Error,
    },
    #[error("simple invalid data")]
    SimpleData { reason: String },
    #[error("malformed request")]
    MalformedRequest {
        #[serde(skip)]
        status: StatusCode,
        message: String,
    },
}

impl Error {
    fn status_code(&self) -> StatusCode {
        use db::error::Error::{
            DuplicateRecord, InvalidData, Other, RecordNotFound, ReferenceNotFound,
        };

        match self {
            Self::SimpleData { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::MalformedRequest { status, .. } => *status,
            Self::Database { error } => match error {
                InvalidData { .. } => StatusCode::BAD_REQUEST,
                DuplicateRecord { .. } => StatusCode::CONFLICT,
                RecordNotFound => StatusCode::NOT_FOUND,
                ReferenceNotFound { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                Other { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(err: JsonRejection) -> Self {
        Self::MalformedRequest {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

impl From<deadpool::PoolError> for Error {
    fn from(err: deadpool::PoolError) -> Self {
        Self::Database {
            error: db::error::Error::from(err),
        }
    }
}

impl From<garde::Report> for Error {
    fn from(err: garde::Report) -> Self {
        Self::SimpleData {
            reason: format!("{err:#}"),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            status: u16,
            error: Option<Error>,
        }

        tracing::error!(error = ?self);

        let status = self.status_code();
        let error = (status != StatusCode::INTERNAL_SERVER_ERROR).then_some(self);

        (
            status,
            axum::Json(ErrorResponse {
                status: status.as_u16(),
                error,
            }),
        )
            .into_response()
    }
}

pub type Result<T> = std::result::Result<T, Error>;
