use axum::{
    RequestPartsExt,
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::{StatusCode, request::Parts},
    response::IntoResponse,
};
use axum_extra::{
    TypedHeader,
    headers::{self, authorization::Basic},
};
use g2p_core::model::curator::Curator;
use serde::Serialize;
use subtle::ConstantTimeEq;

use super::AppState;
use crate::{
    auth::ApiKey,
    db::{self, model::curator::find_by_api_key},
};

const API_KEY_HEADER: &str = "X-API-Key";
const FRONTEND_USERNAME: &str = "g2p-frontend";

/// An authenticated curator. Handlers that only need to know whether the
/// caller is authenticated take `Option<User>`.
#[derive(Clone, Debug)]
pub struct User(pub Curator);

impl FromRequestParts<AppState> for User {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        app_state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let AppState::Dev { user, .. } = app_state {
            return Ok(user.clone());
        }

        let Some(Ok(api_key)) = parts.headers.get(API_KEY_HEADER).map(|h| h.to_str()) else {
            return Err(Error::InvalidApiKey);
        };
        let api_key = ApiKey::from(api_key);

        let mut db_conn = app_state.db_conn().await?;
        let curator = find_by_api_key(&api_key, &mut db_conn).await?;

        Ok(Self(curator))
    }
}

impl OptionalFromRequestParts<AppState> for User {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        app_state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        match <User as FromRequestParts<_>>::from_request_parts(parts, app_state).await {
            Ok(user) => Ok(Some(user)),
            Err(Error::InvalidApiKey) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

/// The frontend service, which alone may create curators.
pub struct Frontend;

impl FromRequestParts<AppState> for Frontend {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AppState::Prod { config, .. } = state else {
            return Ok(Self);
        };

        let err = Error::InvalidFrontendCredentials;

        let Ok(TypedHeader(credentials)) = parts
            .extract::<TypedHeader<headers::Authorization<Basic>>>()
            .await
        else {
            return Err(err);
        };

        if !frontend_credentials_match(
            credentials.username(),
            credentials.password(),
            config.frontend_token(),
        ) {
            return Err(err);
        }

        Ok(Self)
    }
}

/// The token is compared in constant time. An empty configured token matches
/// nothing.
fn frontend_credentials_match(username: &str, password: &str, token: &str) -> bool {
    if token.is_empty() || username != FRONTEND_USERNAME {
        return false;
    }

    password.as_bytes().ct_eq(token.as_bytes()).into()
}

#[derive(thiserror::Error, Serialize, Debug, Clone)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Error {
    #[error("invalid API key")]
    InvalidApiKey,
    #[error("invalid frontend credentials")]
    InvalidFrontendCredentials,
    #[error(transparent)]
    Other(db::error::Error),
}

impl From<db::error::Error> for Error {
    fn from(err: db::error::Error) -> Self {
        use db::error::Error::RecordNotFound;

        match err {
            RecordNotFound => Self::InvalidApiKey,
            _ => Self::Other(err),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            status: u16,
            error: Option<Error>,
        }

        tracing::error!(auth_error = ?self);

        let (status, error) = match self {
            Self::InvalidApiKey | Self::InvalidFrontendCredentials => {
                (StatusCode::UNAUTHORIZED, Some(self))
            }
            Self::Other(_) => (StatusCode::INTERNAL_SERVER_ERROR, None),
        };

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
