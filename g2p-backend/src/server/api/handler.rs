use std::{borrow::Borrow, fmt::Debug};

use axum::{
    Json,
    extract::{FromRequest, Path, State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use diesel_async::{AsyncConnection, scoped_futures::ScopedFutureExt};
use g2p_core::model::{
    attrib::AttribTypeCodes,
    curator::{CreatedCurator, CuratorList, NewCurator},
    disease::{Disease, NewDisease},
    panel::PanelList,
};
use garde::Validate;
use serde::{Serialize, de::DeserializeOwned};

use super::error::{Error, Result};
use crate::{
    db::model::{
        FetchById, FetchVisible, Viewer, Write, attrib::fetch_attrib_type_codes,
        curator::fetch_curator_list, disease::Reconcile, panel::fetch_panel_list,
    },
    server::{
        AppState,
        auth::{Frontend, User},
    },
};

pub(super) struct ValidJson<T>(T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
    T: Validate,
    <T as Validate>::Context: std::default::Default,
{
    type Rejection = Error;

    async fn from_request(
        req: axum::extract::Request,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let axum::Json(data) = axum::Json::<T>::from_request(req, state).await?;
        data.validate()?;

        Ok(Self(data))
    }
}

impl<T: Serialize> IntoResponse for ValidJson<T> {
    fn into_response(self) -> Response {
        let Self(inner) = self;

        axum::Json(inner).into_response()
    }
}

pub(super) async fn new_disease(
    User(curator): User,
    State(app_state): State<AppState>,
    ValidJson(disease): ValidJson<NewDisease>,
) -> Result<Json<Disease>> {
    tracing::info!(curator = %curator.username, deserialized_disease = ?disease);

    let mut db_conn = app_state.db_conn().await?;
    let ontology = app_state.ontology();

    let disease = db_conn
        .transaction(|conn| async move { disease.reconcile(ontology, conn).await }.scope_boxed())
        .await?;

    Ok(Json(disease))
}

pub(super) async fn new_curator(
    _auth: Frontend,
    State(app_state): State<AppState>,
    ValidJson(curator): ValidJson<NewCurator>,
) -> Result<Json<CreatedCurator>> {
    tracing::info!(deserialized_curator = ?curator);

    let mut db_conn = app_state.db_conn().await?;

    let created = db_conn
        .transaction(|conn| async move { curator.write(conn).await }.scope_boxed())
        .await?;

    Ok(Json(created))
}

pub(super) async fn curators(
    _user: User,
    State(app_state): State<AppState>,
) -> Result<Json<CuratorList>> {
    let mut db_conn = app_state.db_conn().await?;

    Ok(Json(fetch_curator_list(&mut db_conn).await?))
}

pub(super) async fn by_id<Resource, Id>(
    State(app_state): State<AppState>,
    Path(resource_id): Path<Id>,
) -> Result<Json<Resource>>
where
    Resource: FetchById + Serialize + Send,
    Id: Borrow<Resource::Id> + DeserializeOwned + Debug + Send + Sync,
{
    tracing::info!(deserialized_id = ?resource_id);

    let mut db_conn = app_state.db_conn().await?;
    let resource_id: &Resource::Id = resource_id.borrow();
    let item = Resource::fetch_by_id(resource_id, &mut db_conn).await?;

    Ok(Json(item))
}

pub(super) async fn visible<Resource, Id>(
    user: Option<User>,
    State(app_state): State<AppState>,
    Path(resource_id): Path<Id>,
) -> Result<Json<Resource>>
where
    Resource: FetchVisible + Serialize + Send,
    Id: Borrow<Resource::Id> + DeserializeOwned + Debug + Send + Sync,
{
    let viewer = Viewer::from(user);
    tracing::info!(deserialized_id = ?resource_id, ?viewer);

    let mut db_conn = app_state.db_conn().await?;
    let resource_id: &Resource::Id = resource_id.borrow();
    let item = Resource::fetch_visible(resource_id, viewer, &mut db_conn).await?;

    Ok(Json(item))
}

pub(super) async fn panels(
    user: Option<User>,
    State(app_state): State<AppState>,
) -> Result<Json<PanelList>> {
    let mut db_conn = app_state.db_conn().await?;

    Ok(Json(fetch_panel_list(Viewer::from(user), &mut db_conn).await?))
}

pub(super) async fn attrib_types(
    State(app_state): State<AppState>,
) -> Result<Json<AttribTypeCodes>> {
    let mut db_conn = app_state.db_conn().await?;

    Ok(Json(fetch_attrib_type_codes(&mut db_conn).await?))
}
