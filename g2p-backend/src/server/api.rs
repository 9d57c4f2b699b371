use axum::{
    Router,
    routing::{get, post},
};
use g2p_core::model::{
    Endpoint,
    attrib::{AttribTypeCodes, AttribValues},
    curator::CuratorList,
    disease::{DiseaseDetail, DiseaseRecordsSummary, NewDisease},
    gene_disease::GeneDisease,
    panel::{PanelDetail, PanelList, PanelRecordsSummary},
};

use handler::{attrib_types, by_id, curators, new_curator, new_disease, panels, visible};

use super::AppState;

mod error;
mod handler;

pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route(&NewDisease::endpoint(), post(new_disease))
        .route(&DiseaseDetail::endpoint(), get(by_id::<DiseaseDetail, i32>))
        .route(
            &DiseaseRecordsSummary::endpoint(),
            get(visible::<DiseaseRecordsSummary, i32>),
        )
        .route(&PanelList::endpoint(), get(panels))
        .route(&PanelDetail::endpoint(), get(visible::<PanelDetail, String>))
        .route(
            &PanelRecordsSummary::endpoint(),
            get(visible::<PanelRecordsSummary, String>),
        )
        .route(
            &GeneDisease::endpoint(),
            get(by_id::<Vec<GeneDisease>, String>),
        )
        .route(&AttribTypeCodes::endpoint(), get(attrib_types))
        .route(&AttribValues::endpoint(), get(by_id::<AttribValues, String>))
        .route(&CuratorList::endpoint(), get(curators).post(new_curator))
}
