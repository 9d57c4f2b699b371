use serde::{Deserialize, Serialize};

use super::Endpoint;

#[cfg(feature = "backend")]
use g2p_schema::{gene_disease, source};

/// A gene-disease association imported from a third-party database.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "backend",
    derive(diesel::Queryable, diesel::Selectable),
    diesel(table_name = gene_disease, check_for_backend(diesel::pg::Pg))
)]
pub struct GeneDisease {
    pub disease: String,
    pub identifier: String,
    #[cfg_attr(feature = "backend", diesel(select_expression = source::name))]
    pub source: String,
}
impl Endpoint for GeneDisease {
    fn endpoint() -> String {
        "/genes/{gene}/diseases".to_string()
    }
}
