use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Endpoint, SUMMARY_SUFFIX, record::LgdSummary};

#[cfg(feature = "backend")]
use {
    crate::string::is_not_blank,
    g2p_schema::{ontology_term, source},
};

const ENDPOINT: &str = "/diseases";

/// An ontology reference submitted alongside a new disease.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[cfg_attr(feature = "backend", derive(garde::Validate))]
pub struct NewDiseaseOntologyTerm {
    #[cfg_attr(feature = "backend", garde(custom(is_not_blank)))]
    pub accession: String,
    #[cfg_attr(feature = "backend", garde(custom(is_not_blank)))]
    pub term: String,
    #[serde(default)]
    #[cfg_attr(feature = "backend", garde(skip))]
    pub description: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[cfg_attr(feature = "backend", derive(garde::Validate))]
pub struct NewDisease {
    #[cfg_attr(feature = "backend", garde(custom(is_not_blank)))]
    pub name: String,
    #[serde(default)]
    #[cfg_attr(feature = "backend", garde(dive))]
    pub ontology_terms: Vec<NewDiseaseOntologyTerm>,
}
impl Endpoint for NewDisease {
    fn endpoint() -> String {
        ENDPOINT.to_string()
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "backend",
    derive(diesel::Queryable, diesel::Selectable),
    diesel(table_name = ontology_term, check_for_backend(diesel::pg::Pg))
)]
pub struct DiseaseOntologyTerm {
    pub accession: String,
    pub term: String,
    pub description: Option<String>,
    #[cfg_attr(feature = "backend", diesel(select_expression = source::name))]
    pub source: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Disease {
    pub id: i32,
    pub name: String,
    pub ontology_terms: Vec<DiseaseOntologyTerm>,
    pub synonyms: Vec<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct DiseaseDetail {
    #[serde(flatten)]
    pub disease: Disease,
    pub last_updated: Option<NaiveDate>,
}
impl Endpoint for DiseaseDetail {
    fn endpoint() -> String {
        format!("{ENDPOINT}/{{disease_id}}")
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct DiseaseRecordsSummary {
    pub disease: String,
    pub records_summary: Vec<LgdSummary>,
}
impl Endpoint for DiseaseRecordsSummary {
    fn endpoint() -> String {
        format!("{ENDPOINT}/{{disease_id}}/{SUMMARY_SUFFIX}")
    }
}
