use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Endpoint, SUMMARY_SUFFIX, record::LgdSummary};

const ENDPOINT: &str = "/panels";

/// Counts over the non-deleted records linked to a panel.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct PanelStats {
    pub total_records: i64,
    pub total_genes: i64,
    pub by_confidence: BTreeMap<String, i64>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PanelSummary {
    pub name: String,
    pub description: Option<String>,
    pub stats: PanelStats,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PanelList {
    pub results: Vec<PanelSummary>,
    pub count: usize,
}
impl From<Vec<PanelSummary>> for PanelList {
    fn from(results: Vec<PanelSummary>) -> Self {
        Self {
            count: results.len(),
            results,
        }
    }
}
impl Endpoint for PanelList {
    fn endpoint() -> String {
        ENDPOINT.to_string()
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PanelDetail {
    pub name: String,
    pub description: Option<String>,
    pub curators: Vec<String>,
    pub last_updated: Option<NaiveDate>,
    pub stats: PanelStats,
}
impl Endpoint for PanelDetail {
    fn endpoint() -> String {
        format!("{ENDPOINT}/{{panel_name}}")
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PanelRecordsSummary {
    pub panel_name: String,
    pub records_summary: Vec<LgdSummary>,
}
impl Endpoint for PanelRecordsSummary {
    fn endpoint() -> String {
        format!("{ENDPOINT}/{{panel_name}}/{SUMMARY_SUFFIX}")
    }
}
