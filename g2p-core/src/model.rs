pub mod attrib;
pub mod curator;
pub mod disease;
pub mod gene_disease;
pub mod ontology;
pub mod panel;
pub mod record;

pub trait Endpoint {
    fn endpoint() -> String;
}

const SUMMARY_SUFFIX: &str = "summary";
