use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static MONDO_ACCESSION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^MONDO[:_]\d{7}$").unwrap());
static OMIM_ACCESSION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:OMIM:)?\d{6}$").unwrap());

/// External vocabularies a disease ontology term can be imported from. The
/// string form matches the `source.name` column.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
pub enum OntologySource {
    #[serde(rename = "OMIM")]
    #[strum(serialize = "OMIM")]
    Omim,
    Mondo,
}

impl OntologySource {
    /// Works out which vocabulary an accession belongs to from its shape alone.
    /// Returns `None` for anything that is neither a Mondo nor an OMIM identifier.
    #[must_use]
    pub fn from_accession(accession: &str) -> Option<Self> {
        let accession = accession.trim();

        if MONDO_ACCESSION_REGEX.is_match(accession) {
            Some(Self::Mondo)
        } else if OMIM_ACCESSION_REGEX.is_match(accession) {
            Some(Self::Omim)
        } else {
            None
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        self.into()
    }
}

/// Message returned to clients for an accession that matches no known vocabulary.
#[must_use]
pub fn invalid_accession_message(accession: &str) -> String {
    format!("Invalid ID '{accession}' please input a valid ID from OMIM or Mondo")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("MONDO:0007893", Some(OntologySource::Mondo))]
    #[case("MONDO_0007893", Some(OntologySource::Mondo))]
    #[case(" MONDO:0007893 ", Some(OntologySource::Mondo))]
    #[case("163950", Some(OntologySource::Omim))]
    #[case("OMIM:163950", Some(OntologySource::Omim))]
    #[case("mondo:0007893", None)]
    #[case("MONDO:123", None)]
    #[case("HP:0001250", None)]
    #[case("16395", None)]
    #[case("", None)]
    fn accession_classification(#[case] accession: &str, #[case] expected: Option<OntologySource>) {
        assert_eq!(OntologySource::from_accession(accession), expected);
    }

    #[test]
    fn source_names_match_database_rows() {
        assert_eq!(OntologySource::Omim.name(), "OMIM");
        assert_eq!(OntologySource::Mondo.name(), "Mondo");
        assert_eq!(OntologySource::Omim.to_string(), "OMIM");
    }

    #[test]
    fn invalid_accession_message_names_the_accession() {
        assert_eq!(
            invalid_accession_message("XYZ:1"),
            "Invalid ID 'XYZ:1' please input a valid ID from OMIM or Mondo"
        );
    }
}
