use g2p_core::model::ontology::OntologySource;
use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

/// What an external ontology service said about an accession.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OntologyLookupResult {
    Found { descriptions: Vec<String> },
    NotFound,
    QueryFailed,
}

impl OntologyLookupResult {
    #[must_use]
    pub fn first_description(&self) -> Option<&str> {
        match self {
            Self::Found { descriptions } => descriptions.first().map(String::as_str),
            _ => None,
        }
    }
}

pub trait OntologyLookup {
    fn lookup(
        &self,
        accession: &str,
        source: OntologySource,
    ) -> impl Future<Output = OntologyLookupResult> + Send;
}

/// Looks up Mondo terms in the EBI Ontology Lookup Service and, when an API
/// key is configured, OMIM entries in the OMIM API.
#[derive(Clone)]
pub struct OlsClient {
    http_client: reqwest::Client,
    ols_url: Url,
    omim_url: Url,
    omim_api_key: Option<String>,
}

#[derive(Deserialize)]
struct OlsResponse {
    #[serde(rename = "_embedded")]
    embedded: Option<OlsEmbedded>,
}

#[derive(Deserialize)]
struct OlsEmbedded {
    #[serde(default)]
    terms: Vec<OlsTerm>,
}

#[derive(Deserialize)]
struct OlsTerm {
    #[serde(default)]
    description: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OmimResponse {
    omim: OmimBody,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OmimBody {
    #[serde(default)]
    entry_list: Vec<OmimEntryWrapper>,
}

#[derive(Deserialize)]
struct OmimEntryWrapper {
    entry: OmimEntry,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OmimEntry {
    #[serde(default)]
    text_section_list: Vec<OmimTextSectionWrapper>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OmimTextSectionWrapper {
    text_section: OmimTextSection,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OmimTextSection {
    text_section_name: String,
    text_section_content: String,
}

/// Appends path segments to a configured base URL, with or without a trailing
/// slash. Bases that cannot carry a path are returned unchanged.
fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }

    url
}

impl OlsClient {
    #[must_use]
    pub fn new(
        http_client: reqwest::Client,
        ols_url: Url,
        omim_url: Url,
        omim_api_key: Option<String>,
    ) -> Self {
        Self {
            http_client,
            ols_url,
            omim_url,
            omim_api_key,
        }
    }

    async fn lookup_mondo(&self, accession: &str) -> reqwest::Result<OntologyLookupResult> {
        let response = self
            .http_client
            .get(endpoint(&self.ols_url, &["ontologies", "mondo", "terms"]))
            .query(&[("obo_id", accession)])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(OntologyLookupResult::NotFound);
        }

        let body: OlsResponse = response.error_for_status()?.json().await?;

        let Some(term) = body.embedded.and_then(|e| e.terms.into_iter().next()) else {
            return Ok(OntologyLookupResult::NotFound);
        };

        Ok(OntologyLookupResult::Found {
            descriptions: term.description,
        })
    }

    async fn lookup_omim(&self, accession: &str) -> reqwest::Result<OntologyLookupResult> {
        let Some(api_key) = &self.omim_api_key else {
            tracing::debug!(accession, "no OMIM API key configured, skipping lookup");
            return Ok(OntologyLookupResult::NotFound);
        };

        let mim_number = accession.trim_start_matches("OMIM:");

        let response = self
            .http_client
            .get(endpoint(&self.omim_url, &["entry"]))
            .query(&[
                ("mimNumber", mim_number),
                ("format", "json"),
                ("include", "text"),
                ("apiKey", api_key),
            ])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(OntologyLookupResult::NotFound);
        }

        let body: OmimResponse = response.error_for_status()?.json().await?;

        let Some(OmimEntryWrapper { entry }) = body.omim.entry_list.into_iter().next() else {
            return Ok(OntologyLookupResult::NotFound);
        };

        let descriptions = entry
            .text_section_list
            .into_iter()
            .map(|s| s.text_section)
            .filter(|s| s.text_section_name == "description")
            .map(|s| s.text_section_content)
            .collect();

        Ok(OntologyLookupResult::Found { descriptions })
    }
}

impl OntologyLookup for OlsClient {
    async fn lookup(&self, accession: &str, source: OntologySource) -> OntologyLookupResult {
        let result = match source {
            OntologySource::Mondo => self.lookup_mondo(accession).await,
            OntologySource::Omim => self.lookup_omim(accession).await,
        };

        result.unwrap_or_else(|err| {
            tracing::warn!(accession, %source, error = %err, "ontology lookup failed");
            OntologyLookupResult::QueryFailed
        })
    }
}
