use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use g2p_core::{
    model::{
        disease::NewDiseaseOntologyTerm,
        ontology::{OntologySource, invalid_accession_message},
    },
    string::normalize_separator,
};
use g2p_schema::{ontology_term, source};

use super::attrib::{ONTOLOGY_TERM_GROUP, required_attrib_id};
use crate::{
    db::error::{Error, Result},
    ontology::{OntologyLookup, OntologyLookupResult},
};

/// An ontology reference whose accession has been classified and whose
/// separators have been normalized, ready to be matched or inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct PendingOntologyTerm {
    pub(super) accession: String,
    pub(super) term: String,
    pub(super) description: Option<String>,
    pub(super) source: OntologySource,
}

impl TryFrom<NewDiseaseOntologyTerm> for PendingOntologyTerm {
    type Error = Error;

    fn try_from(
        NewDiseaseOntologyTerm {
            accession,
            term,
            description,
        }: NewDiseaseOntologyTerm,
    ) -> Result<Self> {
        let Some(source) = OntologySource::from_accession(&accession) else {
            return Err(Error::invalid_data(invalid_accession_message(&accession)));
        };

        Ok(Self {
            accession: normalize_separator(&accession),
            term: normalize_separator(&term),
            description,
            source,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = ontology_term, check_for_backend(diesel::pg::Pg))]
struct NewOntologyTermRow<'a> {
    accession: &'a str,
    term: &'a str,
    description: Option<&'a str>,
    source_id: i32,
    group_type_id: i32,
}

pub(super) async fn required_source_id(
    name: &str,
    db_conn: &mut AsyncPgConnection,
) -> Result<i32> {
    source::table
        .filter(source::name.eq(name))
        .select(source::id)
        .first(db_conn)
        .await
        .optional()?
        .ok_or_else(|| Error::Other {
            message: format!("required source '{name}' is missing"),
        })
}

async fn find_by_accession(
    accession: &str,
    db_conn: &mut AsyncPgConnection,
) -> Result<Option<i32>> {
    Ok(ontology_term::table
        .filter(ontology_term::accession.eq(accession))
        .select(ontology_term::id)
        .first(db_conn)
        .await
        .optional()?)
}

fn check_lookup(term: &PendingOntologyTerm, lookup: &OntologyLookupResult) -> Result<()> {
    let PendingOntologyTerm {
        accession, source, ..
    } = term;

    match (source, lookup) {
        (_, OntologyLookupResult::QueryFailed) => Err(Error::invalid_data(format!(
            "Cannot query {source} ID {accession}"
        ))),
        (OntologySource::Mondo, OntologyLookupResult::NotFound) => {
            Err(Error::invalid_data(format!("Invalid Mondo ID {accession}")))
        }
        _ => Ok(()),
    }
}

/// A submitted ontology term after it has been matched against storage or, when
/// absent, classified and checked against its external source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum ResolvedOntologyTerm {
    Stored(i32),
    Missing(PendingOntologyTerm),
}

/// Stored accessions are accepted whatever their vocabulary. Only missing ones
/// must be Mondo or OMIM identifiers, and only those are looked up externally.
/// Nothing is written here.
pub(super) async fn resolve<O>(
    term: NewDiseaseOntologyTerm,
    ontology: &O,
    db_conn: &mut AsyncPgConnection,
) -> Result<ResolvedOntologyTerm>
where
    O: OntologyLookup + Sync,
{
    if let Some(id) = find_by_accession(&normalize_separator(&term.accession), db_conn).await? {
        return Ok(ResolvedOntologyTerm::Stored(id));
    }

    let mut pending = PendingOntologyTerm::try_from(term)?;

    let lookup = ontology.lookup(&pending.accession, pending.source).await;
    check_lookup(&pending, &lookup)?;

    if pending.description.is_none() {
        pending.description = lookup.first_description().map(str::to_string);
    }

    Ok(ResolvedOntologyTerm::Missing(pending))
}

/// Returns the id of a resolved term, inserting it first if it was missing.
pub(super) async fn find_or_import(
    term: &ResolvedOntologyTerm,
    db_conn: &mut AsyncPgConnection,
) -> Result<i32> {
    let pending = match term {
        ResolvedOntologyTerm::Stored(id) => return Ok(*id),
        ResolvedOntologyTerm::Missing(pending) => pending,
    };

    let source_id = required_source_id(pending.source.name(), db_conn).await?;
    let group_type_id = required_attrib_id(ONTOLOGY_TERM_GROUP, db_conn).await?;

    tracing::info!(
        accession = %pending.accession,
        source = %pending.source,
        "importing ontology term"
    );

    // The same accession may be submitted twice in one request
    diesel::insert_into(ontology_term::table)
        .values(NewOntologyTermRow {
            accession: &pending.accession,
            term: &pending.term,
            description: pending.description.as_deref(),
            source_id,
            group_type_id,
        })
        .on_conflict(ontology_term::accession)
        .do_nothing()
        .execute(db_conn)
        .await?;

    find_by_accession(&pending.accession, db_conn)
        .await?
        .ok_or(Error::RecordNotFound)
}
