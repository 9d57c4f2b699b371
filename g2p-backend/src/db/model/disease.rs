use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use g2p_core::{
    model::disease::{
        Disease, DiseaseDetail, DiseaseOntologyTerm, DiseaseRecordsSummary, NewDisease,
    },
    string::normalize_name,
};
use g2p_schema::{
    disease, disease_ontology_term, disease_synonym, locus_genotype_disease, ontology_term, source,
};

use super::{
    FetchById, FetchVisible, Viewer,
    attrib::{ONTOLOGY_MAPPING, required_attrib_id},
    ontology_term::{find_or_import, resolve},
    record::{RecordScope, fetch_records_summary},
};
use crate::{db::error::Result, ontology::OntologyLookup};

pub trait Reconcile {
    /// Stores a disease unless one already exists under the same name or
    /// synonym, then links it to the submitted ontology terms.
    fn reconcile<O>(
        self,
        ontology: &O,
        db_conn: &mut AsyncPgConnection,
    ) -> impl Future<Output = Result<Disease>> + Send
    where
        O: OntologyLookup + Sync;
}

/// Linear over every disease name and synonym. Names are normalized in Rust
/// rather than SQL so that both sides go through exactly the same function.
/// A synonym match takes precedence over a name match, and among several
/// matches of one kind the most recently stored row wins.
async fn find_matching_disease(
    name: &str,
    db_conn: &mut AsyncPgConnection,
) -> Result<Option<i32>> {
    let wanted = normalize_name(name);

    let synonyms: Vec<(i32, String)> = disease_synonym::table
        .select((disease_synonym::disease_id, disease_synonym::synonym))
        .order_by(disease_synonym::id)
        .load(db_conn)
        .await?;

    if let Some((id, _)) = synonyms.iter().rfind(|(_, s)| normalize_name(s) == wanted) {
        return Ok(Some(*id));
    }

    let names: Vec<(i32, String)> = disease::table
        .select((disease::id, disease::name))
        .order_by(disease::id)
        .load(db_conn)
        .await?;

    Ok(names
        .into_iter()
        .rfind(|(_, n)| normalize_name(n) == wanted)
        .map(|(id, _)| id))
}

impl Reconcile for NewDisease {
    async fn reconcile<O>(self, ontology: &O, db_conn: &mut AsyncPgConnection) -> Result<Disease>
    where
        O: OntologyLookup + Sync,
    {
        let Self {
            name,
            ontology_terms,
        } = self;

        // Every term is resolved before the disease is written, so a bad
        // accession or a failed lookup leaves no rows behind
        let mut resolved_terms = Vec::with_capacity(ontology_terms.len());
        for term in ontology_terms {
            resolved_terms.push(resolve(term, ontology, db_conn).await?);
        }

        let disease_id = match find_matching_disease(&name, db_conn).await? {
            Some(id) => {
                tracing::debug!(disease_id = id, "reusing existing disease");
                id
            }
            None => {
                diesel::insert_into(disease::table)
                    .values(disease::name.eq(name.trim()))
                    .returning(disease::id)
                    .get_result(db_conn)
                    .await?
            }
        };

        if !resolved_terms.is_empty() {
            let mapped_by_attrib_id = required_attrib_id(ONTOLOGY_MAPPING, db_conn).await?;

            for term in &resolved_terms {
                let ontology_term_id = find_or_import(term, db_conn).await?;

                diesel::insert_into(disease_ontology_term::table)
                    .values((
                        disease_ontology_term::disease_id.eq(disease_id),
                        disease_ontology_term::ontology_term_id.eq(ontology_term_id),
                        disease_ontology_term::mapped_by_attrib_id.eq(mapped_by_attrib_id),
                    ))
                    .on_conflict((
                        disease_ontology_term::disease_id,
                        disease_ontology_term::ontology_term_id,
                        disease_ontology_term::mapped_by_attrib_id,
                    ))
                    .do_nothing()
                    .execute(db_conn)
                    .await?;
            }
        }

        Disease::fetch_by_id(&disease_id, db_conn).await
    }
}

impl FetchById for Disease {
    type Id = i32;

    async fn fetch_by_id(id: &Self::Id, db_conn: &mut AsyncPgConnection) -> Result<Self> {
        let name = disease::table
            .find(id)
            .select(disease::name)
            .first(db_conn)
            .await?;

        let ontology_terms = disease_ontology_term::table
            .inner_join(ontology_term::table.inner_join(source::table))
            .filter(disease_ontology_term::disease_id.eq(id))
            .select(DiseaseOntologyTerm::as_select())
            .distinct()
            .order_by(ontology_term::accession)
            .load(db_conn)
            .await?;

        let synonyms = disease_synonym::table
            .filter(disease_synonym::disease_id.eq(id))
            .select(disease_synonym::synonym)
            .order_by(disease_synonym::synonym)
            .load(db_conn)
            .await?;

        Ok(Self {
            id: *id,
            name,
            ontology_terms,
            synonyms,
        })
    }
}

impl FetchById for DiseaseDetail {
    type Id = i32;

    async fn fetch_by_id(id: &Self::Id, db_conn: &mut AsyncPgConnection) -> Result<Self> {
        let disease = Disease::fetch_by_id(id, db_conn).await?;

        let last_review: Option<DateTime<Utc>> = locus_genotype_disease::table
            .filter(locus_genotype_disease::disease_id.eq(id))
            .filter(locus_genotype_disease::is_reviewed.eq(true))
            .filter(locus_genotype_disease::is_deleted.eq(false))
            .select(diesel::dsl::max(locus_genotype_disease::date_review))
            .get_result(db_conn)
            .await?;

        Ok(Self {
            disease,
            last_updated: last_review.map(|d| d.date_naive()),
        })
    }
}

impl FetchVisible for DiseaseRecordsSummary {
    type Id = i32;

    async fn fetch_visible(
        id: &Self::Id,
        viewer: Viewer,
        db_conn: &mut AsyncPgConnection,
    ) -> Result<Self> {
        let disease = disease::table
            .find(id)
            .select(disease::name)
            .first(db_conn)
            .await?;

        let records_summary =
            fetch_records_summary(RecordScope::Disease(*id), viewer, db_conn).await?;

        Ok(Self {
            disease,
            records_summary,
        })
    }
}
