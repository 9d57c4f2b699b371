use std::collections::HashMap;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{
    AsyncPgConnection, RunQueryDsl,
    pooled_connection::{
        AsyncDieselConnectionManager,
        deadpool::{Object, Pool},
    },
};
use g2p_core::model::ontology::OntologySource;
use g2p_schema::{
    attrib, attrib_type, curator, curator_panel, disease, disease_ontology_term, disease_synonym,
    g2p_stable_id, gene_disease, lgd_molecular_mechanism, lgd_panel,
    lgd_variant_gencc_consequence, lgd_variant_type, locus, locus_genotype_disease as lgd,
    ontology_term, panel, source,
};
use rstest::fixture;
use tokio::sync::OnceCell;

use crate::{
    db::seed_data::SeedData,
    ontology::{OntologyLookup, OntologyLookupResult},
    server::{run_migrations, util::DevContainer},
};

pub const NOONAN_DISEASE: &str = "PTPN11-related Noonan syndrome";
pub const NOONAN_SYNONYM: &str = "Noonan syndrome 1";
pub const SOS1_DISEASE: &str = "SOS1-related Noonan syndrome";
pub const FIXTURE_CURATOR: &str = "fixture_curator";

/// Ids of fixture rows that tests address directly.
pub struct FixtureIds {
    pub noonan_disease: i32,
    pub dd_panel: i32,
    pub cardiac_panel: i32,
}

pub async fn fixture_ids(db_conn: &mut AsyncPgConnection) -> FixtureIds {
    let disease_id = |name: &'static str| {
        disease::table
            .filter(disease::name.eq(name))
            .select(disease::id)
    };
    let panel_id = |name: &'static str| panel::table.filter(panel::name.eq(name)).select(panel::id);

    FixtureIds {
        noonan_disease: disease_id(NOONAN_DISEASE).first(db_conn).await.unwrap(),
        dd_panel: panel_id("DD").first(db_conn).await.unwrap(),
        cardiac_panel: panel_id("Cardiac").first(db_conn).await.unwrap(),
    }
}

/// Answers Mondo lookups from a fixed table. OMIM accessions are never found,
/// as with a server that has no OMIM API key.
#[derive(Default)]
pub struct FakeOntology {
    mondo: HashMap<String, Vec<String>>,
    failing: bool,
}

impl FakeOntology {
    pub fn with_mondo(mut self, accession: &str, descriptions: &[&str]) -> Self {
        self.mondo.insert(
            accession.to_string(),
            descriptions.iter().map(|d| (*d).to_string()).collect(),
        );

        self
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Default::default()
        }
    }
}

impl OntologyLookup for FakeOntology {
    async fn lookup(&self, accession: &str, source: OntologySource) -> OntologyLookupResult {
        if self.failing {
            return OntologyLookupResult::QueryFailed;
        }

        match (source, self.mondo.get(accession)) {
            (OntologySource::Mondo, Some(descriptions)) => OntologyLookupResult::Found {
                descriptions: descriptions.clone(),
            },
            _ => OntologyLookupResult::NotFound,
        }
    }
}

struct TestState {
    _container: DevContainer,
    db_pool: Pool<AsyncPgConnection>,
}

impl TestState {
    async fn new() -> Self {
        let container = DevContainer::new("g2p-backend_unit_test", false)
            .await
            .unwrap();

        let db_url = container.db_url().await.unwrap();
        let db_config = AsyncDieselConnectionManager::<AsyncPgConnection>::new(db_url);
        let db_pool = Pool::builder(db_config).build().unwrap();

        let test_state = Self {
            _container: container,
            db_pool,
        };

        test_state.populate_db().await;

        test_state
    }

    async fn populate_db(&self) {
        let db_conn = self.db_pool.get().await.unwrap();
        run_migrations(db_conn).await.unwrap();

        let db_conn = &mut self.db_pool.get().await.unwrap();

        SeedData::bundled().unwrap().write(db_conn).await.unwrap();

        insert_fixtures(db_conn).await;
    }
}

async fn attrib_id(type_code: &str, value: &str, db_conn: &mut AsyncPgConnection) -> i32 {
    attrib::table
        .inner_join(attrib_type::table)
        .filter(attrib_type::code.eq(type_code))
        .filter(attrib::value.eq(value))
        .select(attrib::id)
        .first(db_conn)
        .await
        .unwrap()
}

async fn insert_ontology_term(
    accession: &str,
    term: &str,
    (source_name, group): (&str, &str),
    db_conn: &mut AsyncPgConnection,
) -> i32 {
    let source_id: i32 = source::table
        .filter(source::name.eq(source_name))
        .select(source::id)
        .first(db_conn)
        .await
        .unwrap();
    let group_type_id = attrib_id("ontology_term_group", group, db_conn).await;

    diesel::insert_into(ontology_term::table)
        .values((
            ontology_term::accession.eq(accession),
            ontology_term::term.eq(term),
            ontology_term::source_id.eq(source_id),
            ontology_term::group_type_id.eq(group_type_id),
        ))
        .returning(ontology_term::id)
        .get_result(db_conn)
        .await
        .unwrap()
}

struct FixtureRecord {
    stable_id: &'static str,
    locus_id: i32,
    disease_id: i32,
    genotype: &'static str,
    confidence: &'static str,
    date_review: Option<&'static str>,
    is_reviewed: bool,
    is_deleted: bool,
}

async fn insert_record(record: FixtureRecord, db_conn: &mut AsyncPgConnection) -> i32 {
    let FixtureRecord {
        stable_id,
        locus_id,
        disease_id,
        genotype,
        confidence,
        date_review,
        is_reviewed,
        is_deleted,
    } = record;

    let stable_id: i32 = diesel::insert_into(g2p_stable_id::table)
        .values(g2p_stable_id::stable_id.eq(stable_id))
        .returning(g2p_stable_id::id)
        .get_result(db_conn)
        .await
        .unwrap();

    let genotype_id = attrib_id("genotype", genotype, db_conn).await;
    let confidence_id = attrib_id("confidence_category", confidence, db_conn).await;
    let date_review = date_review.map(|d| d.parse::<DateTime<Utc>>().unwrap());

    diesel::insert_into(lgd::table)
        .values((
            lgd::stable_id.eq(stable_id),
            lgd::locus_id.eq(locus_id),
            lgd::genotype_id.eq(genotype_id),
            lgd::disease_id.eq(disease_id),
            lgd::confidence_id.eq(confidence_id),
            lgd::date_review.eq(date_review),
            lgd::is_reviewed.eq(is_reviewed),
            lgd::is_deleted.eq(is_deleted),
        ))
        .returning(lgd::id)
        .get_result(db_conn)
        .await
        .unwrap()
}

/// PTPN11 has three Noonan records: G2P00001 (visible in DD, also in the hidden
/// Demo panel), G2P00002 (only in Demo) and G2P00003 (deleted). SOS1 has
/// G2P00004, unreviewed, in DD and with a deleted link to Cardiac.
async fn insert_fixtures(db_conn: &mut AsyncPgConnection) {
    let loci: Vec<i32> = diesel::insert_into(locus::table)
        .values(vec![locus::name.eq("PTPN11"), locus::name.eq("SOS1")])
        .returning(locus::id)
        .get_results(db_conn)
        .await
        .unwrap();
    let (ptpn11, sos1) = (loci[0], loci[1]);

    let diseases: Vec<i32> = diesel::insert_into(disease::table)
        .values(vec![disease::name.eq(NOONAN_DISEASE), disease::name.eq(SOS1_DISEASE)])
        .returning(disease::id)
        .get_results(db_conn)
        .await
        .unwrap();
    let (noonan, sos1_noonan) = (diseases[0], diseases[1]);

    diesel::insert_into(disease_synonym::table)
        .values((
            disease_synonym::disease_id.eq(noonan),
            disease_synonym::synonym.eq(NOONAN_SYNONYM),
        ))
        .execute(db_conn)
        .await
        .unwrap();

    let omim_noonan = insert_ontology_term(
        "OMIM:163950",
        "NOONAN SYNDROME 1",
        ("OMIM", "disease"),
        db_conn,
    )
    .await;
    let data_source = attrib_id("ontology_mapping", "Data source", db_conn).await;
    diesel::insert_into(disease_ontology_term::table)
        .values((
            disease_ontology_term::disease_id.eq(noonan),
            disease_ontology_term::ontology_term_id.eq(omim_noonan),
            disease_ontology_term::mapped_by_attrib_id.eq(data_source),
        ))
        .execute(db_conn)
        .await
        .unwrap();

    let sequence_ontology = ("Sequence Ontology", "variant_type");
    let altered_structure = insert_ontology_term(
        "SO:0002318",
        "altered_gene_product_structure",
        sequence_ontology,
        db_conn,
    )
    .await;
    let missense =
        insert_ontology_term("SO:0001583", "missense_variant", sequence_ontology, db_conn).await;
    let inframe_deletion =
        insert_ontology_term("SO:0001822", "inframe_deletion", sequence_ontology, db_conn).await;

    let g2p00001 = insert_record(
        FixtureRecord {
            stable_id: "G2P00001",
            locus_id: ptpn11,
            disease_id: noonan,
            genotype: "monoallelic_autosomal",
            confidence: "definitive",
            date_review: Some("2024-03-01T12:00:00Z"),
            is_reviewed: true,
            is_deleted: false,
        },
        db_conn,
    )
    .await;
    let g2p00002 = insert_record(
        FixtureRecord {
            stable_id: "G2P00002",
            locus_id: ptpn11,
            disease_id: noonan,
            genotype: "biallelic_autosomal",
            confidence: "limited",
            date_review: Some("2023-06-15T12:00:00Z"),
            is_reviewed: true,
            is_deleted: false,
        },
        db_conn,
    )
    .await;
    let g2p00003 = insert_record(
        FixtureRecord {
            stable_id: "G2P00003",
            locus_id: ptpn11,
            disease_id: noonan,
            genotype: "monoallelic_autosomal",
            confidence: "strong",
            date_review: Some("2025-01-01T12:00:00Z"),
            is_reviewed: true,
            is_deleted: true,
        },
        db_conn,
    )
    .await;
    let g2p00004 = insert_record(
        FixtureRecord {
            stable_id: "G2P00004",
            locus_id: sos1,
            disease_id: sos1_noonan,
            genotype: "monoallelic_autosomal",
            confidence: "definitive",
            date_review: None,
            is_reviewed: false,
            is_deleted: false,
        },
        db_conn,
    )
    .await;

    let panel_id = |name: &'static str| panel::table.filter(panel::name.eq(name)).select(panel::id);
    let dd: i32 = panel_id("DD").first(db_conn).await.unwrap();
    let demo: i32 = panel_id("Demo").first(db_conn).await.unwrap();
    let cardiac: i32 = panel_id("Cardiac").first(db_conn).await.unwrap();

    // Inserted one by one so that ids follow this order
    for (lgd_id, panel_id, is_deleted) in [
        (g2p00001, dd, false),
        (g2p00001, demo, false),
        (g2p00002, demo, false),
        (g2p00003, dd, false),
        (g2p00004, dd, false),
        (g2p00004, cardiac, true),
    ] {
        diesel::insert_into(lgd_panel::table)
            .values((
                lgd_panel::lgd_id.eq(lgd_id),
                lgd_panel::panel_id.eq(panel_id),
                lgd_panel::is_deleted.eq(is_deleted),
            ))
            .execute(db_conn)
            .await
            .unwrap();
    }

    diesel::insert_into(lgd_variant_gencc_consequence::table)
        .values((
            lgd_variant_gencc_consequence::lgd_id.eq(g2p00001),
            lgd_variant_gencc_consequence::variant_consequence_id.eq(altered_structure),
        ))
        .execute(db_conn)
        .await
        .unwrap();

    for variant_type in [missense, inframe_deletion] {
        diesel::insert_into(lgd_variant_type::table)
            .values((
                lgd_variant_type::lgd_id.eq(g2p00001),
                lgd_variant_type::variant_type_ot_id.eq(variant_type),
            ))
            .execute(db_conn)
            .await
            .unwrap();
    }

    let gain_of_function = attrib_id("mechanism", "gain of function", db_conn).await;
    diesel::insert_into(lgd_molecular_mechanism::table)
        .values((
            lgd_molecular_mechanism::lgd_id.eq(g2p00001),
            lgd_molecular_mechanism::mechanism_id.eq(gain_of_function),
        ))
        .execute(db_conn)
        .await
        .unwrap();

    let omim: i32 = source::table
        .filter(source::name.eq("OMIM"))
        .select(source::id)
        .first(db_conn)
        .await
        .unwrap();
    for (disease, identifier) in [
        ("NOONAN SYNDROME 1", "OMIM:163950"),
        ("LEOPARD SYNDROME 1", "OMIM:151100"),
    ] {
        diesel::insert_into(gene_disease::table)
            .values((
                gene_disease::locus_id.eq(ptpn11),
                gene_disease::disease.eq(disease),
                gene_disease::identifier.eq(identifier),
                gene_disease::source_id.eq(omim),
            ))
            .execute(db_conn)
            .await
            .unwrap();
    }

    let curator_id: i32 = diesel::insert_into(curator::table)
        .values((
            curator::username.eq(FIXTURE_CURATOR),
            curator::email.eq("fixture_curator@example.com"),
            curator::api_key_prefix.eq("fixture0"),
            curator::api_key_hash.eq("not a hash"),
        ))
        .returning(curator::id)
        .get_result(db_conn)
        .await
        .unwrap();
    diesel::insert_into(curator_panel::table)
        .values((
            curator_panel::curator_id.eq(curator_id),
            curator_panel::panel_id.eq(dd),
        ))
        .execute(db_conn)
        .await
        .unwrap();
}

static TEST_STATE: OnceCell<TestState> = OnceCell::const_new();
pub type DbConnection = Object<AsyncPgConnection>;

#[fixture]
pub async fn db_conn() -> DbConnection {
    let test_state = TEST_STATE.get_or_init(TestState::new).await;

    test_state.db_pool.get().await.unwrap()
}
