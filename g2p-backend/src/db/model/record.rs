use diesel::sql_types::{Bool, Integer};
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use g2p_core::model::record::{LgdSummary, LgdSummaryRow, fold_records};

use super::Viewer;
use crate::db::error::Result;

/// Which LGD records a summary covers.
#[derive(Debug, Clone, Copy)]
pub(super) enum RecordScope {
    Disease(i32),
    Panel(i32),
}

// `$2` is true when the caller may see hidden panels. For everyone else the
// panel join only matches visible panels, and the `where` clause drops records
// that are left without one.
const SUMMARY_SELECT: &str = r"
select
    stable.stable_id,
    locus.name as locus,
    disease.name as disease,
    genotype.value as genotype,
    confidence.value as confidence,
    panel.name as panel,
    consequence.term as variant_consequence,
    variant_type.term as variant_type,
    mechanism.value as molecular_mechanism
from locus_genotype_disease lgd
    join g2p_stable_id stable on stable.id = lgd.stable_id
    join locus on locus.id = lgd.locus_id
    join disease on disease.id = lgd.disease_id
    join attrib genotype on genotype.id = lgd.genotype_id
    join attrib confidence on confidence.id = lgd.confidence_id
    left join lgd_panel on lgd_panel.lgd_id = lgd.id and not lgd_panel.is_deleted
    left join panel on panel.id = lgd_panel.panel_id and ($2 or panel.is_visible)
    left join lgd_variant_gencc_consequence lvc on lvc.lgd_id = lgd.id and not lvc.is_deleted
    left join ontology_term consequence on consequence.id = lvc.variant_consequence_id
    left join lgd_variant_type lvt on lvt.lgd_id = lgd.id and not lvt.is_deleted
    left join ontology_term variant_type on variant_type.id = lvt.variant_type_ot_id
    left join lgd_molecular_mechanism lmm on lmm.lgd_id = lgd.id and not lmm.is_deleted
    left join attrib mechanism on mechanism.id = lmm.mechanism_id
where not lgd.is_deleted
    and ($2 or panel.id is not null)";

const SUMMARY_ORDER: &str = r"
order by lgd.date_review desc nulls last, stable.stable_id, lgd_panel.id, lvc.id, lvt.id, lmm.id";

impl RecordScope {
    fn filter(self) -> &'static str {
        match self {
            Self::Disease(_) => "\n    and lgd.disease_id = $1",
            Self::Panel(_) => {
                r"
    and exists (
        select 1 from lgd_panel scoped
        where scoped.lgd_id = lgd.id and scoped.panel_id = $1 and not scoped.is_deleted
    )"
            }
        }
    }

    fn id(self) -> i32 {
        match self {
            Self::Disease(id) | Self::Panel(id) => id,
        }
    }

    fn query(self) -> String {
        format!("{SUMMARY_SELECT}{}{SUMMARY_ORDER}", self.filter())
    }
}

/// Loads the flattened record rows in scope and folds them into one summary per
/// stable id, most recently reviewed first.
pub(super) async fn fetch_records_summary(
    scope: RecordScope,
    viewer: Viewer,
    db_conn: &mut AsyncPgConnection,
) -> Result<Vec<LgdSummary>> {
    let rows: Vec<LgdSummaryRow> = diesel::sql_query(scope.query())
        .bind::<Integer, _>(scope.id())
        .bind::<Bool, _>(viewer.sees_hidden_panels())
        .load(db_conn)
        .await?;

    tracing::debug!(?scope, ?viewer, n_rows = rows.len(), "folding record rows");

    Ok(fold_records(rows))
}

#[cfg(test)]
mod tests {
    use diesel_async::{AsyncConnection, scoped_futures::ScopedFutureExt};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::db::{
        error::Error,
        test_util::{DbConnection, db_conn, fixture_ids},
    };

    fn stable_ids(summaries: &[LgdSummary]) -> Vec<&str> {
        summaries.iter().map(|s| s.stable_id.as_str()).collect()
    }

    #[rstest]
    #[awt]
    #[tokio::test]
    async fn public_disease_summary(#[future] mut db_conn: DbConnection) {
        db_conn
            .test_transaction::<_, Error, _>(|conn| {
                async move {
                    let ids = fixture_ids(conn).await;

                    let summaries = fetch_records_summary(
                        RecordScope::Disease(ids.noonan_disease),
                        Viewer::Public,
                        conn,
                    )
                    .await
                    .unwrap();

                    // G2P00002 is only in a hidden panel and G2P00003 is deleted
                    assert_eq!(stable_ids(&summaries), ["G2P00001"]);

                    let summary = &summaries[0];
                    assert_eq!(summary.locus, "PTPN11");
                    assert_eq!(summary.confidence, "definitive");
                    assert_eq!(summary.panels, ["DD"]);
                    assert_eq!(summary.variant_consequence, ["altered_gene_product_structure"]);
                    assert_eq!(summary.variant_type, ["missense_variant", "inframe_deletion"]);
                    assert_eq!(summary.molecular_mechanism, ["gain of function"]);

                    Ok(())
                }
                .scope_boxed()
            })
            .await;
    }

    #[rstest]
    #[awt]
    #[tokio::test]
    async fn curator_disease_summary(#[future] mut db_conn: DbConnection) {
        db_conn
            .test_transaction::<_, Error, _>(|conn| {
                async move {
                    let ids = fixture_ids(conn).await;

                    let summaries = fetch_records_summary(
                        RecordScope::Disease(ids.noonan_disease),
                        Viewer::Curator,
                        conn,
                    )
                    .await
                    .unwrap();

                    assert_eq!(stable_ids(&summaries), ["G2P00001", "G2P00002"]);
                    assert_eq!(summaries[0].panels, ["DD", "Demo"]);
                    assert_eq!(summaries[1].panels, ["Demo"]);
                    assert!(summaries[1].variant_type.is_empty());

                    Ok(())
                }
                .scope_boxed()
            })
            .await;
    }

    #[rstest]
    #[awt]
    #[tokio::test]
    async fn panel_summary_ignores_deleted_links(#[future] mut db_conn: DbConnection) {
        db_conn
            .test_transaction::<_, Error, _>(|conn| {
                async move {
                    let ids = fixture_ids(conn).await;

                    let dd = fetch_records_summary(
                        RecordScope::Panel(ids.dd_panel),
                        Viewer::Public,
                        conn,
                    )
                    .await
                    .unwrap();
                    // Reviewed records come before the one without a review date
                    assert_eq!(stable_ids(&dd), ["G2P00001", "G2P00004"]);
                    assert_eq!(dd[1].panels, ["DD"]);

                    let cardiac = fetch_records_summary(
                        RecordScope::Panel(ids.cardiac_panel),
                        Viewer::Curator,
                        conn,
                    )
                    .await
                    .unwrap();
                    assert!(cardiac.is_empty());

                    Ok(())
                }
                .scope_boxed()
            })
            .await;
    }
}
