use chrono::{DateTime, Utc};
use diesel::{
    dsl::{count_distinct, max, not},
    prelude::*,
};
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use g2p_core::model::panel::{
    PanelDetail, PanelList, PanelRecordsSummary, PanelStats, PanelSummary,
};
use g2p_schema::{
    attrib, curator, curator_panel, lgd_panel, locus_genotype_disease as lgd, panel,
};

use super::{
    FetchVisible, Viewer,
    record::{RecordScope, fetch_records_summary},
};
use crate::db::error::Result;

/// Non-deleted records with a non-deleted link to the panel, joined with their
/// confidence attrib.
macro_rules! panel_records {
    ($panel_id:expr) => {
        lgd::table
            .inner_join(lgd_panel::table)
            .inner_join(attrib::table.on(attrib::id.eq(lgd::confidence_id)))
            .filter(lgd_panel::panel_id.eq($panel_id))
            .filter(not(lgd_panel::is_deleted))
            .filter(not(lgd::is_deleted))
    };
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = panel, check_for_backend(diesel::pg::Pg))]
struct PanelRow {
    id: i32,
    name: String,
    description: Option<String>,
}

async fn find_visible_panel(
    name: &str,
    viewer: Viewer,
    db_conn: &mut AsyncPgConnection,
) -> Result<PanelRow> {
    let mut query = panel::table
        .filter(panel::name.eq(name))
        .select(PanelRow::as_select())
        .into_boxed();

    if !viewer.sees_hidden_panels() {
        query = query.filter(panel::is_visible.eq(true));
    }

    Ok(query.first(db_conn).await?)
}

async fn panel_stats(panel_id: i32, db_conn: &mut AsyncPgConnection) -> Result<PanelStats> {
    let (total_records, total_genes) = panel_records!(panel_id)
        .select((count_distinct(lgd::id), count_distinct(lgd::locus_id)))
        .get_result::<(i64, i64)>(db_conn)
        .await?;

    let by_confidence = panel_records!(panel_id)
        .group_by(attrib::value)
        .select((attrib::value, count_distinct(lgd::id)))
        .load::<(String, i64)>(db_conn)
        .await?
        .into_iter()
        .collect();

    Ok(PanelStats {
        total_records,
        total_genes,
        by_confidence,
    })
}

/// # Errors
pub async fn fetch_panel_list(
    viewer: Viewer,
    db_conn: &mut AsyncPgConnection,
) -> Result<PanelList> {
    let mut query = panel::table
        .select(PanelRow::as_select())
        .order_by(panel::name)
        .into_boxed();

    if !viewer.sees_hidden_panels() {
        query = query.filter(panel::is_visible.eq(true));
    }

    let panels = query.load(db_conn).await?;

    // One stats query pair per panel; there are only a handful of panels
    let mut results = Vec::with_capacity(panels.len());
    for PanelRow {
        id,
        name,
        description,
    } in panels
    {
        results.push(PanelSummary {
            name,
            description,
            stats: panel_stats(id, db_conn).await?,
        });
    }

    Ok(PanelList::from(results))
}

impl FetchVisible for PanelDetail {
    type Id = str;

    async fn fetch_visible(
        name: &Self::Id,
        viewer: Viewer,
        db_conn: &mut AsyncPgConnection,
    ) -> Result<Self> {
        let PanelRow {
            id,
            name,
            description,
        } = find_visible_panel(name, viewer, db_conn).await?;

        let curators = curator_panel::table
            .inner_join(curator::table)
            .filter(curator_panel::panel_id.eq(id))
            .select(curator::username)
            .order_by(curator::username)
            .load(db_conn)
            .await?;

        let last_review: Option<DateTime<Utc>> = panel_records!(id)
            .filter(lgd::is_reviewed)
            .select(max(lgd::date_review))
            .get_result(db_conn)
            .await?;

        Ok(Self {
            name,
            description,
            curators,
            last_updated: last_review.map(|d| d.date_naive()),
            stats: panel_stats(id, db_conn).await?,
        })
    }
}

impl FetchVisible for PanelRecordsSummary {
    type Id = str;

    async fn fetch_visible(
        name: &Self::Id,
        viewer: Viewer,
        db_conn: &mut AsyncPgConnection,
    ) -> Result<Self> {
        let PanelRow { id, name, .. } = find_visible_panel(name, viewer, db_conn).await?;

        let records_summary = fetch_records_summary(RecordScope::Panel(id), viewer, db_conn).await?;

        Ok(Self {
            panel_name: name,
            records_summary,
        })
    }
}
