use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use g2p_core::model::gene_disease::GeneDisease;
use g2p_schema::{gene_disease, locus, source};

use super::FetchById;
use crate::db::error::Result;

impl FetchById for Vec<GeneDisease> {
    type Id = str;

    async fn fetch_by_id(symbol: &Self::Id, db_conn: &mut AsyncPgConnection) -> Result<Self> {
        let locus_id: i32 = locus::table
            .filter(locus::name.eq(symbol))
            .select(locus::id)
            .first(db_conn)
            .await?;

        Ok(gene_disease::table
            .inner_join(source::table)
            .filter(gene_disease::locus_id.eq(locus_id))
            .select(GeneDisease::as_select())
            .order_by((gene_disease::disease, gene_disease::identifier))
            .load(db_conn)
            .await?)
    }
}
