use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use g2p_core::model::attrib::{AttribTypeCodes, AttribValues};
use g2p_schema::{attrib, attrib_type};

use crate::db::{
    error::{Error, Result},
    model::FetchById,
};

pub(super) const ONTOLOGY_TERM_GROUP: (&str, &str) = ("ontology_term_group", "disease");
pub(super) const ONTOLOGY_MAPPING: (&str, &str) = ("ontology_mapping", "Data source");

/// # Errors
pub async fn fetch_attrib_type_codes(db_conn: &mut AsyncPgConnection) -> Result<AttribTypeCodes> {
    let codes = attrib_type::table
        .select(attrib_type::code)
        .order_by(attrib_type::code)
        .load(db_conn)
        .await?;

    Ok(AttribTypeCodes(codes))
}

impl FetchById for AttribValues {
    type Id = str;

    async fn fetch_by_id(code: &Self::Id, db_conn: &mut AsyncPgConnection) -> Result<Self> {
        let type_id: i32 = attrib_type::table
            .filter(attrib_type::code.eq(code))
            .select(attrib_type::id)
            .first(db_conn)
            .await?;

        let values = attrib::table
            .filter(attrib::type_id.eq(type_id))
            .filter(attrib::is_deleted.eq(false))
            .select(attrib::value)
            .order_by(attrib::id)
            .load(db_conn)
            .await?;

        Ok(Self(values))
    }
}

/// Looks up reference data the application cannot work without. A missing row
/// means the database was not seeded, which is a server fault rather than a
/// client one.
pub(super) async fn required_attrib_id(
    (type_code, value): (&str, &str),
    db_conn: &mut AsyncPgConnection,
) -> Result<i32> {
    attrib::table
        .inner_join(attrib_type::table)
        .filter(attrib_type::code.eq(type_code))
        .filter(attrib::value.eq(value))
        .select(attrib::id)
        .first(db_conn)
        .await
        .optional()?
        .ok_or_else(|| Error::Other {
            message: format!("required attrib '{value}' of type '{type_code}' is missing"),
        })
}
