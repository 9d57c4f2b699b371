use anyhow::Context;
use diesel::{pg::Pg, prelude::*};
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use g2p_schema::{attrib, attrib_type, panel, source};
use serde::Deserialize;

const DEFAULT_SEED_DATA: &str = include_str!("../../seed_data.json");

#[derive(Deserialize, Insertable, Clone, Debug)]
#[diesel(table_name = attrib_type, check_for_backend(Pg))]
struct SeedAttribType {
    code: String,
    name: String,
    description: Option<String>,
    #[diesel(skip_insertion)]
    attribs: Vec<String>,
}

#[derive(Deserialize, Insertable, Clone, Debug)]
#[diesel(table_name = source, check_for_backend(Pg))]
struct SeedSource {
    name: String,
    description: Option<String>,
    url: Option<String>,
}

#[derive(Deserialize, Insertable, Clone, Debug)]
#[diesel(table_name = panel, check_for_backend(Pg))]
struct SeedPanel {
    name: String,
    description: Option<String>,
    is_visible: bool,
}

/// Reference data the application needs before it can accept requests.
/// Writing it is idempotent: rows that already exist are left untouched.
#[derive(Deserialize, Clone, Debug)]
pub struct SeedData {
    attrib_types: Vec<SeedAttribType>,
    sources: Vec<SeedSource>,
    panels: Vec<SeedPanel>,
}

impl SeedData {
    /// # Errors
    pub fn bundled() -> anyhow::Result<Self> {
        serde_json::from_str(DEFAULT_SEED_DATA).context("bundled seed data is malformed")
    }

    /// # Errors
    pub async fn write(self, db_conn: &mut AsyncPgConnection) -> anyhow::Result<()> {
        let Self {
            attrib_types,
            sources,
            panels,
        } = self;

        for attrib_type in attrib_types {
            diesel::insert_into(attrib_type::table)
                .values(&attrib_type)
                .on_conflict(attrib_type::code)
                .do_nothing()
                .execute(db_conn)
                .await
                .context(format!("failed to insert attrib type {}", attrib_type.code))?;

            let type_id: i32 = attrib_type::table
                .filter(attrib_type::code.eq(&attrib_type.code))
                .select(attrib_type::id)
                .first(db_conn)
                .await?;

            let attribs: Vec<_> = attrib_type
                .attribs
                .iter()
                .map(|value| (attrib::type_id.eq(type_id), attrib::value.eq(value)))
                .collect();

            if attribs.is_empty() {
                continue;
            }

            diesel::insert_into(attrib::table)
                .values(attribs)
                .on_conflict((attrib::type_id, attrib::value))
                .do_nothing()
                .execute(db_conn)
                .await
                .context(format!("failed to insert attribs of type {}", attrib_type.code))?;
        }

        diesel::insert_into(source::table)
            .values(&sources)
            .on_conflict(source::name)
            .do_nothing()
            .execute(db_conn)
            .await
            .context("failed to insert sources")?;

        diesel::insert_into(panel::table)
            .values(&panels)
            .on_conflict(panel::name)
            .do_nothing()
            .execute(db_conn)
            .await
            .context("failed to insert panels")?;

        Ok(())
    }
}
