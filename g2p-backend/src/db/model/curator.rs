use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use g2p_core::model::curator::{CreatedCurator, Curator, CuratorList, NewCurator};
use g2p_schema::{curator, curator_panel, panel};

use super::Write;
use crate::{
    auth::ApiKey,
    db::error::{Error, Result},
};

impl Write for NewCurator {
    type Returns = CreatedCurator;

    async fn write(self, db_conn: &mut AsyncPgConnection) -> Result<Self::Returns> {
        let Self {
            username,
            email,
            panels,
        } = self;

        let panel_ids: Vec<(i32, String)> = panel::table
            .filter(panel::name.eq_any(&panels))
            .select((panel::id, panel::name))
            .load(db_conn)
            .await?;

        if let Some(missing) = panels
            .iter()
            .find(|name| !panel_ids.iter().any(|(_, found)| found == *name))
        {
            return Err(Error::invalid_data(format!("Panel '{missing}' does not exist")));
        }

        let api_key = ApiKey::new();
        let hashed = api_key.hash().map_err(|err| Error::Other {
            message: format!("failed to hash API key: {err}"),
        })?;

        let curator = diesel::insert_into(curator::table)
            .values((
                curator::username.eq(username.trim()),
                curator::email.eq(&email),
                curator::api_key_prefix.eq(&hashed.prefix),
                curator::api_key_hash.eq(&hashed.hash),
            ))
            .returning(Curator::as_returning())
            .get_result(db_conn)
            .await?;

        if !panel_ids.is_empty() {
            let links: Vec<_> = panel_ids
                .iter()
                .map(|(panel_id, _)| {
                    (
                        curator_panel::curator_id.eq(curator.id),
                        curator_panel::panel_id.eq(*panel_id),
                    )
                })
                .collect();

            diesel::insert_into(curator_panel::table)
                .values(links)
                .on_conflict_do_nothing()
                .execute(db_conn)
                .await?;
        }

        tracing::info!(curator_id = curator.id, username = %curator.username, "created curator");

        Ok(CreatedCurator {
            curator,
            api_key: api_key.to_string(),
        })
    }
}

/// Finds the curator owning this key. Any mismatch, including a key too short
/// to have a prefix, is reported as [`Error::RecordNotFound`].
///
/// # Errors
pub async fn find_by_api_key(
    api_key: &ApiKey,
    db_conn: &mut AsyncPgConnection,
) -> Result<Curator> {
    let Some(prefix) = api_key.prefix() else {
        return Err(Error::RecordNotFound);
    };

    let (curator, hash): (Curator, String) = curator::table
        .filter(curator::api_key_prefix.eq(prefix))
        .select((Curator::as_select(), curator::api_key_hash))
        .first(db_conn)
        .await?;

    if !api_key.is_same_hash(&hash) {
        return Err(Error::RecordNotFound);
    }

    Ok(curator)
}

/// Every curator, ordered by username. Key material is never selected.
///
/// # Errors
pub async fn fetch_curator_list(db_conn: &mut AsyncPgConnection) -> Result<CuratorList> {
    let curators = curator::table
        .select(Curator::as_select())
        .order_by(curator::username)
        .load(db_conn)
        .await?;

    Ok(CuratorList::from(curators))
}
