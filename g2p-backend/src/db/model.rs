use super::error;
use diesel_async::AsyncPgConnection;

pub mod attrib;
pub mod curator;
pub mod disease;
pub mod gene_disease;
pub mod ontology_term;
pub mod panel;
pub mod record;

/// Who is asking. Panels that are not visible, and the records reachable only
/// through them, are hidden from the public.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Viewer {
    Public,
    Curator,
}

impl Viewer {
    #[must_use]
    pub fn sees_hidden_panels(self) -> bool {
        matches!(self, Self::Curator)
    }
}

impl<T> From<Option<T>> for Viewer {
    fn from(user: Option<T>) -> Self {
        match user {
            Some(_) => Self::Curator,
            None => Self::Public,
        }
    }
}

pub trait Write {
    type Returns;

    fn write(
        self,
        db_conn: &mut AsyncPgConnection,
    ) -> impl Future<Output = error::Result<Self::Returns>> + Send;
}

pub trait FetchById: Sized {
    type Id: ?Sized + Sync;

    fn fetch_by_id(
        id: &Self::Id,
        db_conn: &mut AsyncPgConnection,
    ) -> impl Future<Output = error::Result<Self>> + Send;
}

/// Fetches a resource whose content depends on whether the caller may see
/// hidden panels.
pub trait FetchVisible: Sized {
    type Id: ?Sized + Sync;

    fn fetch_visible(
        id: &Self::Id,
        viewer: Viewer,
        db_conn: &mut AsyncPgConnection,
    ) -> impl Future<Output = error::Result<Self>> + Send;
}
