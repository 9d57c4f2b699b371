use serde::{Deserialize, Serialize};

use super::Endpoint;

#[cfg(feature = "backend")]
use {crate::string::is_not_blank, g2p_schema::curator};

const ENDPOINT: &str = "/curators";

#[derive(Deserialize, Serialize, Debug, Clone)]
#[cfg_attr(feature = "backend", derive(garde::Validate))]
pub struct NewCurator {
    #[cfg_attr(feature = "backend", garde(custom(is_not_blank)))]
    pub username: String,
    #[cfg_attr(feature = "backend", garde(email))]
    pub email: String,
    #[serde(default)]
    #[cfg_attr(feature = "backend", garde(skip))]
    pub panels: Vec<String>,
}
impl Endpoint for NewCurator {
    fn endpoint() -> String {
        ENDPOINT.to_string()
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "backend",
    derive(diesel::Queryable, diesel::Selectable),
    diesel(table_name = curator, check_for_backend(diesel::pg::Pg))
)]
pub struct Curator {
    pub id: i32,
    pub username: String,
    pub email: String,
}

/// Returned exactly once, when the curator is created. Only a hash of the key
/// is stored.
#[derive(Deserialize, Serialize, Debug)]
pub struct CreatedCurator {
    pub curator: Curator,
    pub api_key: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CuratorList {
    pub results: Vec<Curator>,
    pub count: usize,
}
impl From<Vec<Curator>> for CuratorList {
    fn from(results: Vec<Curator>) -> Self {
        Self {
            count: results.len(),
            results,
        }
    }
}
impl Endpoint for CuratorList {
    fn endpoint() -> String {
        ENDPOINT.to_string()
    }
}
