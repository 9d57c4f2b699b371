use serde::{Deserialize, Serialize};

use super::Endpoint;

const ENDPOINT: &str = "/attribs";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct AttribTypeCodes(pub Vec<String>);
impl Endpoint for AttribTypeCodes {
    fn endpoint() -> String {
        ENDPOINT.to_string()
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct AttribValues(pub Vec<String>);
impl Endpoint for AttribValues {
    fn endpoint() -> String {
        format!("{ENDPOINT}/{{code}}")
    }
}
