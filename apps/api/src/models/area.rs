use serde::{Deserialize, Serialize};

/// Node of the provider's region tree (`GET /areas`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub areas: Vec<Area>,
}
