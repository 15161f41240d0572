use serde::{Deserialize, Serialize};

/// A smokeless powder (e.g. Hodgdon "Varget").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Powder {
    pub id: i64,
    pub name: String,
    pub manufacturer_name: String,
    pub cartridge_type_ids: Vec<i64>,
}

impl Powder {
    /// Display label, composed as "manufacturer - name".
    pub fn label(&self) -> String {
        format!("{} - {}", self.manufacturer_name, self.name)
    }
}

/// Input for creating a powder with its cartridge-type links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePowderInput {
    pub name: String,
    pub manufacturer_name: String,
    #[serde(default)]
    pub cartridge_type_ids: Vec<i64>,
}
