use serde::{Deserialize, Serialize};

/// A primer size/style (e.g. "Large Rifle", "Small Pistol Magnum").
///
/// Unlike the other filterable components, a primer type belongs to exactly
/// one cartridge type rather than carrying a many-to-many link set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrimerType {
    pub id: i64,
    pub name: String,
    pub cartridge_type_id: i64,
}

/// Input for creating a primer type under a cartridge type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePrimerTypeInput {
    pub name: String,
    pub cartridge_type_id: i64,
}
