use serde::{Deserialize, Serialize};

/// Top-level taxonomy category (e.g. Rifle, Pistol, Shotgun).
///
/// Every filterable entity except [`Bullet`](super::Bullet) associates to a
/// cartridge type, either directly or through a many-to-many link set.
/// Changing the selected cartridge type invalidates the cartridge, primer
/// type, and powder selections as a combination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartridgeType {
    pub id: i64,
    pub name: String,
}

/// A named cartridge (e.g. ".308 Winchester").
///
/// Cartridges are linked many-to-many to cartridge types; `cartridge_type_ids`
/// carries the link set so filtering needs no join at lookup time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cartridge {
    pub id: i64,
    pub name: String,
    pub cartridge_type_ids: Vec<i64>,
}

/// Input for creating a cartridge type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCartridgeTypeInput {
    pub name: String,
}

/// Input for creating a cartridge with its cartridge-type links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCartridgeInput {
    pub name: String,
    #[serde(default)]
    pub cartridge_type_ids: Vec<i64>,
}
