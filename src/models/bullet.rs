use serde::{Deserialize, Serialize};

/// A catalog bullet weight in grains.
///
/// Weights are unique across the catalog and linked many-to-many to cartridge
/// types. Bullets are grouped under a weight by numeric value — there is no
/// foreign reference from [`Bullet`] to `BulletWeight`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulletWeight {
    pub id: i64,
    pub weight: f64,
    pub cartridge_type_ids: Vec<i64>,
}

/// A projectile (e.g. Sierra "MatchKing 168gr BTHP").
///
/// `weight` is a plain attribute matched against the selected catalog
/// weight's value with exact floating-point equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: i64,
    pub name: String,
    pub manufacturer_name: String,
    pub weight: f64,
}

impl Bullet {
    /// Display label, composed as "manufacturer - name".
    pub fn label(&self) -> String {
        format!("{} - {}", self.manufacturer_name, self.name)
    }
}

/// Input for creating a catalog bullet weight with its cartridge-type links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBulletWeightInput {
    pub weight: f64,
    #[serde(default)]
    pub cartridge_type_ids: Vec<i64>,
}

/// Input for creating a bullet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBulletInput {
    pub name: String,
    pub manufacturer_name: String,
    pub weight: f64,
}
