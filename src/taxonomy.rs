//! Immutable in-memory view of the reference taxonomy.
//!
//! The snapshot is loaded once per interactive session by the storage layer
//! and never mutated afterwards, so it can be shared freely across filtering
//! calls. The many-to-many cartridge-type links are precomputed into
//! adjacency sets at construction time, giving O(1) membership tests instead
//! of repeated join scans.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::models::{Bullet, BulletWeight, Cartridge, CartridgeType, Powder, PrimerType};

/// The six user-selectable taxonomy fields of a session form.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SelectField {
    CartridgeType,
    Cartridge,
    PrimerType,
    Powder,
    BulletWeight,
    Bullet,
}

impl SelectField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CartridgeType => "cartridge_type",
            Self::Cartridge => "cartridge",
            Self::PrimerType => "primer_type",
            Self::Powder => "powder",
            Self::BulletWeight => "bullet_weight",
            Self::Bullet => "bullet",
        }
    }
}

/// One entry of a rendered option list.
///
/// `id: None` is the "no selection" sentinel; every list starts with it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptionItem {
    pub id: Option<i64>,
    pub label: String,
}

impl OptionItem {
    pub fn new(id: i64, label: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            label: label.into(),
        }
    }

    /// The blank sentinel that heads every option list.
    pub fn blank() -> Self {
        Self {
            id: None,
            label: String::new(),
        }
    }
}

/// Immutable load of all filterable reference data.
///
/// Entity vectors keep catalog order as delivered by storage. The link sets
/// mirror the cartridge and powder `cartridge_type_ids` for the two
/// many-to-many filters and exist only to make membership tests cheap; they
/// are derived state, never serialized. Bullet weights carry their own link
/// set on the entity, but no filter keys on it — the weight dropdown is
/// never narrowed by cartridge type.
#[derive(Debug, Clone, Default)]
pub struct TaxonomySnapshot {
    pub cartridge_types: Vec<CartridgeType>,
    pub cartridges: Vec<Cartridge>,
    pub primer_types: Vec<PrimerType>,
    pub powders: Vec<Powder>,
    pub bullet_weights: Vec<BulletWeight>,
    pub bullets: Vec<Bullet>,

    cartridge_links: HashMap<i64, HashSet<i64>>,
    powder_links: HashMap<i64, HashSet<i64>>,
}

impl TaxonomySnapshot {
    pub fn new(
        cartridge_types: Vec<CartridgeType>,
        cartridges: Vec<Cartridge>,
        primer_types: Vec<PrimerType>,
        powders: Vec<Powder>,
        bullet_weights: Vec<BulletWeight>,
        bullets: Vec<Bullet>,
    ) -> Self {
        let cartridge_links = cartridges
            .iter()
            .map(|c| (c.id, c.cartridge_type_ids.iter().copied().collect()))
            .collect();
        let powder_links = powders
            .iter()
            .map(|p| (p.id, p.cartridge_type_ids.iter().copied().collect()))
            .collect();

        Self {
            cartridge_types,
            cartridges,
            primer_types,
            powders,
            bullet_weights,
            bullets,
            cartridge_links,
            powder_links,
        }
    }

    pub fn cartridge_linked_to(&self, cartridge_id: i64, cartridge_type_id: i64) -> bool {
        self.cartridge_links
            .get(&cartridge_id)
            .is_some_and(|set| set.contains(&cartridge_type_id))
    }

    pub fn powder_linked_to(&self, powder_id: i64, cartridge_type_id: i64) -> bool {
        self.powder_links
            .get(&powder_id)
            .is_some_and(|set| set.contains(&cartridge_type_id))
    }

    pub fn bullet_weight(&self, id: i64) -> Option<&BulletWeight> {
        self.bullet_weights.iter().find(|bw| bw.id == id)
    }
}
