//! The dependent-selection filter engine.
//!
//! Stateless functions from `(snapshot, upstream selection)` to an ordered
//! candidate list. An absent or unknown upstream id yields an empty list —
//! that is the normal "nothing selected yet" state, not an error, so none of
//! these functions can fail.

use std::cmp::Ordering;

use crate::models::{Bullet, Cartridge, Powder, PrimerType};
use crate::taxonomy::TaxonomySnapshot;

/// Case-insensitive string ordering, with the raw byte order as tie-break so
/// the sort stays total. Stands in for locale collation.
pub(crate) fn collate(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Cartridges linked to the given cartridge type, in catalog order.
pub fn candidate_cartridges<'a>(
    snapshot: &'a TaxonomySnapshot,
    cartridge_type_id: Option<i64>,
) -> Vec<&'a Cartridge> {
    let Some(ct_id) = cartridge_type_id else {
        return Vec::new();
    };

    snapshot
        .cartridges
        .iter()
        .filter(|c| snapshot.cartridge_linked_to(c.id, ct_id))
        .collect()
}

/// Primer types whose single cartridge-type reference matches, in catalog
/// order.
pub fn candidate_primer_types<'a>(
    snapshot: &'a TaxonomySnapshot,
    cartridge_type_id: Option<i64>,
) -> Vec<&'a PrimerType> {
    let Some(ct_id) = cartridge_type_id else {
        return Vec::new();
    };

    snapshot
        .primer_types
        .iter()
        .filter(|pt| pt.cartridge_type_id == ct_id)
        .collect()
}

/// Powders linked to the given cartridge type, sorted ascending by name.
pub fn candidate_powders<'a>(
    snapshot: &'a TaxonomySnapshot,
    cartridge_type_id: Option<i64>,
) -> Vec<&'a Powder> {
    let Some(ct_id) = cartridge_type_id else {
        return Vec::new();
    };

    let mut powders: Vec<&Powder> = snapshot
        .powders
        .iter()
        .filter(|p| snapshot.powder_linked_to(p.id, ct_id))
        .collect();
    powders.sort_by(|a, b| collate(&a.name, &b.name));
    powders
}

/// Bullets whose weight attribute equals the selected catalog weight's value,
/// sorted ascending by (manufacturer, name).
///
/// The match is exact floating-point equality: both sides are stored as f64
/// and a bullet belongs to a weight group only when the values are identical.
pub fn candidate_bullets<'a>(
    snapshot: &'a TaxonomySnapshot,
    bullet_weight_id: Option<i64>,
) -> Vec<&'a Bullet> {
    let Some(weight) = bullet_weight_id
        .and_then(|id| snapshot.bullet_weight(id))
        .map(|bw| bw.weight)
    else {
        return Vec::new();
    };

    let mut bullets: Vec<&Bullet> = snapshot
        .bullets
        .iter()
        .filter(|b| b.weight == weight)
        .collect();
    bullets.sort_by(|a, b| {
        collate(&a.manufacturer_name, &b.manufacturer_name).then_with(|| collate(&a.name, &b.name))
    });
    bullets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collate_ignores_case() {
        assert_eq!(collate("titegroup", "Unique"), Ordering::Less);
        assert_eq!(collate("CFE Pistol", "bullseye"), Ordering::Greater);
    }

    #[test]
    fn collate_is_total_on_case_variants() {
        assert_ne!(collate("Varget", "varget"), Ordering::Equal);
    }
}
