//! Cascade controller: keeps option lists and selections synchronized.
//!
//! This is the only stateful part of the engine. A change to an upstream
//! field replaces the dependent option lists wholesale (no incremental
//! patching) and resets the dependent selections to empty. The taxonomy
//! snapshot itself is never touched.

use crate::filter;
use crate::taxonomy::{OptionItem, SelectField, TaxonomySnapshot};

/// The current value of each selectable field plus the free-form weight
/// override. Created empty; mutated only through the controller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    pub cartridge_type_id: Option<i64>,
    pub cartridge_id: Option<i64>,
    pub primer_type_id: Option<i64>,
    pub powder_id: Option<i64>,
    pub bullet_weight_id: Option<i64>,
    pub bullet_weight_other: Option<f64>,
    pub bullet_id: Option<i64>,
}

/// Owns the rendered option lists and the [`SelectionState`].
///
/// Two triggers exist:
///
/// - a cartridge-type change rebuilds the cartridge, primer-type, and powder
///   lists and clears those three selections unconditionally — the new
///   cartridge type invalidates the combination as a whole, so a still-valid
///   prior choice is reset along with the rest;
/// - a bullet-weight change rebuilds the bullet list and clears the bullet
///   selection.
///
/// Construction runs both rebuilds against whatever upstream values are
/// pre-populated (the edit-an-existing-record path) without clearing, so the
/// lists start consistent with the loaded state.
#[derive(Debug, Clone)]
pub struct CascadeController<'a> {
    snapshot: &'a TaxonomySnapshot,
    selection: SelectionState,

    cartridge_type_options: Vec<OptionItem>,
    cartridge_options: Vec<OptionItem>,
    primer_type_options: Vec<OptionItem>,
    powder_options: Vec<OptionItem>,
    bullet_weight_options: Vec<OptionItem>,
    bullet_options: Vec<OptionItem>,
}

impl<'a> CascadeController<'a> {
    pub fn new(snapshot: &'a TaxonomySnapshot, selection: SelectionState) -> Self {
        let cartridge_type_options = with_blank(
            snapshot
                .cartridge_types
                .iter()
                .map(|ct| OptionItem::new(ct.id, ct.name.clone())),
        );

        // Catalog weights are not filtered by anything upstream; present them
        // ascending by weight.
        let mut weights: Vec<_> = snapshot.bullet_weights.iter().collect();
        weights.sort_by(|a, b| a.weight.total_cmp(&b.weight));
        let bullet_weight_options = with_blank(
            weights
                .into_iter()
                .map(|bw| OptionItem::new(bw.id, weight_label(bw.weight))),
        );

        let mut controller = Self {
            snapshot,
            selection,
            cartridge_type_options,
            cartridge_options: Vec::new(),
            primer_type_options: Vec::new(),
            powder_options: Vec::new(),
            bullet_weight_options,
            bullet_options: Vec::new(),
        };
        controller.rebuild_cartridge_type_dependents();
        controller.rebuild_bullet_list();
        controller
    }

    /// Start from an empty form.
    pub fn empty(snapshot: &'a TaxonomySnapshot) -> Self {
        Self::new(snapshot, SelectionState::default())
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn option_list(&self, field: SelectField) -> &[OptionItem] {
        match field {
            SelectField::CartridgeType => &self.cartridge_type_options,
            SelectField::Cartridge => &self.cartridge_options,
            SelectField::PrimerType => &self.primer_type_options,
            SelectField::Powder => &self.powder_options,
            SelectField::BulletWeight => &self.bullet_weight_options,
            SelectField::Bullet => &self.bullet_options,
        }
    }

    pub fn on_cartridge_type_changed(&mut self, cartridge_type_id: Option<i64>) {
        self.selection.cartridge_type_id = cartridge_type_id;
        self.rebuild_cartridge_type_dependents();

        self.selection.cartridge_id = None;
        self.selection.primer_type_id = None;
        self.selection.powder_id = None;
    }

    pub fn on_bullet_weight_changed(&mut self, bullet_weight_id: Option<i64>) {
        self.selection.bullet_weight_id = bullet_weight_id;
        self.rebuild_bullet_list();

        self.selection.bullet_id = None;
    }

    /// The override is not an upstream of any list; recording it triggers no
    /// cascade.
    pub fn set_bullet_weight_other(&mut self, weight: Option<f64>) {
        self.selection.bullet_weight_other = weight;
    }

    pub fn select_cartridge(&mut self, cartridge_id: Option<i64>) {
        self.selection.cartridge_id = cartridge_id;
    }

    pub fn select_primer_type(&mut self, primer_type_id: Option<i64>) {
        self.selection.primer_type_id = primer_type_id;
    }

    pub fn select_powder(&mut self, powder_id: Option<i64>) {
        self.selection.powder_id = powder_id;
    }

    pub fn select_bullet(&mut self, bullet_id: Option<i64>) {
        self.selection.bullet_id = bullet_id;
    }

    fn rebuild_cartridge_type_dependents(&mut self) {
        let ct_id = self.selection.cartridge_type_id;

        self.cartridge_options = with_blank(
            filter::candidate_cartridges(self.snapshot, ct_id)
                .into_iter()
                .map(|c| OptionItem::new(c.id, c.name.clone())),
        );
        self.primer_type_options = with_blank(
            filter::candidate_primer_types(self.snapshot, ct_id)
                .into_iter()
                .map(|pt| OptionItem::new(pt.id, pt.name.clone())),
        );
        self.powder_options = with_blank(
            filter::candidate_powders(self.snapshot, ct_id)
                .into_iter()
                .map(|p| OptionItem::new(p.id, p.label())),
        );
    }

    fn rebuild_bullet_list(&mut self) {
        self.bullet_options = with_blank(
            filter::candidate_bullets(self.snapshot, self.selection.bullet_weight_id)
                .into_iter()
                .map(|b| OptionItem::new(b.id, b.label())),
        );
    }
}

fn with_blank(items: impl Iterator<Item = OptionItem>) -> Vec<OptionItem> {
    std::iter::once(OptionItem::blank()).chain(items).collect()
}

/// Whole-grain weights render with one decimal place ("168.0", not "168"),
/// matching how the catalog presents them; fractional weights keep their
/// full precision ("168.25").
fn weight_label(weight: f64) -> String {
    if weight.fract() == 0.0 {
        format!("{:.1}", weight)
    } else {
        weight.to_string()
    }
}
