//! Cross-field validation of a session draft.
//!
//! Runs over the whole draft in one pass and returns every violated rule, so
//! the caller can surface all problems simultaneously. Turning a violation
//! into a user-facing message is the presentation layer's job; the `Display`
//! text on [`Rule`] is only the default wording.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::SessionDraft;

/// A draft field a rule can be violated on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DraftField {
    CartridgeType,
    Cartridge,
    PrimerType,
    Powder,
    Bullet,
    BulletWeight,
    DataSource,
    Account,
    Quantity,
    CartridgeOverallLength,
    PowderWeight,
    BulletWeightOther,
}

impl DraftField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CartridgeType => "cartridge_type",
            Self::Cartridge => "cartridge",
            Self::PrimerType => "primer_type",
            Self::Powder => "powder",
            Self::Bullet => "bullet",
            Self::BulletWeight => "bullet_weight",
            Self::DataSource => "data_source",
            Self::Account => "account",
            Self::Quantity => "quantity",
            Self::CartridgeOverallLength => "cartridge_overall_length",
            Self::PowderWeight => "powder_weight",
            Self::BulletWeightOther => "bullet_weight_other",
        }
    }
}

/// The rules a draft can violate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Error)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    #[error("must be selected")]
    MissingRequiredReference,
    #[error("bullet weight must be selected or custom weight must be entered")]
    MissingBulletWeight,
    #[error("must be an integer")]
    NotAnInteger,
    #[error("must be greater than 0")]
    NotPositive,
}

/// One violated rule on one field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Violation {
    pub field: DraftField,
    pub rule: Rule,
}

impl Violation {
    fn new(field: DraftField, rule: Rule) -> Self {
        Self { field, rule }
    }
}

/// Validate a draft, returning the complete set of violations.
///
/// An empty result means the draft is submittable. Absent optional numerics
/// are always valid; a present quantity must be a positive integer (the
/// integrality check short-circuits the positivity check for that field);
/// the other present numerics must each be positive. Exactly one rule covers
/// two fields at once: a draft needs a catalog bullet weight or a free-form
/// override, and having both is fine.
pub fn validate_draft(draft: &SessionDraft) -> Vec<Violation> {
    let mut violations = Vec::new();

    let required = [
        (DraftField::CartridgeType, draft.cartridge_type_id.is_none()),
        (DraftField::Cartridge, draft.cartridge_id.is_none()),
        (DraftField::PrimerType, draft.primer_type_id.is_none()),
        (DraftField::Powder, draft.powder_id.is_none()),
        (DraftField::Bullet, draft.bullet_id.is_none()),
        (DraftField::DataSource, draft.data_source_id.is_none()),
        (DraftField::Account, draft.account_id.is_none()),
    ];
    for (field, missing) in required {
        if missing {
            violations.push(Violation::new(field, Rule::MissingRequiredReference));
        }
    }

    if draft.bullet_weight_id.is_none() && draft.bullet_weight_other.is_none() {
        violations.push(Violation::new(
            DraftField::BulletWeight,
            Rule::MissingBulletWeight,
        ));
    }

    if let Some(quantity) = draft.quantity {
        // Values at or above i64::MAX cannot round-trip through the INTEGER
        // column; an as-cast would saturate.
        if quantity.fract() != 0.0 || quantity >= i64::MAX as f64 {
            violations.push(Violation::new(DraftField::Quantity, Rule::NotAnInteger));
        } else if quantity <= 0.0 {
            violations.push(Violation::new(DraftField::Quantity, Rule::NotPositive));
        }
    }

    let positives = [
        (
            DraftField::CartridgeOverallLength,
            draft.cartridge_overall_length,
        ),
        (DraftField::PowderWeight, draft.powder_weight),
        (DraftField::BulletWeightOther, draft.bullet_weight_other),
    ];
    for (field, value) in positives {
        if let Some(value) = value {
            if !(value > 0.0) {
                violations.push(Violation::new(field, Rule::NotPositive));
            }
        }
    }

    violations
}
