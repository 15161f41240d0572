use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The in-progress record being built from user selections.
///
/// All taxonomy references are optional here — a draft starts empty and fills
/// in as the user works through the cascading selects. The
/// [`validate_draft`](crate::validate::validate_draft) pass decides whether
/// the draft is submittable, reporting every violated rule at once.
///
/// `quantity` is carried as a float so a non-integer submission is observable
/// and can be rejected with its own rule rather than lost in deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionDraft {
    pub cartridge_type_id: Option<i64>,
    pub cartridge_id: Option<i64>,
    pub primer_type_id: Option<i64>,
    pub powder_id: Option<i64>,
    /// Catalog bullet weight. May be absent when `bullet_weight_other` is set.
    pub bullet_weight_id: Option<i64>,
    /// Free-form weight in grains. Does not clear the catalog choice.
    pub bullet_weight_other: Option<f64>,
    pub bullet_id: Option<i64>,
    pub data_source_id: Option<Uuid>,
    /// Free-form source name, used alongside the catch-all "Other" source.
    pub custom_data_source_name: Option<String>,
    pub account_id: Option<Uuid>,
    pub loaded_at: Option<DateTime<Utc>>,
    pub quantity: Option<f64>,
    pub cartridge_overall_length: Option<f64>,
    pub powder_weight: Option<f64>,
    pub notes: Option<String>,
}

/// A persisted hand-loading session.
///
/// Created from a [`SessionDraft`] that passed validation; the required
/// references are concrete here, the optional scalars stay optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReloadingSession {
    pub id: Uuid,
    pub account_id: Uuid,
    pub data_source_id: Uuid,
    pub custom_data_source_name: Option<String>,
    pub cartridge_type_id: i64,
    pub cartridge_id: i64,
    pub primer_type_id: i64,
    pub powder_id: i64,
    pub bullet_id: i64,
    pub bullet_weight_id: Option<i64>,
    pub bullet_weight_other: Option<f64>,
    pub loaded_at: DateTime<Utc>,
    pub quantity: Option<i64>,
    pub cartridge_overall_length: Option<f64>,
    pub powder_weight: Option<f64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
