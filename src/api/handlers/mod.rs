use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cascade::{CascadeController, SelectionState};
use crate::db::Database;
use crate::models::*;
use crate::taxonomy::{OptionItem, SelectField};
use crate::validate::{validate_draft, Violation};

// ============================================================
// Error Handling
// ============================================================

/// Log an internal error and return a sanitized response to the client.
/// The full error is logged server-side for debugging, but clients only
/// see a generic message to avoid leaking internal details.
///
/// Some errors are user-correctable and safe to expose (e.g. a draft that
/// slipped past the handler-level validation). These come back as
/// BAD_REQUEST with the original message.
fn internal_error(e: impl std::fmt::Display) -> (StatusCode, String) {
    let msg = e.to_string();

    if msg.contains("invalid") || msg.contains("not found") {
        tracing::warn!("Validation error: {}", msg);
        return (StatusCode::BAD_REQUEST, msg);
    }

    tracing::error!("Internal error: {}", msg);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Taxonomy
// ============================================================

pub async fn list_cartridge_types(
    State(db): State<Database>,
) -> Result<Json<Vec<CartridgeType>>, (StatusCode, String)> {
    db.get_all_cartridge_types()
        .map(Json)
        .map_err(internal_error)
}

pub async fn list_cartridges(
    State(db): State<Database>,
) -> Result<Json<Vec<Cartridge>>, (StatusCode, String)> {
    db.get_all_cartridges().map(Json).map_err(internal_error)
}

pub async fn list_primer_types(
    State(db): State<Database>,
) -> Result<Json<Vec<PrimerType>>, (StatusCode, String)> {
    db.get_all_primer_types().map(Json).map_err(internal_error)
}

pub async fn list_powders(
    State(db): State<Database>,
) -> Result<Json<Vec<Powder>>, (StatusCode, String)> {
    db.get_all_powders().map(Json).map_err(internal_error)
}

pub async fn list_bullet_weights(
    State(db): State<Database>,
) -> Result<Json<Vec<BulletWeight>>, (StatusCode, String)> {
    db.get_all_bullet_weights()
        .map(Json)
        .map_err(internal_error)
}

pub async fn list_bullets(
    State(db): State<Database>,
) -> Result<Json<Vec<Bullet>>, (StatusCode, String)> {
    db.get_all_bullets().map(Json).map_err(internal_error)
}

// ============================================================
// Provenance
// ============================================================

pub async fn list_data_sources(
    State(db): State<Database>,
) -> Result<Json<Vec<DataSource>>, (StatusCode, String)> {
    db.get_all_data_sources().map(Json).map_err(internal_error)
}

pub async fn create_account(
    State(db): State<Database>,
    Json(input): Json<CreateAccountInput>,
) -> Result<(StatusCode, Json<Account>), (StatusCode, String)> {
    db.create_account(input)
        .map(|a| (StatusCode::CREATED, Json(a)))
        .map_err(internal_error)
}

// ============================================================
// Session form options
// ============================================================

/// Upstream values a form can pre-populate, e.g. when re-opening a saved
/// record. Absent values leave the dependent lists empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormOptionsQuery {
    pub cartridge_type_id: Option<i64>,
    pub bullet_weight_id: Option<i64>,
}

/// All six option lists, each headed by the blank sentinel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionFormOptions {
    pub cartridge_types: Vec<OptionItem>,
    pub cartridges: Vec<OptionItem>,
    pub primer_types: Vec<OptionItem>,
    pub powders: Vec<OptionItem>,
    pub bullet_weights: Vec<OptionItem>,
    pub bullets: Vec<OptionItem>,
}

pub async fn session_form_options(
    State(db): State<Database>,
    Query(query): Query<FormOptionsQuery>,
) -> Result<Json<SessionFormOptions>, (StatusCode, String)> {
    let snapshot = db.load_taxonomy_snapshot().map_err(internal_error)?;

    let controller = CascadeController::new(
        &snapshot,
        SelectionState {
            cartridge_type_id: query.cartridge_type_id,
            bullet_weight_id: query.bullet_weight_id,
            ..SelectionState::default()
        },
    );

    Ok(Json(SessionFormOptions {
        cartridge_types: controller.option_list(SelectField::CartridgeType).to_vec(),
        cartridges: controller.option_list(SelectField::Cartridge).to_vec(),
        primer_types: controller.option_list(SelectField::PrimerType).to_vec(),
        powders: controller.option_list(SelectField::Powder).to_vec(),
        bullet_weights: controller.option_list(SelectField::BulletWeight).to_vec(),
        bullets: controller.option_list(SelectField::Bullet).to_vec(),
    }))
}

// ============================================================
// Sessions
// ============================================================

/// Body of a 422 response: every violated rule, in one pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorBody {
    pub violations: Vec<Violation>,
}

pub async fn create_session(
    State(db): State<Database>,
    Json(draft): Json<SessionDraft>,
) -> Response {
    let violations = validate_draft(&draft);
    if !violations.is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ValidationErrorBody { violations }),
        )
            .into_response();
    }

    match db.create_reloading_session(draft) {
        Ok(session) => (StatusCode::CREATED, Json(session)).into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListSessionsQuery {
    pub account_id: Option<Uuid>,
}

pub async fn list_sessions(
    State(db): State<Database>,
    Query(query): Query<ListSessionsQuery>,
) -> Result<Json<Vec<ReloadingSession>>, (StatusCode, String)> {
    let sessions = match query.account_id {
        Some(account_id) => db.get_sessions_by_account(account_id),
        None => db.get_all_reloading_sessions(),
    };
    sessions.map(Json).map_err(internal_error)
}

pub async fn get_session(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReloadingSession>, (StatusCode, String)> {
    db.get_reloading_session(id)
        .map_err(internal_error)?
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Session not found".to_string()))
}

pub async fn delete_session(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    if db.delete_reloading_session(id).map_err(internal_error)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "Session not found".to_string()))
    }
}
