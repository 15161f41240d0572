mod handlers;

pub use handlers::{SessionFormOptions, ValidationErrorBody};

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::db::Database;

pub fn create_router(db: Database) -> Router {
    let api = Router::new()
        // Taxonomy (read-only; reference data is managed out of band)
        .route("/cartridge-types", get(handlers::list_cartridge_types))
        .route("/cartridges", get(handlers::list_cartridges))
        .route("/primer-types", get(handlers::list_primer_types))
        .route("/powders", get(handlers::list_powders))
        .route("/bullet-weights", get(handlers::list_bullet_weights))
        .route("/bullets", get(handlers::list_bullets))
        // Provenance
        .route("/data-sources", get(handlers::list_data_sources))
        .route("/accounts", post(handlers::create_account))
        // Session form: all six option lists for the given upstream values
        .route("/session-form/options", get(handlers::session_form_options))
        // Sessions
        .route("/sessions", get(handlers::list_sessions))
        .route("/sessions", post(handlers::create_session))
        .route("/sessions/{id}", get(handlers::get_session))
        .route("/sessions/{id}", delete(handlers::delete_session))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(db)
}
