use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A published load-data source (e.g. "Hodgdon Reloading", "Lyman").
///
/// Every session must name the source its charge data came from. The catch-all
/// "Other" source pairs with a free-form name on the session itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSource {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// The owner of a set of session records.
///
/// Authentication and account switching live outside this crate; an account
/// here is just the provenance reference a session must carry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a data source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDataSourceInput {
    pub name: String,
}

/// Input for creating an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccountInput {
    pub name: String,
}
