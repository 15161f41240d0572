//! Loadbook: a hand-loading session log with dependent component selection.
//!
//! The heart of the crate is the selection engine: [`taxonomy`] holds the
//! immutable reference-data snapshot, [`filter`] computes candidate lists for
//! the dependent fields, [`cascade`] keeps option lists and selections
//! synchronized as upstream fields change, and [`validate`] checks a whole
//! session draft in one pass. [`db`] is the SQLite storage layer and [`api`]
//! the HTTP surface over it.

pub mod api;
pub mod cascade;
pub mod db;
pub mod filter;
pub mod models;
pub mod taxonomy;
pub mod validate;
