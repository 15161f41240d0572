//! Domain models for Loadbook.
//!
//! # Core Concepts
//!
//! ## Reference Taxonomy
//!
//! Read-only catalog data loaded once per interactive session:
//!
//! - [`CartridgeType`]: Root category (Rifle, Pistol, Shotgun) that constrains
//!   which cartridges, primer types, and powders are valid choices.
//! - [`Cartridge`]: A named cartridge, linked many-to-many to cartridge types.
//! - [`PrimerType`]: Belongs to exactly one cartridge type.
//! - [`Powder`]: Linked many-to-many to cartridge types.
//! - [`BulletWeight`]: A catalog weight in grains, linked many-to-many to
//!   cartridge types. Bullets match it by numeric value, not by reference.
//! - [`Bullet`]: A projectile with a plain numeric weight attribute.
//!
//! ## Session Records
//!
//! - [`SessionDraft`]: The in-progress record being built from user
//!   selections, validated as a whole before submission.
//! - [`ReloadingSession`]: A persisted hand-loading session.
//! - [`DataSource`] / [`Account`]: Provenance references a session must carry.

mod bullet;
mod cartridge;
mod powder;
mod primer;
mod provenance;
mod session;

pub use bullet::*;
pub use cartridge::*;
pub use powder::*;
pub use primer::*;
pub use provenance::*;
pub use session::*;
