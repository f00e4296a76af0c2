//! Clinic domain model.
//!
//! # Responsibility
//! - Define the entity records persisted by the clinic repository.
//! - Keep ownership semantics explicit: owners own pets, pets own visits,
//!   pet types and specialties are shared reference data.
//!
//! # Invariants
//! - Every entity is identified by a store-assigned `id`; `is_new()` holds
//!   until the first successful store.
//! - Pet names are unique per owner, case-insensitively (enforced by
//!   validation before store, not by the schema).

pub mod owner;
pub mod pet;
pub mod vet;
pub mod visit;

/// Store-assigned entity identifier.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type EntityId = i64;
