//! Form-binding helpers for the web layer.
//!
//! # Responsibility
//! - Convert form text into managed reference-data instances.
//!
//! # Invariants
//! - An unmatched string is silently treated as absent; downstream
//!   validation owns the failure decision.

use crate::model::pet::PetType;

/// Resolves a display string against the pet type catalog.
///
/// Returns a clone of the first catalog entry whose name equals `text`
/// exactly (case-sensitive), or `None` when nothing matches.
pub fn resolve_pet_type(catalog: &[PetType], text: &str) -> Option<PetType> {
    catalog.iter().find(|pet_type| pet_type.name == text).cloned()
}
