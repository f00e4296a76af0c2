//! Form-level validation for pets.
//!
//! # Responsibility
//! - Enforce the pet field invariants checked before `store_pet`.
//! - Accumulate rejections on an error sink instead of failing fast.
//!
//! # Invariants
//! - Validation never returns an error or panics; the sink's non-emptiness
//!   is the caller's failure signal.
//! - The duplicate-name rule applies to new (unpersisted) pets only.

use crate::model::owner::Owner;
use crate::model::pet::Pet;

/// One field rejection recorded during validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub code: &'static str,
    pub message: &'static str,
}

/// Error-collector sink for field rejections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a rejection for the given field.
    pub fn reject_value(&mut self, field: &'static str, code: &'static str, message: &'static str) {
        self.errors.push(FieldError {
            field,
            code,
            message,
        });
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn field_errors(&self) -> &[FieldError] {
        &self.errors
    }
}

/// Validates a pet before it is stored.
///
/// # Contract
/// - Empty or blank name: reject `name`/`required` and stop; the duplicate
///   check is not evaluated.
/// - Otherwise, a new pet whose owner already has another pet with the same
///   name (case-insensitive exact match) is rejected `name`/`duplicate`.
///   Renaming an already-persisted pet to a duplicate name is not rejected.
///
/// The owning owner is an explicit argument; pets carry only an id
/// back-reference, not the owner aggregate.
pub fn validate_pet(pet: &Pet, owner: &Owner, errors: &mut ValidationErrors) {
    let name = pet.name.trim();
    if name.is_empty() {
        errors.reject_value("name", "required", "required");
    } else if pet.is_new() && owner.pet_by_name(name, true).is_some() {
        errors.reject_value("name", "duplicate", "already exists");
    }
}
