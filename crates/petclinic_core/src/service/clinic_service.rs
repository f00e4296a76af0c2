//! Clinic use-case service.
//!
//! # Responsibility
//! - Provide stable entry points for web/CLI callers.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository transaction boundaries.
//! - `store_validated_pet` never touches the store when validation fails.

use crate::model::owner::Owner;
use crate::model::pet::{Pet, PetType};
use crate::model::vet::Vet;
use crate::model::visit::Visit;
use crate::model::EntityId;
use crate::repo::clinic_repo::{Clinic, RepoResult};
use crate::validation::{validate_pet, ValidationErrors};

/// Use-case service wrapper for clinic operations.
pub struct ClinicService<R: Clinic> {
    repo: R,
}

/// Outcome of a validated pet store.
#[derive(Debug)]
pub enum StorePetOutcome {
    /// The pet passed validation and was persisted.
    Stored,
    /// Field rejections to re-present to the user; nothing was stored.
    Rejected(ValidationErrors),
}

impl<R: Clinic> ClinicService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// All vets with their specialties, in display order.
    pub fn get_vets(&self) -> RepoResult<Vec<Vet>> {
        self.repo.get_vets()
    }

    /// The pet type catalog, in display order.
    pub fn get_pet_types(&self) -> RepoResult<Vec<PetType>> {
        self.repo.get_pet_types()
    }

    /// Owners whose last name starts with the given prefix.
    pub fn find_owners(&self, last_name_prefix: &str) -> RepoResult<Vec<Owner>> {
        self.repo.find_owners(last_name_prefix)
    }

    /// Loads one owner aggregate by id.
    pub fn load_owner(&self, id: EntityId) -> RepoResult<Owner> {
        self.repo.load_owner(id)
    }

    /// Loads one pet by id.
    pub fn load_pet(&self, id: EntityId) -> RepoResult<Pet> {
        self.repo.load_pet(id)
    }

    /// Upserts an owner and its owned pets/visits.
    pub fn store_owner(&mut self, owner: &mut Owner) -> RepoResult<()> {
        self.repo.store_owner(owner)
    }

    /// Upserts a pet without running form validation.
    pub fn store_pet(&mut self, pet: &mut Pet) -> RepoResult<()> {
        self.repo.store_pet(pet)
    }

    /// Validates a pet against its owner, then stores it when clean.
    ///
    /// Repository errors still propagate via `Err`; validation rejections are
    /// a normal outcome, not an error.
    pub fn store_validated_pet(
        &mut self,
        pet: &mut Pet,
        owner: &Owner,
    ) -> RepoResult<StorePetOutcome> {
        let mut errors = ValidationErrors::new();
        validate_pet(pet, owner, &mut errors);
        if errors.has_errors() {
            return Ok(StorePetOutcome::Rejected(errors));
        }

        self.repo.store_pet(pet)?;
        Ok(StorePetOutcome::Stored)
    }

    /// Upserts one visit.
    pub fn store_visit(&mut self, visit: &mut Visit) -> RepoResult<()> {
        self.repo.store_visit(visit)
    }

    /// Permanently deletes a pet and its visits.
    pub fn delete_pet(&mut self, id: EntityId) -> RepoResult<()> {
        self.repo.delete_pet(id)
    }
}
