//! Owner record and pet-collection helpers.
//!
//! # Invariants
//! - `pets` is kept ordered by pet name when loaded from the store.
//! - Pet names are unique per owner case-insensitively; `pet_by_name` is the
//!   lookup the duplicate-name validation rule is built on.

use crate::model::pet::Pet;
use crate::model::EntityId;
use serde::{Deserialize, Serialize};

/// A pet owner and the pets they exclusively own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub id: Option<EntityId>,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub telephone: String,
    /// Pets owned by this owner, ordered by name ascending.
    pub pets: Vec<Pet>,
}

impl Owner {
    /// Returns whether this owner has not yet been assigned a persisted id.
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Adds a pet to this owner's collection, setting the back-reference.
    pub fn add_pet(&mut self, mut pet: Pet) {
        pet.owner_id = self.id;
        self.pets.push(pet);
    }

    /// Finds a pet by name, case-insensitively.
    ///
    /// With `ignore_new` set, pets that have not been persisted yet are
    /// skipped, so a form-bound pet never matches itself during duplicate
    /// checking.
    pub fn pet_by_name(&self, name: &str, ignore_new: bool) -> Option<&Pet> {
        let wanted = name.to_lowercase();
        self.pets
            .iter()
            .filter(|pet| !(ignore_new && pet.is_new()))
            .find(|pet| pet.name.to_lowercase() == wanted)
    }
}

#[cfg(test)]
mod tests {
    use super::Owner;
    use crate::model::pet::{Pet, PetType};

    fn cat() -> PetType {
        PetType {
            id: Some(1),
            name: "cat".to_string(),
        }
    }

    #[test]
    fn pet_by_name_matches_case_insensitively() {
        let mut owner = Owner {
            id: Some(1),
            ..Owner::default()
        };
        let mut pet = Pet::new("Rex", cat());
        pet.id = Some(7);
        owner.add_pet(pet);

        assert!(owner.pet_by_name("rex", false).is_some());
        assert!(owner.pet_by_name("REX", true).is_some());
        assert!(owner.pet_by_name("fido", false).is_none());
    }

    #[test]
    fn pet_by_name_can_skip_unpersisted_pets() {
        let mut owner = Owner {
            id: Some(1),
            ..Owner::default()
        };
        owner.add_pet(Pet::new("Rex", cat()));

        assert!(owner.pet_by_name("rex", true).is_none());
        assert!(owner.pet_by_name("rex", false).is_some());
    }

    #[test]
    fn add_pet_sets_owner_back_reference() {
        let mut owner = Owner {
            id: Some(42),
            ..Owner::default()
        };
        owner.add_pet(Pet::new("Rex", cat()));
        assert_eq!(owner.pets[0].owner_id, Some(42));
    }
}
