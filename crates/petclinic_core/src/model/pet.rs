//! Pet and pet type records.

use crate::model::visit::Visit;
use crate::model::EntityId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Shared reference data naming a kind of pet (cat, dog, ...).
///
/// Loaded from the store's catalog; never created or edited through the
/// clinic repository contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetType {
    pub id: Option<EntityId>,
    pub name: String,
}

/// A pet registered with the clinic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: Option<EntityId>,
    pub name: String,
    pub birth_date: Option<NaiveDate>,
    /// Serialized as `type` to match external schema naming.
    #[serde(rename = "type")]
    pub pet_type: PetType,
    /// Non-owning back-reference to the owning `Owner`.
    pub owner_id: Option<EntityId>,
    /// Visits owned by this pet, ordered by visit date ascending.
    pub visits: Vec<Visit>,
}

impl Pet {
    /// Creates a transient pet with no id, birth date or visits.
    pub fn new(name: impl Into<String>, pet_type: PetType) -> Self {
        Self {
            id: None,
            name: name.into(),
            birth_date: None,
            pet_type,
            owner_id: None,
            visits: Vec::new(),
        }
    }

    /// Returns whether this pet has not yet been assigned a persisted id.
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Appends a visit to this pet's owned collection.
    pub fn add_visit(&mut self, mut visit: Visit) {
        visit.pet_id = self.id;
        self.visits.push(visit);
    }
}
