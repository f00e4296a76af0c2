//! Vet and specialty records.

use crate::model::EntityId;
use serde::{Deserialize, Serialize};

/// A vet's specialty (for example, dentistry). Shared reference data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specialty {
    pub id: Option<EntityId>,
    pub name: String,
}

/// A veterinarian and the specialties they hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vet {
    pub id: Option<EntityId>,
    pub first_name: String,
    pub last_name: String,
    /// Specialty references, ordered by name ascending.
    pub specialties: Vec<Specialty>,
}

impl Vet {
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Number of specialties held, for display layers.
    pub fn nr_of_specialties(&self) -> usize {
        self.specialties.len()
    }
}
