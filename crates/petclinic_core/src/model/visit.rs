//! Visit record.

use crate::model::EntityId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A clinic visit booked for a pet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
    pub id: Option<EntityId>,
    pub date: NaiveDate,
    pub description: String,
    /// Non-owning back-reference to the owning `Pet`.
    pub pet_id: Option<EntityId>,
}

impl Visit {
    /// Creates a transient visit not yet attached to a pet.
    pub fn new(date: NaiveDate, description: impl Into<String>) -> Self {
        Self {
            id: None,
            date,
            description: description.into(),
            pet_id: None,
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }
}
