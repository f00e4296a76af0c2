//! Core domain logic for the PetClinic demonstration application.
//! This crate is the single source of truth for the data access and
//! validation contract: the clinic repository, pet validation, and the
//! pet type form-binding helper.

pub mod db;
pub mod forms;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod validation;

pub use forms::resolve_pet_type;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::owner::Owner;
pub use model::pet::{Pet, PetType};
pub use model::vet::{Specialty, Vet};
pub use model::visit::Visit;
pub use model::EntityId;
pub use repo::clinic_repo::{Clinic, RepoError, RepoResult, SqliteClinic};
pub use service::clinic_service::{ClinicService, StorePetOutcome};
pub use validation::{validate_pet, FieldError, ValidationErrors};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
