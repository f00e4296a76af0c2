//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the clinic data access contract.
//! - Isolate SQLite query details from service/web orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod clinic_repo;
