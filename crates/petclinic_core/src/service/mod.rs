//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep web/CLI layers decoupled from storage details.

pub mod clinic_service;
