//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `petclinic_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use petclinic_core::db::open_db_in_memory;
use petclinic_core::{Clinic, SqliteClinic};

fn main() {
    println!("petclinic_core version={}", petclinic_core::core_version());

    let mut conn = match open_db_in_memory() {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("failed to open in-memory clinic database: {err}");
            std::process::exit(1);
        }
    };

    let clinic = match SqliteClinic::try_new(&mut conn) {
        Ok(clinic) => clinic,
        Err(err) => {
            eprintln!("failed to initialize clinic repository: {err}");
            std::process::exit(1);
        }
    };

    match clinic.get_pet_types() {
        Ok(types) => {
            let names: Vec<&str> = types.iter().map(|t| t.name.as_str()).collect();
            println!("pet type catalog: {}", names.join(", "));
        }
        Err(err) => {
            eprintln!("failed to read pet type catalog: {err}");
            std::process::exit(1);
        }
    }
}
