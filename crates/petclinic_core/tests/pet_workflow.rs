//! End-to-end pet registration flow: form binding, validation, store.

use chrono::NaiveDate;
use petclinic_core::db::open_db_in_memory;
use petclinic_core::{
    resolve_pet_type, Clinic, ClinicService, Owner, Pet, SqliteClinic, StorePetOutcome,
};

fn stored_owner(clinic: &mut SqliteClinic<'_>) -> Owner {
    let mut owner = Owner {
        first_name: "Joe".to_string(),
        last_name: "Bloggs".to_string(),
        address: "123 Caramel Street".to_string(),
        city: "London".to_string(),
        telephone: "4441181".to_string(),
        ..Owner::default()
    };
    clinic.store_owner(&mut owner).unwrap();
    owner
}

#[test]
fn register_pet_through_form_binding_and_service() {
    let mut conn = open_db_in_memory().unwrap();
    let mut clinic = SqliteClinic::try_new(&mut conn).unwrap();
    let owner = stored_owner(&mut clinic);
    let mut service = ClinicService::new(clinic);

    let catalog = service.get_pet_types().unwrap();
    let dog = resolve_pet_type(&catalog, "dog").expect("dog is in the seeded catalog");

    let mut pet = Pet::new("Rex", dog);
    pet.birth_date = NaiveDate::from_ymd_opt(2022, 11, 30);
    pet.owner_id = owner.id;

    let outcome = service.store_validated_pet(&mut pet, &owner).unwrap();
    assert!(matches!(outcome, StorePetOutcome::Stored));

    let id = pet.id.expect("pet id should be assigned");
    let loaded = service.load_pet(id).unwrap();
    assert_eq!(loaded.name, "Rex");
    assert_eq!(loaded.pet_type.name, "dog");
}

#[test]
fn duplicate_pet_name_is_rejected_without_touching_the_store() {
    let mut conn = open_db_in_memory().unwrap();
    let mut clinic = SqliteClinic::try_new(&mut conn).unwrap();
    let owner = stored_owner(&mut clinic);
    let mut service = ClinicService::new(clinic);

    let catalog = service.get_pet_types().unwrap();
    let dog = resolve_pet_type(&catalog, "dog").unwrap();
    let cat = resolve_pet_type(&catalog, "cat").unwrap();

    let mut first = Pet::new("rex", dog);
    first.owner_id = owner.id;
    service.store_pet(&mut first).unwrap();

    // Refresh the owner aggregate so the validator sees the persisted pet.
    let owner = service.load_owner(owner.id.unwrap()).unwrap();

    let mut duplicate = Pet::new("Rex", cat);
    duplicate.owner_id = owner.id;
    let outcome = service.store_validated_pet(&mut duplicate, &owner).unwrap();

    match outcome {
        StorePetOutcome::Rejected(errors) => {
            assert_eq!(errors.field_errors().len(), 1);
            assert_eq!(errors.field_errors()[0].field, "name");
            assert_eq!(errors.field_errors()[0].code, "duplicate");
        }
        StorePetOutcome::Stored => panic!("duplicate name should be rejected"),
    }
    assert!(duplicate.is_new());

    let reloaded = service.load_owner(owner.id.unwrap()).unwrap();
    assert_eq!(reloaded.pets.len(), 1);
}

#[test]
fn empty_pet_name_is_rejected_with_required() {
    let mut conn = open_db_in_memory().unwrap();
    let mut clinic = SqliteClinic::try_new(&mut conn).unwrap();
    let owner = stored_owner(&mut clinic);
    let mut service = ClinicService::new(clinic);

    let catalog = service.get_pet_types().unwrap();
    let mut pet = Pet::new("", resolve_pet_type(&catalog, "cat").unwrap());
    pet.owner_id = owner.id;

    let outcome = service.store_validated_pet(&mut pet, &owner).unwrap();
    match outcome {
        StorePetOutcome::Rejected(errors) => {
            assert_eq!(errors.field_errors().len(), 1);
            assert_eq!(errors.field_errors()[0].code, "required");
        }
        StorePetOutcome::Stored => panic!("empty name should be rejected"),
    }
}

#[test]
fn renaming_a_persisted_pet_to_a_duplicate_is_allowed() {
    let mut conn = open_db_in_memory().unwrap();
    let mut clinic = SqliteClinic::try_new(&mut conn).unwrap();
    let owner = stored_owner(&mut clinic);
    let mut service = ClinicService::new(clinic);

    let catalog = service.get_pet_types().unwrap();
    let dog = resolve_pet_type(&catalog, "dog").unwrap();

    let mut rex = Pet::new("rex", dog.clone());
    rex.owner_id = owner.id;
    service.store_pet(&mut rex).unwrap();

    let mut fido = Pet::new("Fido", dog);
    fido.owner_id = owner.id;
    service.store_pet(&mut fido).unwrap();

    let owner = service.load_owner(owner.id.unwrap()).unwrap();

    // The duplicate rule is new-only: renaming persisted Fido to Rex passes.
    let mut renamed = owner
        .pets
        .iter()
        .find(|pet| pet.name == "Fido")
        .cloned()
        .unwrap();
    renamed.name = "Rex".to_string();

    let outcome = service.store_validated_pet(&mut renamed, &owner).unwrap();
    assert!(matches!(outcome, StorePetOutcome::Stored));
}

#[test]
fn unknown_pet_type_text_resolves_to_none() {
    let mut conn = open_db_in_memory().unwrap();
    let clinic = SqliteClinic::try_new(&mut conn).unwrap();

    let catalog = clinic.get_pet_types().unwrap();
    assert!(resolve_pet_type(&catalog, "fish").is_none());
}
