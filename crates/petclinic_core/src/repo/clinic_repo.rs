//! Clinic repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the persistence operations the clinic application needs:
//!   catalog reads, owner search, entity loads, upsert stores, pet deletion.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Every public operation is its own transaction boundary; writes commit
//!   before returning so newly assigned ids are visible to the caller.
//! - Stores are upserts: entities without an id are inserted and get the new
//!   id written back, entities with an id must already exist.
//! - Loads return fully populated aggregates (owner with pets and visits,
//!   pet with visits) in their contract ordering.

use crate::db::DbError;
use crate::model::owner::Owner;
use crate::model::pet::{Pet, PetType};
use crate::model::vet::{Specialty, Vet};
use crate::model::visit::Visit;
use crate::model::EntityId;
use log::debug;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for clinic persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// The requested entity id does not resolve. Callers should surface this
    /// as a user-facing not-found, not a fatal error.
    NotFound {
        entity: &'static str,
        id: EntityId,
    },
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid clinic data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection not migrated: schema version {actual_version}, expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{column}` in table `{table}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence contract consumed by the web layer.
///
/// Read operations run in a read-only transaction scope; write operations run
/// in their own read-write transaction committed at method exit.
pub trait Clinic {
    /// All vets ordered by (last name, first name) ascending, each populated
    /// with its specialties sorted by name.
    fn get_vets(&self) -> RepoResult<Vec<Vet>>;
    /// The pet type catalog ordered by name ascending.
    fn get_pet_types(&self) -> RepoResult<Vec<PetType>>;
    /// Owners whose last name starts with the given prefix, case-insensitively.
    /// An empty prefix matches all owners.
    fn find_owners(&self, last_name_prefix: &str) -> RepoResult<Vec<Owner>>;
    /// Loads one owner with pets and visits, or `NotFound`.
    fn load_owner(&self, id: EntityId) -> RepoResult<Owner>;
    /// Loads one pet with its visits, or `NotFound`.
    fn load_pet(&self, id: EntityId) -> RepoResult<Pet>;
    /// Upserts the owner and cascades to its pets and their visits.
    fn store_owner(&mut self, owner: &mut Owner) -> RepoResult<()>;
    /// Upserts the pet and cascades to its visits.
    fn store_pet(&mut self, pet: &mut Pet) -> RepoResult<()>;
    /// Upserts one visit.
    fn store_visit(&mut self, visit: &mut Visit) -> RepoResult<()>;
    /// Permanently deletes the pet and its owned visits, or `NotFound`.
    fn delete_pet(&mut self, id: EntityId) -> RepoResult<()>;
}

/// SQLite-backed clinic repository.
pub struct SqliteClinic<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteClinic<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    ///
    /// Rejects connections whose schema version or table layout does not
    /// match what this binary was built against.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl Clinic for SqliteClinic<'_> {
    fn get_vets(&self) -> RepoResult<Vec<Vet>> {
        let tx = self.conn.unchecked_transaction()?;
        let vets = vets_in(&tx)?;
        tx.commit()?;
        Ok(vets)
    }

    fn get_pet_types(&self) -> RepoResult<Vec<PetType>> {
        pet_types_in(self.conn)
    }

    fn find_owners(&self, last_name_prefix: &str) -> RepoResult<Vec<Owner>> {
        let tx = self.conn.unchecked_transaction()?;

        let mut owners = Vec::new();
        {
            let mut stmt = tx.prepare(
                "SELECT id, first_name, last_name, address, city, telephone
                 FROM owners
                 WHERE last_name LIKE ?1
                 ORDER BY last_name, first_name;",
            )?;
            let mut rows = stmt.query([format!("{last_name_prefix}%")])?;
            while let Some(row) = rows.next()? {
                let mut owner = owner_from_row(row)?;
                populate_owner(&tx, &mut owner)?;
                owners.push(owner);
            }
        }

        tx.commit()?;
        Ok(owners)
    }

    fn load_owner(&self, id: EntityId) -> RepoResult<Owner> {
        let tx = self.conn.unchecked_transaction()?;

        let mut owner = {
            let mut stmt = tx.prepare(
                "SELECT id, first_name, last_name, address, city, telephone
                 FROM owners
                 WHERE id = ?1;",
            )?;
            let mut rows = stmt.query([id])?;
            match rows.next()? {
                Some(row) => owner_from_row(row)?,
                None => {
                    return Err(RepoError::NotFound {
                        entity: "owner",
                        id,
                    })
                }
            }
        };

        populate_owner(&tx, &mut owner)?;
        tx.commit()?;
        Ok(owner)
    }

    fn load_pet(&self, id: EntityId) -> RepoResult<Pet> {
        let tx = self.conn.unchecked_transaction()?;
        let pet = pet_by_id(&tx, id)?.ok_or(RepoError::NotFound { entity: "pet", id })?;
        tx.commit()?;
        Ok(pet)
    }

    fn store_owner(&mut self, owner: &mut Owner) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        upsert_owner_in_tx(&tx, owner)?;
        tx.commit()?;

        debug!(
            "event=store_owner module=repo status=ok owner_id={}",
            display_id(owner.id)
        );
        Ok(())
    }

    fn store_pet(&mut self, pet: &mut Pet) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        upsert_pet_in_tx(&tx, pet)?;
        tx.commit()?;

        debug!(
            "event=store_pet module=repo status=ok pet_id={}",
            display_id(pet.id)
        );
        Ok(())
    }

    fn store_visit(&mut self, visit: &mut Visit) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        upsert_visit_in_tx(&tx, visit)?;
        tx.commit()?;

        debug!(
            "event=store_visit module=repo status=ok visit_id={}",
            display_id(visit.id)
        );
        Ok(())
    }

    fn delete_pet(&mut self, id: EntityId) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        // Visits are removed by the schema's ON DELETE CASCADE.
        let changed = tx.execute("DELETE FROM pets WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: "pet", id });
        }
        tx.commit()?;

        debug!("event=delete_pet module=repo status=ok pet_id={id}");
        Ok(())
    }
}

fn vets_in(conn: &Connection) -> RepoResult<Vec<Vet>> {
    let mut stmt = conn.prepare(
        "SELECT id, first_name, last_name
         FROM vets
         ORDER BY last_name, first_name;",
    )?;
    let mut rows = stmt.query([])?;
    let mut vets = Vec::new();
    while let Some(row) = rows.next()? {
        let id: EntityId = row.get("id")?;
        vets.push(Vet {
            id: Some(id),
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
            specialties: specialties_for_vet(conn, id)?,
        });
    }
    Ok(vets)
}

fn specialties_for_vet(conn: &Connection, vet_id: EntityId) -> RepoResult<Vec<Specialty>> {
    let mut stmt = conn.prepare(
        "SELECT s.id, s.name
         FROM vet_specialties vs
         INNER JOIN specialties s ON s.id = vs.specialty_id
         WHERE vs.vet_id = ?1
         ORDER BY s.name;",
    )?;
    let mut rows = stmt.query([vet_id])?;
    let mut specialties = Vec::new();
    while let Some(row) = rows.next()? {
        specialties.push(Specialty {
            id: Some(row.get("id")?),
            name: row.get("name")?,
        });
    }
    Ok(specialties)
}

fn pet_types_in(conn: &Connection) -> RepoResult<Vec<PetType>> {
    let mut stmt = conn.prepare("SELECT id, name FROM types ORDER BY name;")?;
    let mut rows = stmt.query([])?;
    let mut types = Vec::new();
    while let Some(row) = rows.next()? {
        types.push(PetType {
            id: Some(row.get("id")?),
            name: row.get("name")?,
        });
    }
    Ok(types)
}

fn owner_from_row(row: &Row<'_>) -> RepoResult<Owner> {
    Ok(Owner {
        id: Some(row.get("id")?),
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        address: row.get("address")?,
        city: row.get("city")?,
        telephone: row.get("telephone")?,
        pets: Vec::new(),
    })
}

fn populate_owner(conn: &Connection, owner: &mut Owner) -> RepoResult<()> {
    let owner_id = owner.id.ok_or_else(|| {
        RepoError::InvalidData("owner row decoded without an id".to_string())
    })?;
    owner.pets = pets_for_owner(conn, owner_id)?;
    Ok(())
}

fn pets_for_owner(conn: &Connection, owner_id: EntityId) -> RepoResult<Vec<Pet>> {
    let mut stmt = conn.prepare(&format!(
        "{PET_SELECT_SQL}
         WHERE p.owner_id = ?1
         ORDER BY p.name;"
    ))?;
    let mut rows = stmt.query([owner_id])?;
    let mut pets = Vec::new();
    while let Some(row) = rows.next()? {
        pets.push(pet_from_row(conn, row)?);
    }
    Ok(pets)
}

const PET_SELECT_SQL: &str = "SELECT
    p.id,
    p.name,
    p.birth_date,
    p.owner_id,
    t.id AS type_id,
    t.name AS type_name
FROM pets p
INNER JOIN types t ON t.id = p.type_id";

fn pet_by_id(conn: &Connection, id: EntityId) -> RepoResult<Option<Pet>> {
    let mut stmt = conn.prepare(&format!("{PET_SELECT_SQL} WHERE p.id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(pet_from_row(conn, row)?));
    }
    Ok(None)
}

fn pet_from_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Pet> {
    let id: EntityId = row.get("id")?;
    Ok(Pet {
        id: Some(id),
        name: row.get("name")?,
        birth_date: row.get("birth_date")?,
        pet_type: PetType {
            id: Some(row.get("type_id")?),
            name: row.get("type_name")?,
        },
        owner_id: Some(row.get("owner_id")?),
        visits: visits_for_pet(conn, id)?,
    })
}

fn visits_for_pet(conn: &Connection, pet_id: EntityId) -> RepoResult<Vec<Visit>> {
    let mut stmt = conn.prepare(
        "SELECT id, visit_date, description
         FROM visits
         WHERE pet_id = ?1
         ORDER BY visit_date, id;",
    )?;
    let mut rows = stmt.query([pet_id])?;
    let mut visits = Vec::new();
    while let Some(row) = rows.next()? {
        visits.push(Visit {
            id: Some(row.get("id")?),
            date: row.get("visit_date")?,
            description: row.get("description")?,
            pet_id: Some(pet_id),
        });
    }
    Ok(visits)
}

fn upsert_owner_in_tx(tx: &Transaction<'_>, owner: &mut Owner) -> RepoResult<()> {
    match owner.id {
        None => {
            tx.execute(
                "INSERT INTO owners (first_name, last_name, address, city, telephone)
                 VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    owner.first_name,
                    owner.last_name,
                    owner.address,
                    owner.city,
                    owner.telephone,
                ],
            )?;
            owner.id = Some(tx.last_insert_rowid());
        }
        Some(id) => {
            let changed = tx.execute(
                "UPDATE owners
                 SET first_name = ?1, last_name = ?2, address = ?3, city = ?4, telephone = ?5
                 WHERE id = ?6;",
                params![
                    owner.first_name,
                    owner.last_name,
                    owner.address,
                    owner.city,
                    owner.telephone,
                    id,
                ],
            )?;
            if changed == 0 {
                return Err(RepoError::NotFound {
                    entity: "owner",
                    id,
                });
            }
        }
    }

    for pet in &mut owner.pets {
        pet.owner_id = owner.id;
        upsert_pet_in_tx(tx, pet)?;
    }

    Ok(())
}

fn upsert_pet_in_tx(tx: &Transaction<'_>, pet: &mut Pet) -> RepoResult<()> {
    let type_id = pet.pet_type.id.ok_or_else(|| {
        RepoError::InvalidData(format!("pet `{}` references an unpersisted pet type", pet.name))
    })?;
    let owner_id = pet.owner_id.ok_or_else(|| {
        RepoError::InvalidData(format!("pet `{}` has no owner id", pet.name))
    })?;

    match pet.id {
        None => {
            tx.execute(
                "INSERT INTO pets (name, birth_date, type_id, owner_id)
                 VALUES (?1, ?2, ?3, ?4);",
                params![pet.name, pet.birth_date, type_id, owner_id],
            )?;
            pet.id = Some(tx.last_insert_rowid());
        }
        Some(id) => {
            let changed = tx.execute(
                "UPDATE pets
                 SET name = ?1, birth_date = ?2, type_id = ?3, owner_id = ?4
                 WHERE id = ?5;",
                params![pet.name, pet.birth_date, type_id, owner_id, id],
            )?;
            if changed == 0 {
                return Err(RepoError::NotFound { entity: "pet", id });
            }
        }
    }

    for visit in &mut pet.visits {
        visit.pet_id = pet.id;
        upsert_visit_in_tx(tx, visit)?;
    }

    Ok(())
}

fn upsert_visit_in_tx(tx: &Transaction<'_>, visit: &mut Visit) -> RepoResult<()> {
    let pet_id = visit
        .pet_id
        .ok_or_else(|| RepoError::InvalidData("visit has no pet id".to_string()))?;

    match visit.id {
        None => {
            tx.execute(
                "INSERT INTO visits (pet_id, visit_date, description)
                 VALUES (?1, ?2, ?3);",
                params![pet_id, visit.date, visit.description],
            )?;
            visit.id = Some(tx.last_insert_rowid());
        }
        Some(id) => {
            let changed = tx.execute(
                "UPDATE visits
                 SET pet_id = ?1, visit_date = ?2, description = ?3
                 WHERE id = ?4;",
                params![pet_id, visit.date, visit.description, id],
            )?;
            if changed == 0 {
                return Err(RepoError::NotFound {
                    entity: "visit",
                    id,
                });
            }
        }
    }

    Ok(())
}

fn display_id(id: Option<EntityId>) -> String {
    id.map_or_else(|| "unassigned".to_string(), |value| value.to_string())
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected = crate::db::migrations::latest_version();
    let actual: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual != expected {
        return Err(RepoError::UninitializedConnection {
            expected_version: expected,
            actual_version: actual,
        });
    }

    for table in [
        "owners",
        "pets",
        "types",
        "vets",
        "specialties",
        "vet_specialties",
        "visits",
    ] {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    for column in ["name", "birth_date", "type_id", "owner_id"] {
        if !table_has_column(conn, "pets", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "pets",
                column,
            });
        }
    }

    for column in ["pet_id", "visit_date", "description"] {
        if !table_has_column(conn, "visits", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "visits",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
