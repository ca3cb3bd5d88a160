//! Doctor and pet database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbResult};
use crate::models::{Doctor, Pet};

impl Database {
    /// Insert a new doctor.
    pub fn insert_doctor(&self, doctor: &Doctor) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO doctors (id, full_name, branch_id, specialization, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                doctor.id,
                doctor.full_name,
                doctor.branch_id,
                doctor.specialization,
                doctor.created_at,
            ],
        )?;
        Ok(())
    }

    /// Get a doctor by ID.
    pub fn get_doctor(&self, id: &str) -> DbResult<Option<Doctor>> {
        self.conn
            .query_row(
                r#"
                SELECT id, full_name, branch_id, specialization, created_at
                FROM doctors
                WHERE id = ?
                "#,
                [id],
                |row| {
                    Ok(Doctor {
                        id: row.get(0)?,
                        full_name: row.get(1)?,
                        branch_id: row.get(2)?,
                        specialization: row.get(3)?,
                        created_at: row.get(4)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    /// List doctors at a branch, specialists before general practitioners.
    ///
    /// Falls back to all branches when the branch has no doctors, so a
    /// customer without a local vet still gets a bookable list.
    pub fn list_doctors_for_branch(&self, branch_id: &str) -> DbResult<Vec<Doctor>> {
        let mut doctors = self.query_doctors(Some(branch_id))?;
        if doctors.is_empty() {
            doctors = self.query_doctors(None)?;
        }

        doctors.sort_by(|a, b| {
            let a_spec = a.specialization_label();
            let b_spec = b.specialization_label();
            match (a_spec == "General", b_spec == "General") {
                (true, false) => std::cmp::Ordering::Greater,
                (false, true) => std::cmp::Ordering::Less,
                _ => a_spec.cmp(b_spec),
            }
        });
        Ok(doctors)
    }

    fn query_doctors(&self, branch_id: Option<&str>) -> DbResult<Vec<Doctor>> {
        let sql = match branch_id {
            Some(_) => {
                "SELECT id, full_name, branch_id, specialization, created_at
                 FROM doctors WHERE branch_id = ? ORDER BY full_name"
            }
            None => {
                "SELECT id, full_name, branch_id, specialization, created_at
                 FROM doctors ORDER BY full_name"
            }
        };
        let mut stmt = self.conn.prepare(sql)?;

        let map_row = |row: &rusqlite::Row<'_>| {
            Ok(Doctor {
                id: row.get(0)?,
                full_name: row.get(1)?,
                branch_id: row.get(2)?,
                specialization: row.get(3)?,
                created_at: row.get(4)?,
            })
        };

        let rows = match branch_id {
            Some(b) => stmt.query_map([b], map_row)?,
            None => stmt.query_map([], map_row)?,
        };
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Insert a new pet.
    pub fn insert_pet(&self, pet: &Pet) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO pets (id, customer_id, name, species, breed, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                pet.id,
                pet.customer_id,
                pet.name,
                pet.species,
                pet.breed,
                pet.created_at,
            ],
        )?;
        Ok(())
    }

    /// Get a pet by ID.
    pub fn get_pet(&self, id: &str) -> DbResult<Option<Pet>> {
        self.conn
            .query_row(
                r#"
                SELECT id, customer_id, name, species, breed, created_at
                FROM pets
                WHERE id = ?
                "#,
                [id],
                |row| {
                    Ok(Pet {
                        id: row.get(0)?,
                        customer_id: row.get(1)?,
                        name: row.get(2)?,
                        species: row.get(3)?,
                        breed: row.get(4)?,
                        created_at: row.get(5)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    /// List a customer's pets.
    pub fn list_pets_for_customer(&self, customer_id: &str) -> DbResult<Vec<Pet>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, customer_id, name, species, breed, created_at
            FROM pets
            WHERE customer_id = ?
            ORDER BY name
            "#,
        )?;

        let rows = stmt.query_map([customer_id], |row| {
            Ok(Pet {
                id: row.get(0)?,
                customer_id: row.get(1)?,
                name: row.get(2)?,
                species: row.get(3)?,
                breed: row.get(4)?,
                created_at: row.get(5)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
