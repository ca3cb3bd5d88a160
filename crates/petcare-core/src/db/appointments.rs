//! Appointment database operations.
//!
//! The `scheduled_at` column stores a single RFC 3339 UTC instant. Older
//! deployments wrote timezone-naive `date + time` strings; those are
//! normalized into the canonical instant here, at the repository boundary,
//! so business logic never sees more than one date format.

use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{Appointment, AppointmentStatus, ServiceType};

impl Database {
    /// Insert a new appointment.
    ///
    /// The unique slot index rejects a second live booking for the same
    /// doctor and instant; use [`is_slot_conflict`] to recognize that case.
    pub fn insert_appointment(&self, appointment: &Appointment) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO appointments (
                id, pet_id, customer_id, branch_id, doctor_id,
                service_type, scheduled_at, reason, status, notes, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                appointment.id,
                appointment.pet_id,
                appointment.customer_id,
                appointment.branch_id,
                appointment.doctor_id,
                service_to_string(&appointment.service_type),
                appointment.scheduled_at.to_rfc3339(),
                appointment.reason,
                status_to_string(&appointment.status),
                appointment.notes,
                appointment.created_at,
            ],
        )?;
        Ok(())
    }

    /// Get an appointment by ID.
    pub fn get_appointment(&self, id: &str) -> DbResult<Option<Appointment>> {
        self.conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?"),
                [id],
                AppointmentRow::from_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List a doctor's non-cancelled appointments (all dates).
    ///
    /// Callers filter to a calendar date after parsing; the date portion of
    /// a legacy record is only known once it has been normalized.
    pub fn list_active_for_doctor(&self, doctor_id: &str) -> DbResult<Vec<Appointment>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SELECT_COLUMNS} WHERE doctor_id = ? AND status != 'cancelled'"
        ))?;

        let rows = stmt.query_map([doctor_id], AppointmentRow::from_row)?;

        let mut appointments = Vec::new();
        for row in rows {
            appointments.push(row?.try_into()?);
        }
        Ok(appointments)
    }

    /// List a customer's appointments, newest visit first.
    pub fn list_appointments_for_customer(&self, customer_id: &str) -> DbResult<Vec<Appointment>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_COLUMNS} WHERE customer_id = ?"))?;

        let rows = stmt.query_map([customer_id], AppointmentRow::from_row)?;

        let mut appointments: Vec<Appointment> = Vec::new();
        for row in rows {
            appointments.push(row?.try_into()?);
        }

        // Sort after parsing: legacy rows do not sort lexically.
        appointments.sort_by_key(|a: &Appointment| std::cmp::Reverse(a.scheduled_at));
        Ok(appointments)
    }

    /// Update an appointment's status.
    pub fn set_appointment_status(&self, id: &str, status: AppointmentStatus) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE appointments SET status = ? WHERE id = ?",
            params![status_to_string(&status), id],
        )?;
        Ok(rows_affected > 0)
    }

    /// Move an appointment to a new doctor and/or instant.
    ///
    /// Subject to the same unique slot index as insertion.
    pub fn update_appointment_schedule(
        &self,
        id: &str,
        doctor_id: &str,
        scheduled_at: DateTime<Utc>,
    ) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE appointments SET doctor_id = ?, scheduled_at = ? WHERE id = ?",
            params![doctor_id, scheduled_at.to_rfc3339(), id],
        )?;
        Ok(rows_affected > 0)
    }
}

/// Whether a database error is the unique slot index rejecting a double
/// booking.
pub fn is_slot_conflict(err: &DbError) -> bool {
    match err {
        DbError::Sqlite(rusqlite::Error::SqliteFailure(e, Some(msg))) => {
            e.code == rusqlite::ErrorCode::ConstraintViolation
                && msg.contains("appointments.doctor_id")
        }
        _ => false,
    }
}

/// Parse a stored `scheduled_at` value, normalizing legacy formats.
///
/// Accepts RFC 3339, and the two timezone-naive shapes older records used
/// (`2024-06-01T09:00:00` and `2024-06-01 09:00`), both read as UTC.
pub fn parse_scheduled_at(raw: &str) -> DbResult<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }
    Err(DbError::Constraint(format!(
        "Unparseable appointment time: {}",
        raw
    )))
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, pet_id, customer_id, branch_id, doctor_id,
           service_type, scheduled_at, reason, status, notes, created_at
    FROM appointments
"#;

/// Intermediate row struct for database mapping.
struct AppointmentRow {
    id: String,
    pet_id: String,
    customer_id: String,
    branch_id: String,
    doctor_id: String,
    service_type: String,
    scheduled_at: String,
    reason: String,
    status: String,
    notes: Option<String>,
    created_at: String,
}

impl AppointmentRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            pet_id: row.get(1)?,
            customer_id: row.get(2)?,
            branch_id: row.get(3)?,
            doctor_id: row.get(4)?,
            service_type: row.get(5)?,
            scheduled_at: row.get(6)?,
            reason: row.get(7)?,
            status: row.get(8)?,
            notes: row.get(9)?,
            created_at: row.get(10)?,
        })
    }
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = DbError;

    fn try_from(row: AppointmentRow) -> Result<Self, Self::Error> {
        Ok(Appointment {
            id: row.id,
            pet_id: row.pet_id,
            customer_id: row.customer_id,
            branch_id: row.branch_id,
            doctor_id: row.doctor_id,
            service_type: string_to_service(&row.service_type)?,
            scheduled_at: parse_scheduled_at(&row.scheduled_at)?,
            reason: row.reason,
            status: string_to_status(&row.status)?,
            notes: row.notes,
            created_at: row.created_at,
        })
    }
}

fn status_to_string(status: &AppointmentStatus) -> &'static str {
    match status {
        AppointmentStatus::Pending => "pending",
        AppointmentStatus::CheckedIn => "checked-in",
        AppointmentStatus::Completed => "completed",
        AppointmentStatus::Cancelled => "cancelled",
    }
}

fn string_to_status(s: &str) -> Result<AppointmentStatus, DbError> {
    match s {
        "pending" => Ok(AppointmentStatus::Pending),
        "checked-in" => Ok(AppointmentStatus::CheckedIn),
        "completed" => Ok(AppointmentStatus::Completed),
        "cancelled" => Ok(AppointmentStatus::Cancelled),
        _ => Err(DbError::Constraint(format!(
            "Unknown appointment status: {}",
            s
        ))),
    }
}

fn service_to_string(service: &ServiceType) -> &'static str {
    match service {
        ServiceType::MedicalExam => "medical-exam",
        ServiceType::SingleVaccine => "single-vaccine",
        ServiceType::VaccinePackage => "vaccine-package",
    }
}

fn string_to_service(s: &str) -> Result<ServiceType, DbError> {
    match s {
        "medical-exam" => Ok(ServiceType::MedicalExam),
        "single-vaccine" => Ok(ServiceType::SingleVaccine),
        "vaccine-package" => Ok(ServiceType::VaccinePackage),
        _ => Err(DbError::Constraint(format!("Unknown service type: {}", s))),
    }
}
