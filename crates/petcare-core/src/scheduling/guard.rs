//! Conflict guard: last-moment re-validation against the persisted set.

use chrono::{NaiveDate, NaiveTime};

use crate::db::Database;

use super::slots::busy_slots_on_date;
use super::{BookingError, BookingResult};

/// Re-validates a proposed slot against the latest persisted appointments.
///
/// Always reads through the database rather than any cached availability,
/// so a slot claimed since the grid was last rendered is caught here. The
/// unique slot index in the schema remains the final arbiter for writes
/// that race past this check.
pub struct ConflictGuard<'a> {
    db: &'a Database,
}

impl<'a> ConflictGuard<'a> {
    /// Create a new conflict guard.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Busy slots for a doctor on a date, from the latest persisted set.
    ///
    /// `exclude` ignores one appointment ID, so a reschedule does not
    /// collide with the slot it is vacating.
    pub fn busy_slots(
        &self,
        doctor_id: &str,
        date: NaiveDate,
        exclude: Option<&str>,
    ) -> BookingResult<Vec<NaiveTime>> {
        let appointments = self.db.list_active_for_doctor(doctor_id)?;
        let filtered = appointments
            .iter()
            .filter(|a| exclude != Some(a.id.as_str()));
        Ok(busy_slots_on_date(filtered, date))
    }

    /// Reject the submission if the slot is already claimed.
    pub fn ensure_free(
        &self,
        doctor_id: &str,
        date: NaiveDate,
        time: NaiveTime,
        exclude: Option<&str>,
    ) -> BookingResult<()> {
        if self.busy_slots(doctor_id, date, exclude)?.contains(&time) {
            return Err(BookingError::Conflict {
                doctor_id: doctor_id.to_string(),
                date,
                slot: time,
            });
        }
        Ok(())
    }
}
