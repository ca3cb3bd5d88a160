//! Appointment scheduling.
//!
//! Pipeline: slot grid → availability partition → conflict guard → persist

mod slots;
mod guard;

pub use slots::*;
pub use guard::*;

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;
use tracing::{debug, warn};

use crate::db::{is_slot_conflict, Database};
use crate::models::{Appointment, AppointmentStatus, BookingRequest};

/// Scheduling errors.
#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Database error: {0}")]
    Database(#[from] crate::db::DbError),

    #[error("Missing required field: {0}")]
    Validation(&'static str),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{time} is not on the bookable slot grid")]
    OffGrid { time: NaiveTime },

    #[error("Doctor {doctor_id} already has a booking at {slot} on {date}")]
    Conflict {
        doctor_id: String,
        date: NaiveDate,
        slot: NaiveTime,
    },

    #[error("Appointment is already {status:?} and can no longer change")]
    Terminal { status: AppointmentStatus },
}

pub type BookingResult<T> = Result<T, BookingError>;

/// Booking desk coordinating availability, validation, and persistence.
pub struct BookingDesk<'a> {
    db: &'a Database,
    grid: SlotGrid,
    guard: ConflictGuard<'a>,
}

impl<'a> BookingDesk<'a> {
    /// Create a booking desk over the standard daily grid.
    pub fn new(db: &'a Database) -> Self {
        Self::with_grid(db, SlotGrid::standard_day())
    }

    /// Create a booking desk over a custom grid.
    pub fn with_grid(db: &'a Database, grid: SlotGrid) -> Self {
        Self {
            db,
            grid,
            guard: ConflictGuard::new(db),
        }
    }

    /// The grid this desk books against.
    pub fn grid(&self) -> &SlotGrid {
        &self.grid
    }

    /// Compute the bookable/busy partition for a doctor and date.
    ///
    /// Both must be chosen; until then the partition reports
    /// `awaiting_selection` and an empty busy set.
    pub fn availability(
        &self,
        doctor_id: Option<&str>,
        date: Option<NaiveDate>,
    ) -> BookingResult<SlotAvailability> {
        let (Some(doctor_id), Some(date)) = (doctor_id, date) else {
            return Ok(SlotAvailability::unselected(&self.grid));
        };
        let busy = self.guard.busy_slots(doctor_id, date, None)?;
        Ok(SlotAvailability::new(&self.grid, busy))
    }

    /// Validate and persist a booking submission.
    pub fn submit(&self, request: &BookingRequest) -> BookingResult<Appointment> {
        let Some((service, date, time)) = request.required_fields() else {
            return Err(BookingError::Validation(
                "pet, doctor, service, date and time are required",
            ));
        };
        if !self.grid.contains(time) {
            return Err(BookingError::OffGrid { time });
        }

        let pet = self
            .db
            .get_pet(&request.pet_id)?
            .ok_or_else(|| BookingError::NotFound(format!("Pet {}", request.pet_id)))?;
        self.db
            .get_doctor(&request.doctor_id)?
            .ok_or_else(|| BookingError::NotFound(format!("Doctor {}", request.doctor_id)))?;

        // Re-validate against the latest persisted set, never a cached one.
        self.guard
            .ensure_free(&request.doctor_id, date, time, None)?;

        let appointment = Appointment {
            id: uuid::Uuid::new_v4().to_string(),
            pet_id: pet.id,
            customer_id: request.customer_id.clone(),
            branch_id: request.branch_id.clone(),
            doctor_id: request.doctor_id.clone(),
            service_type: service,
            scheduled_at: Appointment::slot_instant(date, time),
            reason: if request.reason.is_empty() {
                service.display_name().to_string()
            } else {
                request.reason.clone()
            },
            status: service.initial_status(),
            notes: request.notes.clone(),
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        match self.db.insert_appointment(&appointment) {
            Ok(()) => {
                debug!(appointment_id = %appointment.id, doctor_id = %appointment.doctor_id, "booking accepted");
                Ok(appointment)
            }
            // A competing booking landed between the guard check and our
            // write; the unique slot index turns the race into a conflict.
            Err(e) if is_slot_conflict(&e) => {
                warn!(doctor_id = %request.doctor_id, %date, %time, "slot claimed during submission");
                Err(BookingError::Conflict {
                    doctor_id: request.doctor_id.clone(),
                    date,
                    slot: time,
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Cancel an appointment. Terminal appointments are rejected; the
    /// record itself is never deleted.
    pub fn cancel(&self, appointment_id: &str) -> BookingResult<Appointment> {
        let mut appointment = self
            .db
            .get_appointment(appointment_id)?
            .ok_or_else(|| BookingError::NotFound(format!("Appointment {}", appointment_id)))?;

        if appointment.status.is_terminal() {
            return Err(BookingError::Terminal {
                status: appointment.status,
            });
        }

        self.db
            .set_appointment_status(appointment_id, AppointmentStatus::Cancelled)?;
        appointment.status = AppointmentStatus::Cancelled;
        debug!(appointment_id = %appointment.id, "booking cancelled");
        Ok(appointment)
    }

    /// Move an appointment to a new doctor and/or slot.
    pub fn reschedule(
        &self,
        appointment_id: &str,
        doctor_id: &str,
        date: NaiveDate,
        time: NaiveTime,
    ) -> BookingResult<Appointment> {
        let mut appointment = self
            .db
            .get_appointment(appointment_id)?
            .ok_or_else(|| BookingError::NotFound(format!("Appointment {}", appointment_id)))?;

        if appointment.status.is_terminal() {
            return Err(BookingError::Terminal {
                status: appointment.status,
            });
        }
        if !self.grid.contains(time) {
            return Err(BookingError::OffGrid { time });
        }
        self.db
            .get_doctor(doctor_id)?
            .ok_or_else(|| BookingError::NotFound(format!("Doctor {}", doctor_id)))?;

        self.guard
            .ensure_free(doctor_id, date, time, Some(appointment_id))?;

        let scheduled_at = Appointment::slot_instant(date, time);
        match self
            .db
            .update_appointment_schedule(appointment_id, doctor_id, scheduled_at)
        {
            Ok(_) => {
                appointment.doctor_id = doctor_id.to_string();
                appointment.scheduled_at = scheduled_at;
                debug!(appointment_id = %appointment.id, "booking rescheduled");
                Ok(appointment)
            }
            Err(e) if is_slot_conflict(&e) => Err(BookingError::Conflict {
                doctor_id: doctor_id.to_string(),
                date,
                slot: time,
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// A customer's appointments, newest visit first.
    pub fn appointments_for_customer(&self, customer_id: &str) -> BookingResult<Vec<Appointment>> {
        Ok(self.db.list_appointments_for_customer(customer_id)?)
    }
}
