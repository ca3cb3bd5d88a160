//! Appointment models.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Service a customer can book an appointment for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ServiceType {
    /// General medical examination
    MedicalExam,
    /// Administration of a single vaccine dose
    SingleVaccine,
    /// Multi-dose vaccine package
    VaccinePackage,
}

impl ServiceType {
    /// Status a freshly booked appointment starts in.
    ///
    /// All bookable services currently check the pet in immediately at
    /// booking time; the mapping is kept per service type so a future
    /// approval step only touches this function.
    pub fn initial_status(&self) -> AppointmentStatus {
        match self {
            ServiceType::MedicalExam => AppointmentStatus::CheckedIn,
            ServiceType::SingleVaccine => AppointmentStatus::CheckedIn,
            ServiceType::VaccinePackage => AppointmentStatus::CheckedIn,
        }
    }

    /// Human-readable service name, used as the default visit reason.
    pub fn display_name(&self) -> &'static str {
        match self {
            ServiceType::MedicalExam => "Medical Examination",
            ServiceType::SingleVaccine => "Single Vaccine Dose",
            ServiceType::VaccinePackage => "Vaccine Package",
        }
    }
}

/// Appointment lifecycle status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AppointmentStatus {
    /// Booked, awaiting confirmation
    Pending,
    /// Confirmed and checked in at the clinic
    CheckedIn,
    /// Visit finished
    Completed,
    /// Cancelled by customer or staff (appointments are never hard-deleted)
    Cancelled,
}

impl AppointmentStatus {
    /// Whether this appointment still occupies its time slot.
    pub fn occupies_slot(&self) -> bool {
        !matches!(self, AppointmentStatus::Cancelled)
    }

    /// Terminal states cannot transition anywhere else.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Completed | AppointmentStatus::Cancelled
        )
    }
}

/// A booked appointment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    /// Unique appointment ID
    pub id: String,
    /// Pet being seen
    pub pet_id: String,
    /// Customer who booked
    pub customer_id: String,
    /// Branch where the visit happens
    pub branch_id: String,
    /// Doctor the slot belongs to
    pub doctor_id: String,
    /// Booked service
    pub service_type: ServiceType,
    /// Canonical visit instant (date + slot time, UTC)
    pub scheduled_at: DateTime<Utc>,
    /// Reason for the visit
    pub reason: String,
    /// Lifecycle status
    pub status: AppointmentStatus,
    /// Free-form notes
    pub notes: Option<String>,
    /// Creation timestamp
    pub created_at: String,
}

impl Appointment {
    /// Combine a calendar date and a slot time into the canonical instant.
    pub fn slot_instant(date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
        Utc.from_utc_datetime(&date.and_time(time))
    }

    /// Calendar date portion of the visit (UTC).
    pub fn scheduled_date(&self) -> NaiveDate {
        self.scheduled_at.date_naive()
    }

    /// Slot time portion of the visit.
    pub fn slot_time(&self) -> NaiveTime {
        self.scheduled_at.time()
    }
}

/// A booking submission collected from a customer form.
///
/// String fields default to empty and date/time to `None` until the user
/// fills them in; `validate` rejects incomplete submissions.
#[derive(Debug, Clone, Default)]
pub struct BookingRequest {
    /// Pet to book for
    pub pet_id: String,
    /// Customer submitting the booking
    pub customer_id: String,
    /// Branch to book at
    pub branch_id: String,
    /// Requested doctor
    pub doctor_id: String,
    /// Requested service
    pub service_type: Option<ServiceType>,
    /// Requested calendar date
    pub date: Option<NaiveDate>,
    /// Requested slot time
    pub time: Option<NaiveTime>,
    /// Reason for the visit (service display name when left empty)
    pub reason: String,
    /// Free-form notes
    pub notes: Option<String>,
}

impl BookingRequest {
    /// Check all required fields are present.
    ///
    /// Returns the `(service, date, time)` triple on success so callers
    /// don't have to unwrap the options again.
    pub fn required_fields(&self) -> Option<(ServiceType, NaiveDate, NaiveTime)> {
        if self.pet_id.is_empty() || self.doctor_id.is_empty() {
            return None;
        }
        Some((self.service_type?, self.date?, self.time?))
    }
}
