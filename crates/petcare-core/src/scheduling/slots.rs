//! Daily slot grid and availability partition.

use chrono::{NaiveDate, NaiveTime};

use crate::models::Appointment;

/// The fixed grid of bookable clock times for one day.
///
/// The clinic books hourly slots across a morning and an afternoon window
/// with a lunch gap in between. The grid does not derive from per-branch
/// working hours; a future derivation only needs to replace
/// [`SlotGrid::standard_day`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotGrid {
    times: Vec<NaiveTime>,
}

impl SlotGrid {
    /// The standard clinic day: 08:00-10:00 and 13:00-16:00, hourly.
    pub fn standard_day() -> Self {
        Self::from_hours((8..=10).chain(13..=16))
    }

    /// Build a grid from whole-hour slot starts.
    pub fn from_hours(hours: impl IntoIterator<Item = u32>) -> Self {
        let times = hours
            .into_iter()
            .filter_map(|h| NaiveTime::from_hms_opt(h, 0, 0))
            .collect();
        Self { times }
    }

    /// Slot times in day order.
    pub fn times(&self) -> &[NaiveTime] {
        &self.times
    }

    /// Whether a clock time is one of the grid's slots.
    pub fn contains(&self, time: NaiveTime) -> bool {
        self.times.contains(&time)
    }
}

impl Default for SlotGrid {
    fn default() -> Self {
        Self::standard_day()
    }
}

/// The bookable/busy partition of a doctor's day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotAvailability {
    /// Every slot on the grid, in day order
    pub all_slots: Vec<NaiveTime>,
    /// Slots claimed by a non-cancelled appointment
    pub busy_slots: Vec<NaiveTime>,
    /// True when no doctor/date has been chosen yet; callers should prompt
    /// for a selection instead of rendering an empty grid
    pub awaiting_selection: bool,
}

impl SlotAvailability {
    /// Partition a grid against a set of busy times.
    pub fn new(grid: &SlotGrid, busy_slots: Vec<NaiveTime>) -> Self {
        Self {
            all_slots: grid.times().to_vec(),
            busy_slots,
            awaiting_selection: false,
        }
    }

    /// The state shown before a doctor and date have been chosen.
    pub fn unselected(grid: &SlotGrid) -> Self {
        Self {
            all_slots: grid.times().to_vec(),
            busy_slots: Vec::new(),
            awaiting_selection: true,
        }
    }

    /// Whether a slot can be offered for booking.
    pub fn is_bookable(&self, slot: NaiveTime) -> bool {
        !self.awaiting_selection
            && self.all_slots.contains(&slot)
            && !self.busy_slots.contains(&slot)
    }

    /// Grid slots not claimed by an appointment, in day order.
    pub fn bookable_slots(&self) -> Vec<NaiveTime> {
        self.all_slots
            .iter()
            .copied()
            .filter(|s| !self.busy_slots.contains(s))
            .collect()
    }

    /// Carry a user's slot selection across a recompute.
    ///
    /// Returns `None` when the previously selected slot has become busy,
    /// so the caller drops it instead of submitting a stale choice.
    pub fn retain_selection(&self, selection: Option<NaiveTime>) -> Option<NaiveTime> {
        selection.filter(|s| self.is_bookable(*s))
    }
}

/// Slot times claimed by non-cancelled appointments on a calendar date.
///
/// Compares on the date portion of the canonical instant, deduplicates,
/// and returns the times in day order.
pub fn busy_slots_on_date<'a>(
    appointments: impl IntoIterator<Item = &'a Appointment>,
    date: NaiveDate,
) -> Vec<NaiveTime> {
    let mut slots: Vec<NaiveTime> = appointments
        .into_iter()
        .filter(|a| a.status.occupies_slot() && a.scheduled_date() == date)
        .map(|a| a.slot_time())
        .collect();
    slots.sort();
    slots.dedup();
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppointmentStatus, ServiceType};

    fn slot(hour: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, 0, 0).unwrap()
    }

    fn make_appointment(hour: u32, status: AppointmentStatus, date: NaiveDate) -> Appointment {
        Appointment {
            id: uuid::Uuid::new_v4().to_string(),
            pet_id: "pet-1".into(),
            customer_id: "cust-1".into(),
            branch_id: "branch-1".into(),
            doctor_id: "doc-1".into(),
            service_type: ServiceType::MedicalExam,
            scheduled_at: Appointment::slot_instant(date, slot(hour)),
            reason: "Medical Examination".into(),
            status,
            notes: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    #[test]
    fn test_standard_day_grid() {
        let grid = SlotGrid::standard_day();
        let hours: Vec<u32> = grid
            .times()
            .iter()
            .map(|t| chrono::Timelike::hour(t))
            .collect();
        assert_eq!(hours, vec![8, 9, 10, 13, 14, 15, 16]);

        assert!(grid.contains(slot(9)));
        assert!(!grid.contains(slot(11))); // lunch gap
        assert!(!grid.contains(slot(17)));
    }

    #[test]
    fn test_busy_partition() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let appointments = vec![make_appointment(9, AppointmentStatus::CheckedIn, date)];

        let grid = SlotGrid::standard_day();
        let busy = busy_slots_on_date(&appointments, date);
        let availability = SlotAvailability::new(&grid, busy);

        assert_eq!(availability.busy_slots, vec![slot(9)]);
        assert_eq!(
            availability.bookable_slots(),
            vec![slot(8), slot(10), slot(13), slot(14), slot(15), slot(16)]
        );
        assert!(!availability.is_bookable(slot(9)));
        assert!(availability.is_bookable(slot(10)));
    }

    #[test]
    fn test_busy_ignores_cancelled_and_other_dates() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let other_date = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
        let appointments = vec![
            make_appointment(9, AppointmentStatus::Cancelled, date),
            make_appointment(10, AppointmentStatus::Pending, other_date),
            make_appointment(14, AppointmentStatus::Completed, date),
        ];

        assert_eq!(busy_slots_on_date(&appointments, date), vec![slot(14)]);
    }

    #[test]
    fn test_busy_deduplicates() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let appointments = vec![
            make_appointment(9, AppointmentStatus::CheckedIn, date),
            make_appointment(9, AppointmentStatus::Pending, date),
        ];

        assert_eq!(busy_slots_on_date(&appointments, date), vec![slot(9)]);
    }

    #[test]
    fn test_partition_is_deterministic() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let appointments = vec![make_appointment(13, AppointmentStatus::CheckedIn, date)];
        let grid = SlotGrid::standard_day();

        let first = SlotAvailability::new(&grid, busy_slots_on_date(&appointments, date));
        let second = SlotAvailability::new(&grid, busy_slots_on_date(&appointments, date));
        assert_eq!(first, second);
    }

    #[test]
    fn test_unselected_state() {
        let grid = SlotGrid::standard_day();
        let availability = SlotAvailability::unselected(&grid);

        assert!(availability.awaiting_selection);
        assert!(availability.busy_slots.is_empty());
        // Nothing is offered until a doctor and date are chosen.
        assert!(!availability.is_bookable(slot(8)));
    }

    #[test]
    fn test_retain_selection_drops_stale_slot() {
        let grid = SlotGrid::standard_day();
        let availability = SlotAvailability::new(&grid, vec![slot(9)]);

        assert_eq!(availability.retain_selection(Some(slot(10))), Some(slot(10)));
        assert_eq!(availability.retain_selection(Some(slot(9))), None);
        assert_eq!(availability.retain_selection(None), None);
    }
}
