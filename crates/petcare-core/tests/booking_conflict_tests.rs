//! End-to-end booking scenarios through the portal facade.

use chrono::{NaiveDate, NaiveTime, Timelike};

use petcare_core::{
    open_portal_in_memory, BookingError, BookingRequest, Doctor, Pet, PortalError, ServiceType,
};

fn slot(hour: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, 0, 0).unwrap()
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

struct Clinic {
    portal: std::sync::Arc<petcare_core::ClinicPortal>,
    doctor: Doctor,
    pet: Pet,
}

fn setup_clinic() -> Clinic {
    let portal = open_portal_in_memory().unwrap();

    let doctor = Doctor::new("Dr. Alice Tran".into(), "branch-1".into());
    let pet = Pet::new("cust-1".into(), "Max".into(), "dog".into());
    portal.register_doctor(&doctor).unwrap();
    portal.register_pet(&pet).unwrap();

    Clinic { portal, doctor, pet }
}

fn booking_at(clinic: &Clinic, hour: u32) -> BookingRequest {
    BookingRequest {
        pet_id: clinic.pet.id.clone(),
        customer_id: clinic.pet.customer_id.clone(),
        branch_id: clinic.doctor.branch_id.clone(),
        doctor_id: clinic.doctor.id.clone(),
        service_type: Some(ServiceType::MedicalExam),
        date: Some(date()),
        time: Some(slot(hour)),
        reason: String::new(),
        notes: None,
    }
}

#[test]
fn busy_slot_partitions_the_grid() {
    // Grid [08,09,10,13,14,15,16] with 09:00 taken leaves the other six.
    let clinic = setup_clinic();
    clinic.portal.submit_booking(&booking_at(&clinic, 9)).unwrap();

    let availability = clinic
        .portal
        .bookable_slots(Some(&clinic.doctor.id), Some(date()))
        .unwrap();

    assert_eq!(availability.busy_slots, vec![slot(9)]);

    let bookable: Vec<u32> = availability
        .bookable_slots()
        .iter()
        .map(|t| t.hour())
        .collect();
    assert_eq!(bookable, vec![8, 10, 13, 14, 15, 16]);
}

#[test]
fn availability_is_idempotent() {
    let clinic = setup_clinic();
    clinic.portal.submit_booking(&booking_at(&clinic, 13)).unwrap();

    let first = clinic
        .portal
        .bookable_slots(Some(&clinic.doctor.id), Some(date()))
        .unwrap();
    let second = clinic
        .portal
        .bookable_slots(Some(&clinic.doctor.id), Some(date()))
        .unwrap();

    assert_eq!(first, second);
}

#[test]
fn second_submission_for_same_slot_conflicts() {
    // Two submissions for the same doctor/date/time, the second validated
    // after the first's write lands: first wins, second gets a conflict.
    let clinic = setup_clinic();

    let first = clinic.portal.submit_booking(&booking_at(&clinic, 9));
    assert!(first.is_ok());

    let second = clinic.portal.submit_booking(&booking_at(&clinic, 9));
    match second {
        Err(PortalError::Booking(BookingError::Conflict { slot: s, .. })) => {
            assert_eq!(s, slot(9));
        }
        other => panic!("expected conflict, got {:?}", other.map(|a| a.id)),
    }
}

#[test]
fn no_double_booking_across_many_submissions() {
    // Submit every slot twice; each slot must end up booked exactly once.
    let clinic = setup_clinic();

    for hour in [8, 9, 10, 13, 14, 15, 16] {
        let _ = clinic.portal.submit_booking(&booking_at(&clinic, hour));
        let _ = clinic.portal.submit_booking(&booking_at(&clinic, hour));
    }

    let appointments = clinic
        .portal
        .appointments_for_customer(&clinic.pet.customer_id)
        .unwrap();

    let mut times: Vec<NaiveTime> = appointments
        .iter()
        .filter(|a| a.status.occupies_slot() && a.scheduled_date() == date())
        .map(|a| a.slot_time())
        .collect();
    let before_dedup = times.len();
    times.sort();
    times.dedup();

    assert_eq!(before_dedup, 7, "one live booking per grid slot");
    assert_eq!(times.len(), before_dedup, "no duplicated slot time");
}

#[test]
fn stale_selection_is_cleared_and_rejected() {
    let clinic = setup_clinic();

    // A user loads the grid and selects 09:00.
    let availability = clinic
        .portal
        .bookable_slots(Some(&clinic.doctor.id), Some(date()))
        .unwrap();
    let selection = availability.retain_selection(Some(slot(9)));
    assert_eq!(selection, Some(slot(9)));

    // Another booking lands first.
    clinic.portal.submit_booking(&booking_at(&clinic, 9)).unwrap();

    // On recompute the selection is dropped, and resubmitting it anyway
    // is rejected.
    let availability = clinic
        .portal
        .bookable_slots(Some(&clinic.doctor.id), Some(date()))
        .unwrap();
    assert_eq!(availability.retain_selection(selection), None);
    assert!(matches!(
        clinic.portal.submit_booking(&booking_at(&clinic, 9)),
        Err(PortalError::Booking(BookingError::Conflict { .. }))
    ));
}

#[test]
fn unset_doctor_or_date_awaits_selection() {
    let clinic = setup_clinic();

    let availability = clinic.portal.bookable_slots(None, None).unwrap();
    assert!(availability.awaiting_selection);
    assert!(availability.busy_slots.is_empty());

    let availability = clinic
        .portal
        .bookable_slots(Some(&clinic.doctor.id), None)
        .unwrap();
    assert!(availability.awaiting_selection);
}

#[test]
fn cancelling_frees_the_slot_for_rebooking() {
    let clinic = setup_clinic();

    let appointment = clinic.portal.submit_booking(&booking_at(&clinic, 9)).unwrap();
    clinic.portal.cancel_appointment(&appointment.id).unwrap();

    // The cancelled appointment no longer blocks the grid.
    let availability = clinic
        .portal
        .bookable_slots(Some(&clinic.doctor.id), Some(date()))
        .unwrap();
    assert!(availability.is_bookable(slot(9)));

    clinic.portal.submit_booking(&booking_at(&clinic, 9)).unwrap();

    // The record survives as cancelled rather than disappearing.
    let appointments = clinic
        .portal
        .appointments_for_customer(&clinic.pet.customer_id)
        .unwrap();
    assert_eq!(appointments.len(), 2);
}

#[test]
fn different_doctors_do_not_conflict() {
    let clinic = setup_clinic();

    let other_doctor = Doctor::new("Dr. Bob".into(), "branch-1".into());
    clinic.portal.register_doctor(&other_doctor).unwrap();

    clinic.portal.submit_booking(&booking_at(&clinic, 9)).unwrap();

    let mut request = booking_at(&clinic, 9);
    request.doctor_id = other_doctor.id.clone();
    clinic.portal.submit_booking(&request).unwrap();
}

#[test]
fn bookings_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clinic.db");
    let path = path.to_str().unwrap();

    let doctor = Doctor::new("Dr. A".into(), "branch-1".into());
    let pet = Pet::new("cust-1".into(), "Max".into(), "dog".into());

    {
        let portal = petcare_core::open_portal(path).unwrap();
        portal.register_doctor(&doctor).unwrap();
        portal.register_pet(&pet).unwrap();

        let request = BookingRequest {
            pet_id: pet.id.clone(),
            customer_id: pet.customer_id.clone(),
            branch_id: doctor.branch_id.clone(),
            doctor_id: doctor.id.clone(),
            service_type: Some(ServiceType::SingleVaccine),
            date: Some(date()),
            time: Some(slot(14)),
            reason: String::new(),
            notes: None,
        };
        portal.submit_booking(&request).unwrap();
    }

    let reopened = petcare_core::open_portal(path).unwrap();
    let availability = reopened
        .bookable_slots(Some(&doctor.id), Some(date()))
        .unwrap();
    assert_eq!(availability.busy_slots, vec![slot(14)]);
}
