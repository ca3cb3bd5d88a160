//! PetCare Portal Core Library
//!
//! Business core of a multi-branch veterinary clinic portal: appointment
//! scheduling with slot-conflict resolution, and order checkout with
//! loyalty-tier pricing and transactional inventory reservation.
//!
//! # Architecture
//!
//! ```text
//!             Booking UI                      Cart UI
//!                 │                              │
//!         doctor + date picked           items accumulated
//!                 │                              │
//!     ┌───────────▼───────────┐      ┌───────────▼───────────┐
//!     │ Slot Availability     │      │ Pricing & Loyalty     │
//!     │ grid - busy partition │      │ subtotal/tax/discount │
//!     └───────────┬───────────┘      └───────────┬───────────┘
//!                 │                              │
//!         slot selected                   checkout confirmed
//!                 │                              │
//!     ┌───────────▼───────────┐      ┌───────────▼───────────┐
//!     │ Conflict Guard        │      │ One transaction:      │
//!     │ re-check + unique idx │      │ order + stock + tier  │
//!     └───────────┬───────────┘      └───────────┬───────────┘
//!                 │                              │
//!                 └──────────────┬───────────────┘
//!                                ▼
//!                         SQLite database
//! ```
//!
//! # Core invariants
//!
//! - At most one non-cancelled appointment per doctor and slot instant,
//!   enforced both by a submission-time guard and a unique index.
//! - Stock never goes negative and is never partially deducted; a failed
//!   multi-line reservation leaves every quantity untouched.
//! - Loyalty tiers only ever go up.
//!
//! # Modules
//!
//! - [`db`]: SQLite database layer
//! - [`models`]: Domain types (Appointment, Order, LoyaltyAccount, etc.)
//! - [`scheduling`]: Slot grid, availability partition, conflict guard
//! - [`checkout`]: Pricing, loyalty accrual, stock reservation

pub mod checkout;
pub mod db;
pub mod models;
pub mod scheduling;

// Re-export commonly used types
pub use checkout::{CheckoutError, CheckoutReceipt, OrderTotals, StockRequest};
pub use db::Database;
pub use models::{
    Appointment, AppointmentStatus, BookingRequest, Cart, Doctor, LoyaltyAccount, LoyaltyTier,
    Order, Pet, Product, ServiceType,
};
pub use scheduling::{BookingError, SlotAvailability, SlotGrid};

use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, NaiveTime};

use checkout::CheckoutDesk;
use scheduling::BookingDesk;

// =========================================================================
// Portal Error Type
// =========================================================================

/// Top-level error for portal operations.
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    #[error("Database error: {0}")]
    Database(#[from] db::DbError),

    #[error("Booking error: {0}")]
    Booking(#[from] BookingError),

    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    #[error("Lock poisoned: {0}")]
    Lock(String),
}

impl<T> From<std::sync::PoisonError<T>> for PortalError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        PortalError::Lock(e.to_string())
    }
}

// =========================================================================
// Factory Functions
// =========================================================================

/// Open or create a portal database at the given path.
pub fn open_portal(path: &str) -> Result<Arc<ClinicPortal>, PortalError> {
    let db = Database::open(path)?;
    Ok(Arc::new(ClinicPortal {
        db: Arc::new(Mutex::new(db)),
    }))
}

/// Create an in-memory portal (for testing).
pub fn open_portal_in_memory() -> Result<Arc<ClinicPortal>, PortalError> {
    let db = Database::open_in_memory()?;
    Ok(Arc::new(ClinicPortal {
        db: Arc::new(Mutex::new(db)),
    }))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe portal facade consumed by the UI layer.
///
/// Every operation takes the database mutex for its full duration, so the
/// read-modify-write sequences on shared state (loyalty accounts, stock)
/// are exclusive per process. The schema-level slot index and the checkout
/// transaction keep the critical invariants even across processes sharing
/// one database file.
pub struct ClinicPortal {
    db: Arc<Mutex<Database>>,
}

impl ClinicPortal {
    // =========================================================================
    // Clinic Records
    // =========================================================================

    /// Register a doctor.
    pub fn register_doctor(&self, doctor: &Doctor) -> Result<(), PortalError> {
        let db = self.db.lock()?;
        db.insert_doctor(doctor)?;
        Ok(())
    }

    /// List bookable doctors for a branch, specialists first.
    pub fn doctors_for_branch(&self, branch_id: &str) -> Result<Vec<Doctor>, PortalError> {
        let db = self.db.lock()?;
        Ok(db.list_doctors_for_branch(branch_id)?)
    }

    /// Register a pet.
    pub fn register_pet(&self, pet: &Pet) -> Result<(), PortalError> {
        let db = self.db.lock()?;
        db.insert_pet(pet)?;
        Ok(())
    }

    /// List a customer's pets.
    pub fn pets_for_customer(&self, customer_id: &str) -> Result<Vec<Pet>, PortalError> {
        let db = self.db.lock()?;
        Ok(db.list_pets_for_customer(customer_id)?)
    }

    /// Add or update a product.
    pub fn upsert_product(&self, product: &Product) -> Result<(), PortalError> {
        let db = self.db.lock()?;
        db.upsert_product(product)?;
        Ok(())
    }

    /// List products stocked at a branch.
    pub fn products_for_branch(&self, branch_id: &str) -> Result<Vec<Product>, PortalError> {
        let db = self.db.lock()?;
        Ok(db.list_products_for_branch(branch_id)?)
    }

    /// List products at or below their reorder level at a branch.
    pub fn low_stock_products(&self, branch_id: &str) -> Result<Vec<Product>, PortalError> {
        let db = self.db.lock()?;
        Ok(db.list_low_stock_products(branch_id)?)
    }

    // =========================================================================
    // Scheduling Operations
    // =========================================================================

    /// Compute the bookable/busy slot partition for a doctor and date.
    pub fn bookable_slots(
        &self,
        doctor_id: Option<&str>,
        date: Option<NaiveDate>,
    ) -> Result<SlotAvailability, PortalError> {
        let db = self.db.lock()?;
        let desk = BookingDesk::new(&db);
        Ok(desk.availability(doctor_id, date)?)
    }

    /// Validate and persist a booking submission.
    pub fn submit_booking(&self, request: &BookingRequest) -> Result<Appointment, PortalError> {
        let db = self.db.lock()?;
        let desk = BookingDesk::new(&db);
        Ok(desk.submit(request)?)
    }

    /// Cancel an appointment.
    pub fn cancel_appointment(&self, appointment_id: &str) -> Result<Appointment, PortalError> {
        let db = self.db.lock()?;
        let desk = BookingDesk::new(&db);
        Ok(desk.cancel(appointment_id)?)
    }

    /// Move an appointment to a new doctor and/or slot.
    pub fn reschedule_appointment(
        &self,
        appointment_id: &str,
        doctor_id: &str,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<Appointment, PortalError> {
        let db = self.db.lock()?;
        let desk = BookingDesk::new(&db);
        Ok(desk.reschedule(appointment_id, doctor_id, date, time)?)
    }

    /// A customer's appointments, newest visit first.
    pub fn appointments_for_customer(
        &self,
        customer_id: &str,
    ) -> Result<Vec<Appointment>, PortalError> {
        let db = self.db.lock()?;
        let desk = BookingDesk::new(&db);
        Ok(desk.appointments_for_customer(customer_id)?)
    }

    // =========================================================================
    // Checkout Operations
    // =========================================================================

    /// Price a cart without placing an order.
    pub fn preview_totals(&self, customer_id: &str, cart: &Cart) -> Result<OrderTotals, PortalError> {
        let mut db = self.db.lock()?;
        let desk = CheckoutDesk::new(&mut db);
        Ok(desk.preview(customer_id, cart)?)
    }

    /// Place an order from the cart; clears the cart on success.
    pub fn checkout(
        &self,
        customer_id: &str,
        branch_id: &str,
        cart: &mut Cart,
    ) -> Result<CheckoutReceipt, PortalError> {
        let mut db = self.db.lock()?;
        let mut desk = CheckoutDesk::new(&mut db);
        Ok(desk.checkout(customer_id, branch_id, cart)?)
    }

    /// Deduct stock for a confirmed sale, all lines or none.
    pub fn reserve_stock(
        &self,
        branch_id: &str,
        items: &[StockRequest],
    ) -> Result<(), PortalError> {
        let mut db = self.db.lock()?;
        checkout::reserve_stock(&mut db, branch_id, items)?;
        Ok(())
    }

    /// A customer's loyalty account, if one exists yet.
    pub fn loyalty_account(&self, customer_id: &str) -> Result<Option<LoyaltyAccount>, PortalError> {
        let db = self.db.lock()?;
        Ok(db.get_loyalty_for_customer(customer_id)?)
    }

    /// A customer's orders, newest first.
    pub fn orders_for_customer(&self, customer_id: &str) -> Result<Vec<Order>, PortalError> {
        let db = self.db.lock()?;
        Ok(db.list_orders_for_customer(customer_id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portal_booking_roundtrip() {
        let portal = open_portal_in_memory().unwrap();

        let doctor = Doctor::new("Dr. A".into(), "branch-1".into());
        let pet = Pet::new("cust-1".into(), "Max".into(), "dog".into());
        portal.register_doctor(&doctor).unwrap();
        portal.register_pet(&pet).unwrap();

        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let time = NaiveTime::from_hms_opt(9, 0, 0).unwrap();

        let request = BookingRequest {
            pet_id: pet.id.clone(),
            customer_id: "cust-1".into(),
            branch_id: "branch-1".into(),
            doctor_id: doctor.id.clone(),
            service_type: Some(ServiceType::MedicalExam),
            date: Some(date),
            time: Some(time),
            reason: String::new(),
            notes: None,
        };

        let appointment = portal.submit_booking(&request).unwrap();

        let availability = portal
            .bookable_slots(Some(&doctor.id), Some(date))
            .unwrap();
        assert_eq!(availability.busy_slots, vec![time]);

        let listed = portal.appointments_for_customer("cust-1").unwrap();
        assert_eq!(listed, vec![appointment]);
    }

    #[test]
    fn test_portal_checkout_roundtrip() {
        let portal = open_portal_in_memory().unwrap();

        let mut product = Product::new("FOOD-01".into(), "Dry food".into(), 250_000.0, "branch-1".into());
        product.stock = 10;
        portal.upsert_product(&product).unwrap();

        let mut cart = Cart::new();
        cart.add_item(&product.id, 2);

        let receipt = portal.checkout("cust-1", "branch-1", &mut cart).unwrap();
        assert!(cart.is_empty());

        let account = portal.loyalty_account("cust-1").unwrap().unwrap();
        assert_eq!(account.total_spent, receipt.order.total);

        let orders = portal.orders_for_customer("cust-1").unwrap();
        assert_eq!(orders.len(), 1);
    }
}
