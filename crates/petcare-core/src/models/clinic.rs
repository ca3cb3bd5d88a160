//! Doctor and pet models.

use serde::{Deserialize, Serialize};

/// A veterinarian that can be booked for appointments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Doctor {
    /// Unique doctor ID
    pub id: String,
    /// Display name
    pub full_name: String,
    /// Branch this doctor works at
    pub branch_id: String,
    /// Specialization, if any (None is treated as a general practitioner)
    pub specialization: Option<String>,
    /// Creation timestamp
    pub created_at: String,
}

impl Doctor {
    /// Create a new doctor with required fields.
    pub fn new(full_name: String, branch_id: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            full_name,
            branch_id,
            specialization: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Specialization label used for sorting (unset counts as "General").
    pub fn specialization_label(&self) -> &str {
        self.specialization.as_deref().unwrap_or("General")
    }
}

/// A pet belonging to a customer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pet {
    /// Unique pet ID
    pub id: String,
    /// Owning customer ID
    pub customer_id: String,
    /// Pet name
    pub name: String,
    /// Species (e.g., "dog", "cat", "rabbit")
    pub species: String,
    /// Breed
    pub breed: Option<String>,
    /// Creation timestamp
    pub created_at: String,
}

impl Pet {
    /// Create a new pet with required fields.
    pub fn new(customer_id: String, name: String, species: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            customer_id,
            name,
            species,
            breed: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_doctor() {
        let doctor = Doctor::new("Dr. Alice Tran".into(), "branch-1".into());
        assert_eq!(doctor.full_name, "Dr. Alice Tran");
        assert_eq!(doctor.id.len(), 36); // UUID format
        assert_eq!(doctor.specialization_label(), "General");
    }

    #[test]
    fn test_specialization_label() {
        let mut doctor = Doctor::new("Dr. Bob".into(), "branch-1".into());
        doctor.specialization = Some("Dermatology".into());
        assert_eq!(doctor.specialization_label(), "Dermatology");
    }

    #[test]
    fn test_new_pet() {
        let pet = Pet::new("cust-1".into(), "Max".into(), "dog".into());
        assert_eq!(pet.name, "Max");
        assert_eq!(pet.customer_id, "cust-1");
        assert_eq!(pet.id.len(), 36);
    }
}
