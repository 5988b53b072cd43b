use chrono::NaiveDate;
use nomad_core::validation::ValidationError;
use nomad_shared::{Accommodation, DestinationSnapshot, PetInfo};
use serde::{Deserialize, Serialize};

/// Everything the checkout wizard collects before payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingDraft {
    pub destination: DestinationSnapshot,
    pub travelers: u32,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[serde(default)]
    pub accommodation: Accommodation,
    #[serde(default)]
    pub special_requests: String,
    #[serde(default)]
    pub pet: Option<PetInfo>,
}

impl BookingDraft {
    pub fn new(destination: DestinationSnapshot, check_in: NaiveDate, check_out: NaiveDate) -> Self {
        Self {
            destination,
            travelers: 1,
            check_in,
            check_out,
            accommodation: Accommodation::default(),
            special_requests: String::new(),
            pet: None,
        }
    }

    pub fn with_travelers(mut self, travelers: u32) -> Self {
        self.travelers = travelers;
        self
    }

    pub fn with_accommodation(mut self, accommodation: Accommodation) -> Self {
        self.accommodation = accommodation;
        self
    }

    pub fn with_pet(mut self, kind: &str, weight_kg: u32) -> Self {
        self.pet = Some(PetInfo {
            kind: kind.to_string(),
            weight_kg,
        });
        self
    }

    pub fn validate(&self, today: NaiveDate) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if self.destination.id.trim().is_empty() {
            errors.push(ValidationError::new("destination", "destination is required"));
        }
        if self.travelers == 0 {
            errors.push(ValidationError::new("travelers", "at least one traveler"));
        }
        if self.check_in < today {
            errors.push(ValidationError::new("check_in", "check-in cannot be in the past"));
        }
        if self.check_out <= self.check_in {
            errors.push(ValidationError::new("check_out", "check-out must be after check-in"));
        }
        if let Some(pet) = &self.pet {
            if pet.kind.trim().is_empty() {
                errors.push(ValidationError::new("pet_type", "pet type is required"));
            }
            if pet.weight_kg == 0 {
                errors.push(ValidationError::new("pet_weight", "pet weight is required"));
            }
        }
        errors
    }
}
