use crate::models::BookingDraft;
use crate::{BookingError, BookingResult};
use chrono::NaiveDate;
use nomad_core::validation::ValidationError;
use nomad_shared::PricingBreakdown;
use nomad_store::app_config::BusinessRules;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub nights: u32,
    pub pricing: PricingBreakdown,
}

/// Checkout price calculation.
///
/// `total = base + nightly_rate × nights + fees`, where fees cover each extra
/// traveler and an optional pet, both charged per night.
pub struct PricingEngine {
    rules: BusinessRules,
}

impl PricingEngine {
    pub fn new(rules: BusinessRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &BusinessRules {
        &self.rules
    }

    /// Whole days between the dates, never negative.
    pub fn nights(check_in: NaiveDate, check_out: NaiveDate) -> u32 {
        (check_out - check_in).num_days().max(0) as u32
    }

    /// Fails with a validation error when the amount does not fit the price type.
    pub fn quote(&self, draft: &BookingDraft) -> BookingResult<Quote> {
        let nights = Self::nights(draft.check_in, draft.check_out);
        let base_price = draft.destination.price.unwrap_or(self.rules.default_base_price);
        let accommodation_price = self
            .rules
            .nightly_rate(draft.accommodation)
            .checked_mul(nights)
            .ok_or_else(|| too_large("check_out"))?;

        let extra_travelers = draft.travelers.saturating_sub(1);
        let traveler_fees = extra_travelers
            .checked_mul(self.rules.extra_traveler_per_night)
            .and_then(|fee| fee.checked_mul(nights))
            .ok_or_else(|| too_large("travelers"))?;
        let pet_fees = if draft.pet.is_some() {
            self.rules
                .pet_fee_per_night
                .checked_mul(nights)
                .ok_or_else(|| too_large("check_out"))?
        } else {
            0
        };
        let fees = traveler_fees.checked_add(pet_fees).ok_or_else(|| too_large("travelers"))?;
        let total = base_price
            .checked_add(accommodation_price)
            .and_then(|sum| sum.checked_add(fees))
            .ok_or_else(|| too_large("travelers"))?;

        Ok(Quote {
            nights,
            pricing: PricingBreakdown {
                base_price,
                accommodation_price,
                fees,
                total,
            },
        })
    }
}

fn too_large(field: &str) -> BookingError {
    BookingError::Validation(vec![ValidationError::new(field, "booking total is too large")])
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self::new(BusinessRules::default())
    }
}
