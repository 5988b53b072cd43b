use chrono::{Datelike, NaiveDate};
use nomad_core::validation::ValidationError;
use nomad_shared::Masked;
use serde::Deserialize;

/// Recorded on the booking in place of any card data.
pub const PAYMENT_METHOD_CARD: &str = "credit-card";

const CARD_LENGTHS: [usize; 4] = [13, 15, 16, 19];

/// Card details from the payment step. Validated, then dropped: never persisted.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentDetails {
    pub holder: String,
    pub card_number: Masked<String>,
    /// `MM/YY`
    pub expiry: String,
    pub cvv: Masked<String>,
}

impl PaymentDetails {
    pub fn new(holder: &str, card_number: &str, expiry: &str, cvv: &str) -> Self {
        Self {
            holder: holder.to_string(),
            card_number: Masked(card_number.to_string()),
            expiry: expiry.to_string(),
            cvv: Masked(cvv.to_string()),
        }
    }

    fn digits(&self) -> String {
        self.card_number.expose().chars().filter(|c| !c.is_whitespace()).collect()
    }

    pub fn last_four(&self) -> String {
        let digits = self.digits();
        let skip = digits.chars().count().saturating_sub(4);
        digits.chars().skip(skip).collect()
    }

    pub fn validate(&self, today: NaiveDate) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.holder.trim().chars().count() < 3 {
            errors.push(ValidationError::new("holder", "card holder needs at least 3 characters"));
        }

        let digits = self.digits();
        if !digits.chars().all(|c| c.is_ascii_digit()) || !CARD_LENGTHS.contains(&digits.len()) {
            errors.push(ValidationError::new("card_number", "card number must have 13, 15, 16 or 19 digits"));
        }

        match parse_expiry(&self.expiry) {
            None => errors.push(ValidationError::new("expiry", "expiry must be MM/YY")),
            Some((year, month)) if (year, month) < (today.year(), today.month()) => {
                errors.push(ValidationError::new("expiry", "card has expired"))
            }
            Some(_) => {}
        }

        let cvv = self.cvv.expose();
        if cvv.len() != 3 || !cvv.chars().all(|c| c.is_ascii_digit()) {
            errors.push(ValidationError::new("cvv", "CVV must be 3 digits"));
        }

        errors
    }
}

/// `"07/27"` → `(2027, 7)`.
fn parse_expiry(expiry: &str) -> Option<(i32, u32)> {
    let (mm, yy) = expiry.trim().split_once('/')?;
    if mm.len() != 2 || yy.len() != 2 {
        return None;
    }
    let month: u32 = mm.parse().ok()?;
    let year: i32 = yy.parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }
    Some((2000 + year, month))
}
