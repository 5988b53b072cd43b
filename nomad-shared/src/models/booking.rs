use crate::models::destination::DestinationSnapshot;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Booking status in the lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Upcoming,
    Past,
    Cancelled,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BookingStatus::Upcoming => "upcoming",
            BookingStatus::Past => "past",
            BookingStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Accommodation tier chosen at checkout
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Accommodation {
    #[serde(rename = "hostel")]
    Hostel,
    #[serde(rename = "hotel-3")]
    Hotel3,
    #[default]
    #[serde(rename = "hotel-4")]
    Hotel4,
    #[serde(rename = "hotel-5")]
    Hotel5,
}

impl Accommodation {
    pub fn label(&self) -> &'static str {
        match self {
            Accommodation::Hostel => "Hostel",
            Accommodation::Hotel3 => "Hotel 3★",
            Accommodation::Hotel4 => "Hotel 4★",
            Accommodation::Hotel5 => "Hotel 5★",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetInfo {
    pub kind: String,
    pub weight_kg: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingBreakdown {
    pub base_price: u32,
    pub accommodation_price: u32,
    pub fees: u32,
    pub total: u32,
}

/// One planned activity on a booking's itinerary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryItem {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// A reservation record. Stored in the global `bookings` array and owned by `user_id` (an email).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub user_id: String,
    pub destination: DestinationSnapshot,
    pub travelers: u32,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: u32,
    #[serde(default)]
    pub accommodation: Accommodation,
    #[serde(default)]
    pub special_requests: String,
    #[serde(default)]
    pub has_pet: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pet_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pet_weight: Option<u32>,
    pub pricing: PricingBreakdown,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub itinerary: Vec<ItineraryItem>,
}

impl Booking {
    pub fn is_owned_by(&self, email: &str) -> bool {
        self.user_id == email
    }

    pub fn pet(&self) -> Option<PetInfo> {
        if !self.has_pet {
            return None;
        }
        Some(PetInfo {
            kind: self.pet_type.clone().unwrap_or_default(),
            weight_kg: self.pet_weight.unwrap_or(0),
        })
    }

    /// Relabel an upcoming booking whose checkout is before `today` as past.
    /// Returns true if the status changed.
    pub fn refresh_status(&mut self, today: NaiveDate) -> bool {
        if self.status == BookingStatus::Upcoming && self.check_out < today {
            self.status = BookingStatus::Past;
            return true;
        }
        false
    }

    pub fn cancel(&mut self, at: DateTime<Utc>) {
        self.status = BookingStatus::Cancelled;
        self.cancelled_at = Some(at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Booking {
        Booking {
            id: "BK1".to_string(),
            user_id: "alice@example.com".to_string(),
            destination: DestinationSnapshot::new("paris-francia", "París", "Francia"),
            travelers: 2,
            check_in: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2025, 6, 5).unwrap(),
            nights: 4,
            accommodation: Accommodation::Hotel4,
            special_requests: String::new(),
            has_pet: false,
            pet_type: None,
            pet_weight: None,
            pricing: PricingBreakdown::default(),
            status: BookingStatus::Upcoming,
            created_at: Utc::now(),
            cancelled_at: None,
            payment_method: "credit-card".to_string(),
            itinerary: vec![],
        }
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["userId"], "alice@example.com");
        assert_eq!(json["checkIn"], "2025-06-01");
        assert_eq!(json["status"], "upcoming");
        assert_eq!(json["accommodation"], "hotel-4");
        assert_eq!(json["paymentMethod"], "credit-card");
    }

    #[test]
    fn test_refresh_status() {
        let mut b = sample();

        // Checkout day itself is still upcoming
        assert!(!b.refresh_status(NaiveDate::from_ymd_opt(2025, 6, 5).unwrap()));
        assert_eq!(b.status, BookingStatus::Upcoming);

        assert!(b.refresh_status(NaiveDate::from_ymd_opt(2025, 6, 6).unwrap()));
        assert_eq!(b.status, BookingStatus::Past);

        // Cancelled bookings never become past
        let mut c = sample();
        c.cancel(Utc::now());
        assert!(!c.refresh_status(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()));
    }

    #[test]
    fn test_legacy_record_without_itinerary() {
        let json = r#"{
            "id": "BK12345678",
            "userId": "demo@nomadtrails.com",
            "destination": {"id": "tokio-japon", "name": "Tokio", "country": "Japón", "price": 1200},
            "travelers": 1,
            "checkIn": "2025-03-01",
            "checkOut": "2025-03-04",
            "nights": 3,
            "accommodation": "hostel",
            "hasPet": true,
            "petType": "dog",
            "petWeight": 12,
            "pricing": {"basePrice": 1200, "accommodationPrice": 150, "fees": 75, "total": 1425},
            "status": "past",
            "createdAt": "2025-02-01T10:00:00Z"
        }"#;
        let b: Booking = serde_json::from_str(json).unwrap();
        assert!(b.itinerary.is_empty());
        assert_eq!(b.accommodation, Accommodation::Hostel);
        assert_eq!(b.pet().unwrap().weight_kg, 12);
    }
}
