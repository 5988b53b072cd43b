use crate::{BookingError, BookingResult};
use chrono::{DateTime, Utc};
use nomad_core::validation::ValidationError;
use nomad_shared::ids::new_id;
use nomad_shared::{Booking, BookingStatus, ItineraryItem};

/// Edits a booking's activity list in place. Persistence is the caller's job.
pub struct ItineraryPlanner;

impl ItineraryPlanner {
    /// Append a new, not yet completed activity.
    pub fn add(booking: &mut Booking, text: &str, now: DateTime<Utc>) -> BookingResult<ItineraryItem> {
        Self::ensure_modifiable(booking)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(BookingError::Validation(vec![ValidationError::new(
                "text",
                "activity text is required",
            )]));
        }

        let item = ItineraryItem {
            id: new_id(""),
            text: text.to_string(),
            completed: false,
            created_at: now,
        };
        booking.itinerary.push(item.clone());
        Ok(item)
    }

    /// Flip the completed flag; returns the new value.
    pub fn toggle(booking: &mut Booking, activity_id: &str) -> BookingResult<bool> {
        Self::ensure_modifiable(booking)?;
        let item = booking
            .itinerary
            .iter_mut()
            .find(|a| a.id == activity_id)
            .ok_or_else(|| BookingError::ActivityNotFound(activity_id.to_string()))?;
        item.completed = !item.completed;
        Ok(item.completed)
    }

    pub fn remove(booking: &mut Booking, activity_id: &str) -> BookingResult<ItineraryItem> {
        Self::ensure_modifiable(booking)?;
        let index = booking
            .itinerary
            .iter()
            .position(|a| a.id == activity_id)
            .ok_or_else(|| BookingError::ActivityNotFound(activity_id.to_string()))?;
        Ok(booking.itinerary.remove(index))
    }

    /// Drag-and-drop reorder. A target past the end moves the item last.
    pub fn move_item(booking: &mut Booking, from: usize, to: usize) -> BookingResult<()> {
        Self::ensure_modifiable(booking)?;
        let len = booking.itinerary.len();
        if from >= len {
            return Err(BookingError::ActivityNotFound(format!("position {}", from)));
        }
        let item = booking.itinerary.remove(from);
        let to = to.min(len - 1);
        booking.itinerary.insert(to, item);
        Ok(())
    }

    pub fn replace(booking: &mut Booking, items: Vec<ItineraryItem>) -> BookingResult<()> {
        Self::ensure_modifiable(booking)?;
        booking.itinerary = items;
        Ok(())
    }

    /// Cancelled bookings are read-only.
    pub fn ensure_modifiable(booking: &Booking) -> BookingResult<()> {
        if booking.status == BookingStatus::Cancelled {
            return Err(BookingError::NotModifiable {
                id: booking.id.clone(),
                status: booking.status,
            });
        }
        Ok(())
    }
}
