use crate::itinerary::ItineraryPlanner;
use crate::models::BookingDraft;
use crate::payment::{PaymentDetails, PAYMENT_METHOD_CARD};
use crate::pricing::{PricingEngine, Quote};
use crate::{BookingError, BookingResult};
use nomad_core::{
    keys, AuthProvider, Clock, EventBus, InFlightGuard, JsonStoreExt, KeyValueStore,
};
use nomad_shared::ids::new_id;
use nomad_shared::{Booking, BookingStatus, ItineraryItem, StoreEvent};
use nomad_store::app_config::BusinessRules;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Reservation records in the global `bookings` array, always filtered by owner email.
pub struct BookingStore {
    store: Arc<dyn KeyValueStore>,
    auth: Arc<dyn AuthProvider>,
    events: Arc<EventBus>,
    clock: Arc<dyn Clock>,
    pricing: PricingEngine,
    guard: InFlightGuard,
}

impl BookingStore {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        auth: Arc<dyn AuthProvider>,
        events: Arc<EventBus>,
        clock: Arc<dyn Clock>,
        rules: BusinessRules,
    ) -> Self {
        Self {
            store,
            auth,
            events,
            clock,
            pricing: PricingEngine::new(rules),
            guard: InFlightGuard::new(),
        }
    }

    /// Price a draft without booking it.
    pub fn quote(&self, draft: &BookingDraft) -> BookingResult<Quote> {
        self.validate_draft(draft)?;
        self.pricing.quote(draft)
    }

    /// Validate the card, then create the booking. Card data is not stored.
    pub fn checkout(&self, draft: BookingDraft, payment: &PaymentDetails) -> BookingResult<Booking> {
        self.auth.require_session("checkout")?;
        let errors = payment.validate(self.clock.today());
        if !errors.is_empty() {
            return Err(BookingError::Validation(errors));
        }
        debug!("Card ending {} accepted", payment.last_four());
        self.create(draft)
    }

    /// Record a new upcoming booking owned by the logged-in user.
    pub fn create(&self, draft: BookingDraft) -> BookingResult<Booking> {
        let session = self.auth.require_session("create booking")?;
        self.validate_draft(&draft)?;
        let _token = self.guard.try_acquire(&format!("create:{}", session.email))?;

        let quote = self.pricing.quote(&draft)?;
        let (has_pet, pet_type, pet_weight) = match draft.pet {
            Some(pet) => (true, Some(pet.kind), Some(pet.weight_kg)),
            None => (false, None, None),
        };
        let booking = Booking {
            id: new_id("BK"),
            user_id: session.email.clone(),
            destination: draft.destination,
            travelers: draft.travelers,
            check_in: draft.check_in,
            check_out: draft.check_out,
            nights: quote.nights,
            accommodation: draft.accommodation,
            special_requests: draft.special_requests,
            has_pet,
            pet_type,
            pet_weight,
            pricing: quote.pricing,
            status: BookingStatus::Upcoming,
            created_at: self.clock.now(),
            cancelled_at: None,
            payment_method: PAYMENT_METHOD_CARD.to_string(),
            itinerary: Vec::new(),
        };

        let mut bookings = self.load_all()?;
        bookings.push(booking.clone());
        self.store.save_json(keys::BOOKINGS, &bookings)?;

        info!(
            "Booking {} created for {} ({} nights, total {})",
            booking.id, booking.user_id, booking.nights, booking.pricing.total
        );
        self.events.publish(StoreEvent::BookingCreated {
            booking_id: booking.id.clone(),
            user_id: booking.user_id.clone(),
        });
        Ok(booking)
    }

    /// The owner's non-cancelled bookings. Upcoming bookings whose checkout has
    /// passed are relabeled past and written back.
    pub fn list_by_owner(&self, email: &str) -> BookingResult<Vec<Booking>> {
        let mut bookings = self.load_all()?;
        let today = self.clock.today();
        let mut changed = Vec::new();
        for booking in bookings.iter_mut().filter(|b| b.is_owned_by(email)) {
            if booking.refresh_status(today) {
                changed.push(booking.id.clone());
            }
        }

        if !changed.is_empty() {
            self.store.save_json(keys::BOOKINGS, &bookings)?;
            debug!("Relabeled {} booking(s) as past for {}", changed.len(), email);
            for booking_id in changed {
                self.events.publish(StoreEvent::BookingStatusChanged {
                    booking_id,
                    from: BookingStatus::Upcoming,
                    to: BookingStatus::Past,
                });
            }
        }

        Ok(bookings
            .into_iter()
            .filter(|b| b.is_owned_by(email) && b.status != BookingStatus::Cancelled)
            .collect())
    }

    /// A single booking, `NotFound` if absent and `Forbidden` if someone else's.
    pub fn get(&self, id: &str, email: &str) -> BookingResult<Booking> {
        let bookings = self.load_all()?;
        let mut booking = find_owned(&bookings, id, email)?.clone();
        // Read-only view; list_by_owner persists the relabel
        booking.refresh_status(self.clock.today());
        Ok(booking)
    }

    pub fn count_upcoming(&self, email: &str) -> BookingResult<usize> {
        Ok(self
            .list_by_owner(email)?
            .iter()
            .filter(|b| b.status == BookingStatus::Upcoming)
            .count())
    }

    /// Soft-cancel: the record stays with status `cancelled` and drops out of
    /// `list_by_owner`. Only upcoming bookings can be cancelled.
    pub fn cancel(&self, id: &str, email: &str) -> BookingResult<Booking> {
        let now = self.clock.now();
        let (_, booking) = self.mutate(id, email, |booking, events| {
            if booking.status != BookingStatus::Upcoming {
                return Err(BookingError::InvalidTransition {
                    from: booking.status,
                    to: BookingStatus::Cancelled,
                });
            }
            booking.cancel(now);
            events.push(StoreEvent::BookingStatusChanged {
                booking_id: booking.id.clone(),
                from: BookingStatus::Upcoming,
                to: BookingStatus::Cancelled,
            });
            Ok(())
        })?;
        info!("Booking {} cancelled by {}", id, email);
        Ok(booking)
    }

    /// Remove the record entirely.
    pub fn delete(&self, id: &str, email: &str) -> BookingResult<()> {
        let _token = self.guard.try_acquire(&booking_key(id))?;
        let mut bookings = self.load_all()?;
        find_owned(&bookings, id, email)?;
        bookings.retain(|b| b.id != id);
        self.store.save_json(keys::BOOKINGS, &bookings)?;

        info!("Booking {} deleted by {}", id, email);
        self.events.publish(StoreEvent::BookingDeleted {
            booking_id: id.to_string(),
        });
        Ok(())
    }

    /// Replace the itinerary wholesale.
    pub fn update_itinerary(&self, id: &str, email: &str, items: Vec<ItineraryItem>) -> BookingResult<Booking> {
        let (_, booking) = self.mutate(id, email, |booking, events| {
            ItineraryPlanner::replace(booking, items)?;
            events.push(itinerary_event(booking));
            Ok(())
        })?;
        Ok(booking)
    }

    pub fn add_activity(&self, id: &str, email: &str, text: &str) -> BookingResult<ItineraryItem> {
        let now = self.clock.now();
        let (item, _) = self.mutate(id, email, |booking, events| {
            let item = ItineraryPlanner::add(booking, text, now)?;
            events.push(itinerary_event(booking));
            Ok(item)
        })?;
        Ok(item)
    }

    /// Returns the activity's new completed flag.
    pub fn toggle_activity(&self, id: &str, email: &str, activity_id: &str) -> BookingResult<bool> {
        let (completed, _) = self.mutate(id, email, |booking, events| {
            let completed = ItineraryPlanner::toggle(booking, activity_id)?;
            events.push(itinerary_event(booking));
            Ok(completed)
        })?;
        Ok(completed)
    }

    pub fn remove_activity(&self, id: &str, email: &str, activity_id: &str) -> BookingResult<()> {
        self.mutate(id, email, |booking, events| {
            ItineraryPlanner::remove(booking, activity_id)?;
            events.push(itinerary_event(booking));
            Ok(())
        })?;
        Ok(())
    }

    pub fn move_activity(&self, id: &str, email: &str, from: usize, to: usize) -> BookingResult<()> {
        self.mutate(id, email, |booking, events| {
            ItineraryPlanner::move_item(booking, from, to)?;
            events.push(itinerary_event(booking));
            Ok(())
        })?;
        Ok(())
    }

    /// Guarded read-modify-write of one owned booking. Events collected by `f`
    /// are published after the write, while the booking is still guarded.
    fn mutate<T, F>(&self, id: &str, email: &str, f: F) -> BookingResult<(T, Booking)>
    where
        F: FnOnce(&mut Booking, &mut Vec<StoreEvent>) -> BookingResult<T>,
    {
        let _token = self.guard.try_acquire(&booking_key(id))?;
        let mut bookings = self.load_all()?;
        let booking = find_owned_mut(&mut bookings, id, email)?;

        let mut events = Vec::new();
        if booking.refresh_status(self.clock.today()) {
            events.push(StoreEvent::BookingStatusChanged {
                booking_id: booking.id.clone(),
                from: BookingStatus::Upcoming,
                to: BookingStatus::Past,
            });
        }
        let out = f(booking, &mut events)?;
        let updated = booking.clone();

        self.store.save_json(keys::BOOKINGS, &bookings)?;
        for event in events {
            self.events.publish(event);
        }
        Ok((out, updated))
    }

    fn validate_draft(&self, draft: &BookingDraft) -> BookingResult<()> {
        let errors = draft.validate(self.clock.today());
        if errors.is_empty() {
            Ok(())
        } else {
            Err(BookingError::Validation(errors))
        }
    }

    fn load_all(&self) -> BookingResult<Vec<Booking>> {
        Ok(self.store.load_json(keys::BOOKINGS)?)
    }
}

fn booking_key(id: &str) -> String {
    format!("booking:{}", id)
}

fn itinerary_event(booking: &Booking) -> StoreEvent {
    StoreEvent::ItineraryUpdated {
        booking_id: booking.id.clone(),
        items: booking.itinerary.len(),
    }
}

fn find_owned<'a>(bookings: &'a [Booking], id: &str, email: &str) -> BookingResult<&'a Booking> {
    let booking = bookings
        .iter()
        .find(|b| b.id == id)
        .ok_or_else(|| BookingError::NotFound(id.to_string()))?;
    if !booking.is_owned_by(email) {
        warn!("{} tried to access booking {} owned by someone else", email, id);
        return Err(BookingError::Forbidden(id.to_string()));
    }
    Ok(booking)
}

fn find_owned_mut<'a>(bookings: &'a mut [Booking], id: &str, email: &str) -> BookingResult<&'a mut Booking> {
    let booking = bookings
        .iter_mut()
        .find(|b| b.id == id)
        .ok_or_else(|| BookingError::NotFound(id.to_string()))?;
    if !booking.is_owned_by(email) {
        warn!("{} tried to modify booking {} owned by someone else", email, id);
        return Err(BookingError::Forbidden(id.to_string()));
    }
    Ok(booking)
}
