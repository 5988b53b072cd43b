use crate::{SocialError, SocialResult};
use nomad_core::validation::ValidationError;
use nomad_core::{keys, AuthProvider, Clock, EventBus, InFlightGuard, JsonStoreExt, KeyValueStore};
use nomad_shared::ids::new_id;
use nomad_shared::{Review, Session, StoreEvent};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

type ReviewsByDestination = BTreeMap<String, Vec<Review>>;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// Mean rating to one decimal place; 0.0 when there are no reviews.
pub fn average(reviews: &[Review]) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }
    let sum: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
    let mean = f64::from(sum) / reviews.len() as f64;
    (mean * 10.0).round() / 10.0
}

fn validate(rating: u8, comment: &str) -> SocialResult<()> {
    let mut errors = Vec::new();
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        errors.push(ValidationError::new("rating", "rating must be between 1 and 5"));
    }
    if comment.trim().is_empty() {
        errors.push(ValidationError::new("comment", "comment is required"));
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(SocialError::Validation(errors))
    }
}

/// Reviews grouped by destination id under `destinationReviews`.
/// At most one review per (user, destination).
pub struct ReviewsStore {
    store: Arc<dyn KeyValueStore>,
    auth: Arc<dyn AuthProvider>,
    events: Arc<EventBus>,
    clock: Arc<dyn Clock>,
    guard: InFlightGuard,
}

impl ReviewsStore {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        auth: Arc<dyn AuthProvider>,
        events: Arc<EventBus>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            auth,
            events,
            clock,
            guard: InFlightGuard::new(),
        }
    }

    /// Post a review as the logged-in user.
    pub fn add(&self, destination_id: &str, destination_name: &str, rating: u8, comment: &str) -> SocialResult<Review> {
        let session = self.auth.require_session("write review")?;
        validate(rating, comment)?;
        let _token = self.guard.try_acquire(&format!("review:{}", destination_id))?;

        let mut all = self.load_all()?;
        let reviews = all.entry(destination_id.to_string()).or_default();
        if reviews.iter().any(|r| r.is_written_by(&session.email)) {
            warn!("{} already reviewed {}", session.email, destination_id);
            return Err(SocialError::AlreadyReviewed(destination_id.to_string()));
        }

        let review = Review {
            id: new_id("REV"),
            user_email: session.email,
            username: session.username,
            destination_name: destination_name.to_string(),
            rating,
            comment: comment.trim().to_string(),
            created_at: self.clock.now(),
            updated_at: None,
            destination_id: None,
        };
        reviews.push(review.clone());
        self.store.save_json(keys::DESTINATION_REVIEWS, &all)?;

        info!("Review {} posted for {} ({}★)", review.id, destination_id, rating);
        self.events.publish(StoreEvent::ReviewAdded {
            destination_id: destination_id.to_string(),
            review_id: review.id.clone(),
        });
        Ok(review)
    }

    /// Change rating and comment of one of the caller's own reviews.
    pub fn update(&self, destination_id: &str, review_id: &str, rating: u8, comment: &str) -> SocialResult<Review> {
        let session = self.auth.require_session("edit review")?;
        validate(rating, comment)?;
        let now = self.clock.now();

        let event = StoreEvent::ReviewUpdated {
            destination_id: destination_id.to_string(),
            review_id: review_id.to_string(),
        };
        self.modify_own(&session, destination_id, review_id, event, |reviews, index| {
            let review = &mut reviews[index];
            review.rating = rating;
            review.comment = comment.trim().to_string();
            review.updated_at = Some(now);
            review.clone()
        })
    }

    /// Delete one of the caller's own reviews.
    pub fn delete(&self, destination_id: &str, review_id: &str) -> SocialResult<()> {
        let session = self.auth.require_session("delete review")?;
        let event = StoreEvent::ReviewDeleted {
            destination_id: destination_id.to_string(),
            review_id: review_id.to_string(),
        };
        self.modify_own(&session, destination_id, review_id, event, |reviews, index| {
            reviews.remove(index);
        })?;
        info!("Review {} deleted by {}", review_id, session.email);
        Ok(())
    }

    pub fn list_by_destination(&self, destination_id: &str) -> SocialResult<Vec<Review>> {
        let mut all = self.load_all()?;
        Ok(all.remove(destination_id).unwrap_or_default())
    }

    /// Every review by `email`, newest first, tagged with its destination id.
    pub fn list_by_user(&self, email: &str) -> SocialResult<Vec<Review>> {
        let all = self.load_all()?;
        let mut mine: Vec<Review> = all
            .into_iter()
            .flat_map(move |(destination_id, reviews)| {
                reviews.into_iter().filter_map(move |mut r| {
                    if !r.is_written_by(email) {
                        return None;
                    }
                    r.destination_id = Some(destination_id.clone());
                    Some(r)
                })
            })
            .collect();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(mine)
    }

    pub fn has_reviewed(&self, email: &str, destination_id: &str) -> SocialResult<bool> {
        Ok(self
            .list_by_destination(destination_id)?
            .iter()
            .any(|r| r.is_written_by(email)))
    }

    pub fn average_rating(&self, destination_id: &str) -> SocialResult<f64> {
        Ok(average(&self.list_by_destination(destination_id)?))
    }

    /// Guarded lookup of a review the session owns, then `f`, a write-back and
    /// `event`, all while the destination is still guarded.
    fn modify_own<T, F>(
        &self,
        session: &Session,
        destination_id: &str,
        review_id: &str,
        event: StoreEvent,
        f: F,
    ) -> SocialResult<T>
    where
        F: FnOnce(&mut Vec<Review>, usize) -> T,
    {
        let _token = self.guard.try_acquire(&format!("review:{}", destination_id))?;
        let mut all = self.load_all()?;
        let reviews = all
            .get_mut(destination_id)
            .ok_or_else(|| SocialError::ReviewNotFound(review_id.to_string()))?;
        let index = reviews
            .iter()
            .position(|r| r.id == review_id)
            .ok_or_else(|| SocialError::ReviewNotFound(review_id.to_string()))?;
        if !reviews[index].is_written_by(&session.email) {
            warn!("{} tried to modify review {} of another user", session.email, review_id);
            return Err(SocialError::Forbidden(review_id.to_string()));
        }

        let out = f(reviews, index);
        if reviews.is_empty() {
            all.remove(destination_id);
        }
        self.store.save_json(keys::DESTINATION_REVIEWS, &all)?;
        self.events.publish(event);
        Ok(out)
    }

    fn load_all(&self) -> SocialResult<ReviewsByDestination> {
        Ok(self.store.load_json(keys::DESTINATION_REVIEWS)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nomad_core::{CoreError, FixedClock, MockAuthProvider};
    use nomad_store::MemoryStore;
    use std::sync::Mutex;

    const ALICE: &str = "alice@example.com";
    const BOB: &str = "bob@example.com";

    struct Fixture {
        reviews: Arc<ReviewsStore>,
        auth: Arc<MockAuthProvider>,
        clock: Arc<FixedClock>,
        events: Arc<EventBus>,
    }

    fn setup() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let auth = Arc::new(MockAuthProvider::logged_in("alice", ALICE));
        let clock = Arc::new(FixedClock::at_date(2025, 5, 1).unwrap());
        let events = Arc::new(EventBus::new());
        let reviews = Arc::new(ReviewsStore::new(store, auth.clone(), events.clone(), clock.clone()));
        Fixture { reviews, auth, clock, events }
    }

    fn switch_to(f: &Fixture, username: &str, email: &str) {
        f.auth.set_session(Some(Session {
            id: username.to_string(),
            username: username.to_string(),
            email: email.to_string(),
        }));
    }

    #[test]
    fn test_one_review_per_user_and_destination() {
        let f = setup();
        let review = f.reviews.add("tokio-japon", "Tokio", 5, "Increíble").unwrap();
        assert!(review.id.starts_with("REV"));
        assert_eq!(review.username, "alice");

        assert!(matches!(
            f.reviews.add("tokio-japon", "Tokio", 3, "Otra vez"),
            Err(SocialError::AlreadyReviewed(_))
        ));
        assert_eq!(f.reviews.list_by_destination("tokio-japon").unwrap().len(), 1);

        // Other destination and other user are fine
        f.reviews.add("paris-francia", "París", 4, "Bonito").unwrap();
        switch_to(&f, "bob", BOB);
        f.reviews.add("tokio-japon", "Tokio", 3, "Caro").unwrap();
        assert_eq!(f.reviews.list_by_destination("tokio-japon").unwrap().len(), 2);
        assert!(f.reviews.has_reviewed(ALICE, "tokio-japon").unwrap());
    }

    #[test]
    fn test_validation_and_auth() {
        let f = setup();
        match f.reviews.add("tokio-japon", "Tokio", 0, "  ") {
            Err(SocialError::Validation(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(f.reviews.add("tokio-japon", "Tokio", 6, "ok").is_err());

        f.auth.set_session(None);
        assert!(matches!(
            f.reviews.add("tokio-japon", "Tokio", 4, "ok"),
            Err(SocialError::Core(CoreError::Unauthenticated))
        ));
        assert_eq!(f.auth.prompt_count(), 1);
    }

    #[test]
    fn test_average_rating() {
        let f = setup();
        assert_eq!(f.reviews.average_rating("tokio-japon").unwrap(), 0.0);

        for (name, email, rating) in [("a", "a@x.io", 5), ("b", "b@x.io", 3), ("c", "c@x.io", 4)] {
            switch_to(&f, name, email);
            f.reviews.add("tokio-japon", "Tokio", rating, "ok").unwrap();
        }
        assert_eq!(f.reviews.average_rating("tokio-japon").unwrap(), 4.0);

        switch_to(&f, "d", "d@x.io");
        f.reviews.add("tokio-japon", "Tokio", 5, "ok").unwrap();
        // 17 / 4 = 4.25
        assert_eq!(f.reviews.average_rating("tokio-japon").unwrap(), 4.3);
    }

    #[test]
    fn test_list_by_user_newest_first() {
        let f = setup();
        f.reviews.add("tokio-japon", "Tokio", 5, "Primero").unwrap();
        f.clock.advance(chrono::Duration::days(1));
        f.reviews.add("paris-francia", "París", 4, "Segundo").unwrap();

        let mine = f.reviews.list_by_user(ALICE).unwrap();
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].comment, "Segundo");
        assert_eq!(mine[0].destination_id.as_deref(), Some("paris-francia"));
        assert_eq!(mine[1].destination_id.as_deref(), Some("tokio-japon"));
        assert!(f.reviews.list_by_user(BOB).unwrap().is_empty());
    }

    #[test]
    fn test_update_and_delete_own_only() {
        let f = setup();
        let review = f.reviews.add("tokio-japon", "Tokio", 2, "Meh").unwrap();

        switch_to(&f, "bob", BOB);
        assert!(matches!(
            f.reviews.delete("tokio-japon", &review.id),
            Err(SocialError::Forbidden(_))
        ));
        assert!(matches!(
            f.reviews.update("tokio-japon", &review.id, 5, "Hacked"),
            Err(SocialError::Forbidden(_))
        ));

        switch_to(&f, "alice", ALICE);
        let updated = f.reviews.update("tokio-japon", &review.id, 4, "Mejor de lo que pensaba").unwrap();
        assert_eq!(updated.rating, 4);
        assert!(updated.updated_at.is_some());

        f.reviews.delete("tokio-japon", &review.id).unwrap();
        assert!(f.reviews.list_by_destination("tokio-japon").unwrap().is_empty());
        assert!(matches!(
            f.reviews.delete("tokio-japon", &review.id),
            Err(SocialError::ReviewNotFound(_))
        ));

        // Deleting frees the slot for a new review
        f.reviews.add("tokio-japon", "Tokio", 5, "Repetiría").unwrap();
    }

    #[test]
    fn test_average_helper() {
        assert_eq!(average(&[]), 0.0);
    }

    /// Runs `second` from inside the first handler call for `matches` and records whether it was Busy.
    fn on_event<M, S>(f: &Fixture, matches: M, second: S) -> Arc<Mutex<Vec<bool>>>
    where
        M: Fn(&StoreEvent) -> bool + Send + Sync + 'static,
        S: Fn(&ReviewsStore) -> SocialResult<()> + Send + Sync + 'static,
    {
        let outcomes = Arc::new(Mutex::new(Vec::new()));
        let inner = f.reviews.clone();
        let sink = outcomes.clone();
        f.events.subscribe(move |e| {
            if matches(e) {
                let busy = matches!(second(&inner), Err(SocialError::Core(CoreError::Busy(_))));
                sink.lock().unwrap().push(busy);
            }
        });
        outcomes
    }

    #[test]
    fn test_reentrant_add_is_busy() {
        let f = setup();
        let outcomes = on_event(
            &f,
            |e| matches!(e, StoreEvent::ReviewAdded { .. }),
            |r| r.add("tokio-japon", "Tokio", 1, "Otra vez").map(|_| ()),
        );

        f.reviews.add("tokio-japon", "Tokio", 5, "Increíble").unwrap();
        assert_eq!(*outcomes.lock().unwrap(), vec![true]);
        assert_eq!(f.reviews.list_by_destination("tokio-japon").unwrap().len(), 1);
        f.events.clear();
    }

    #[test]
    fn test_reentrant_update_and_delete_are_busy() {
        let f = setup();
        let review = f.reviews.add("tokio-japon", "Tokio", 3, "Bien").unwrap();

        let id = review.id.clone();
        let outcomes = on_event(
            &f,
            |e| matches!(e, StoreEvent::ReviewUpdated { .. }),
            move |r| r.delete("tokio-japon", &id),
        );
        f.reviews.update("tokio-japon", &review.id, 4, "Muy bien").unwrap();
        assert_eq!(*outcomes.lock().unwrap(), vec![true]);
        // The nested delete did not go through
        assert_eq!(f.reviews.list_by_destination("tokio-japon").unwrap()[0].rating, 4);
        f.events.clear();

        let id = review.id.clone();
        let outcomes = on_event(
            &f,
            |e| matches!(e, StoreEvent::ReviewDeleted { .. }),
            move |r| r.update("tokio-japon", &id, 1, "Mal").map(|_| ()),
        );
        f.reviews.delete("tokio-japon", &review.id).unwrap();
        assert_eq!(*outcomes.lock().unwrap(), vec![true]);
        assert!(f.reviews.list_by_destination("tokio-japon").unwrap().is_empty());
        f.events.clear();
    }
}
