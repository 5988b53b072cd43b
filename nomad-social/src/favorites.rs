use crate::SocialResult;
use nomad_core::{keys, AuthProvider, EventBus, InFlightGuard, JsonStoreExt, KeyValueStore};
use nomad_shared::{DestinationSnapshot, StoreEvent};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

type FavoritesByUser = BTreeMap<String, Vec<String>>;
type FavoritesData = BTreeMap<String, DestinationSnapshot>;

/// Per-user favorite destination ids (`userFavorites`) plus a global display
/// cache keyed by destination id (`favoritesData`, last writer wins).
pub struct FavoritesStore {
    store: Arc<dyn KeyValueStore>,
    auth: Arc<dyn AuthProvider>,
    events: Arc<EventBus>,
    guard: InFlightGuard,
}

impl FavoritesStore {
    pub fn new(store: Arc<dyn KeyValueStore>, auth: Arc<dyn AuthProvider>, events: Arc<EventBus>) -> Self {
        Self {
            store,
            auth,
            events,
            guard: InFlightGuard::new(),
        }
    }

    /// Flip membership for the logged-in user and return the new state.
    /// Logged-out callers get a login prompt and nothing changes; a second
    /// toggle of the same destination while one is in flight is `Busy`.
    pub fn toggle(&self, destination_id: &str, snapshot: Option<DestinationSnapshot>) -> SocialResult<bool> {
        let session = self.auth.require_session("toggle favorite")?;
        let _token = self.guard.try_acquire(destination_id)?;

        let mut favorites: FavoritesByUser = self.store.load_json(keys::USER_FAVORITES)?;
        let list = favorites.entry(session.email.clone()).or_default();
        let is_favorite = match list.iter().position(|id| id == destination_id) {
            Some(index) => {
                list.remove(index);
                false
            }
            None => {
                list.push(destination_id.to_string());
                true
            }
        };

        if is_favorite {
            if let Some(snapshot) = snapshot {
                let mut data: FavoritesData = self.store.load_json(keys::FAVORITES_DATA)?;
                data.insert(destination_id.to_string(), snapshot);
                self.store.save_json(keys::FAVORITES_DATA, &data)?;
            }
        }
        self.store.save_json(keys::USER_FAVORITES, &favorites)?;

        info!(
            "{} {} favorites for {}",
            if is_favorite { "Added" } else { "Removed" },
            destination_id,
            session.email
        );
        self.events.publish(StoreEvent::FavoriteToggled {
            user_email: session.email,
            destination_id: destination_id.to_string(),
            is_favorite,
        });
        Ok(is_favorite)
    }

    /// Remove from the logged-in user's favorites if present. Returns whether it was.
    pub fn remove(&self, destination_id: &str) -> SocialResult<bool> {
        let session = self.auth.require_session("remove favorite")?;
        if !self.is_favorite(&session.email, destination_id)? {
            return Ok(false);
        }
        Ok(!self.toggle(destination_id, None)?)
    }

    pub fn is_favorite(&self, email: &str, destination_id: &str) -> SocialResult<bool> {
        Ok(self.list(email)?.iter().any(|id| id == destination_id))
    }

    pub fn list(&self, email: &str) -> SocialResult<Vec<String>> {
        let mut favorites: FavoritesByUser = self.store.load_json(keys::USER_FAVORITES)?;
        Ok(favorites.remove(email).unwrap_or_default())
    }

    pub fn count(&self, email: &str) -> SocialResult<usize> {
        Ok(self.list(email)?.len())
    }

    /// Cached display data for a destination, from whoever favorited it last.
    pub fn snapshot(&self, destination_id: &str) -> SocialResult<Option<DestinationSnapshot>> {
        let mut data: FavoritesData = self.store.load_json(keys::FAVORITES_DATA)?;
        Ok(data.remove(destination_id))
    }

    /// The user's favorites paired with any cached display data, for the profile page.
    pub fn list_with_snapshots(&self, email: &str) -> SocialResult<Vec<(String, Option<DestinationSnapshot>)>> {
        let ids = self.list(email)?;
        let data: FavoritesData = self.store.load_json(keys::FAVORITES_DATA)?;
        debug!("Loaded {} favorites for {}", ids.len(), email);
        Ok(ids
            .into_iter()
            .map(|id| {
                let snapshot = data.get(&id).cloned();
                (id, snapshot)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SocialError;
    use nomad_core::{CoreError, MockAuthProvider};
    use nomad_store::MemoryStore;
    use std::sync::Mutex;

    const ALICE: &str = "alice@example.com";

    fn setup(auth: MockAuthProvider) -> (Arc<FavoritesStore>, Arc<MockAuthProvider>, Arc<MemoryStore>, Arc<EventBus>) {
        let store = Arc::new(MemoryStore::new());
        let auth = Arc::new(auth);
        let events = Arc::new(EventBus::new());
        let favorites = Arc::new(FavoritesStore::new(store.clone(), auth.clone(), events.clone()));
        (favorites, auth, store, events)
    }

    fn tokyo() -> DestinationSnapshot {
        DestinationSnapshot::new("tokio-japon", "Tokio", "Japón")
    }

    #[test]
    fn test_toggle_twice_restores_state() {
        let (favorites, _, _, _) = setup(MockAuthProvider::logged_in("alice", ALICE));

        assert!(favorites.toggle("tokio-japon", Some(tokyo())).unwrap());
        assert!(favorites.is_favorite(ALICE, "tokio-japon").unwrap());
        assert_eq!(favorites.count(ALICE).unwrap(), 1);

        assert!(!favorites.toggle("tokio-japon", None).unwrap());
        assert!(!favorites.is_favorite(ALICE, "tokio-japon").unwrap());
        assert_eq!(favorites.count(ALICE).unwrap(), 0);

        // The display cache outlives the membership
        assert_eq!(favorites.snapshot("tokio-japon").unwrap().unwrap().name, "Tokio");
    }

    #[test]
    fn test_logged_out_toggle_is_rejected() {
        let (favorites, auth, store, _) = setup(MockAuthProvider::logged_out());

        let result = favorites.toggle("tokio-japon", Some(tokyo()));
        assert!(matches!(result, Err(SocialError::Core(CoreError::Unauthenticated))));
        assert_eq!(auth.prompt_count(), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn test_favorites_are_per_user() {
        let (favorites, auth, _, _) = setup(MockAuthProvider::logged_in("alice", ALICE));
        favorites.toggle("tokio-japon", Some(tokyo())).unwrap();

        auth.set_session(Some(nomad_shared::Session {
            id: "2".to_string(),
            username: "bob".to_string(),
            email: "bob@example.com".to_string(),
        }));
        assert!(!favorites.is_favorite("bob@example.com", "tokio-japon").unwrap());
        favorites.toggle("paris-francia", None).unwrap();

        assert_eq!(favorites.list(ALICE).unwrap(), vec!["tokio-japon"]);
        assert_eq!(favorites.list("bob@example.com").unwrap(), vec!["paris-francia"]);

        let with_data = favorites.list_with_snapshots("bob@example.com").unwrap();
        assert_eq!(with_data, vec![("paris-francia".to_string(), None)]);
    }

    #[test]
    fn test_reentrant_toggle_is_busy() {
        let (favorites, _, _, events) = setup(MockAuthProvider::logged_in("alice", ALICE));

        let outcomes = Arc::new(Mutex::new(Vec::new()));
        let inner = favorites.clone();
        let sink = outcomes.clone();
        // Duplicate binding firing a second toggle mid-flight
        events.subscribe(move |e| {
            if let StoreEvent::FavoriteToggled { destination_id, .. } = e {
                let second = inner.toggle(destination_id, None);
                sink.lock().unwrap().push(matches!(second, Err(SocialError::Core(CoreError::Busy(_)))));
            }
        });

        assert!(favorites.toggle("tokio-japon", None).unwrap());
        assert_eq!(*outcomes.lock().unwrap(), vec![true]);
        // The rejected toggle did not flip it back
        assert!(favorites.is_favorite(ALICE, "tokio-japon").unwrap());
        events.clear();
    }

    #[test]
    fn test_remove() {
        let (favorites, _, _, _) = setup(MockAuthProvider::logged_in("alice", ALICE));
        assert!(!favorites.remove("tokio-japon").unwrap());
        favorites.toggle("tokio-japon", None).unwrap();
        assert!(favorites.remove("tokio-japon").unwrap());
        assert_eq!(favorites.count(ALICE).unwrap(), 0);
    }

    #[test]
    fn test_display_cache_last_writer_wins() {
        let (favorites, auth, _, _) = setup(MockAuthProvider::logged_in("alice", ALICE));
        favorites.toggle("tokio-japon", Some(tokyo())).unwrap();

        auth.set_session(Some(nomad_shared::Session {
            id: "2".to_string(),
            username: "bob".to_string(),
            email: "bob@example.com".to_string(),
        }));
        let mut english = tokyo();
        english.enname = Some("Tokyo".to_string());
        english.price = Some(1500);
        favorites.toggle("tokio-japon", Some(english)).unwrap();

        // One shared entry, holding bob's copy
        let cached = favorites.snapshot("tokio-japon").unwrap().unwrap();
        assert_eq!(cached.enname.as_deref(), Some("Tokyo"));
        assert_eq!(cached.price, Some(1500));
        let alice_view = favorites.list_with_snapshots(ALICE).unwrap();
        assert_eq!(alice_view[0].1.as_ref().unwrap().price, Some(1500));
    }
}
