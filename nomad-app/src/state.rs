use crate::error::AppError;
use crate::seed::demo_accounts;
use crate::stats::ProfileStats;
use nomad_account::{AccountManager, LanguagePreference};
use nomad_booking::BookingStore;
use nomad_catalog::{CatalogOptions, DestinationCatalog};
use nomad_core::{AuthProvider, Clock, EventBus, KeyValueStore, SystemClock};
use nomad_store::app_config::{CatalogConfig, Config};
use nomad_store::{open_store, MemoryStore};
use nomad_social::{CommunityStore, FavoritesStore, ReviewsStore};
use std::sync::Arc;
use tracing::{debug, info};

/// Everything a page needs, wired over one store, one event bus and one clock.
pub struct NomadApp {
    pub config: Config,
    pub store: Arc<dyn KeyValueStore>,
    pub events: Arc<EventBus>,
    pub clock: Arc<dyn Clock>,
    pub accounts: Arc<AccountManager>,
    pub language: LanguagePreference,
    pub catalog: DestinationCatalog,
    pub bookings: BookingStore,
    pub favorites: FavoritesStore,
    pub reviews: ReviewsStore,
    pub community: CommunityStore,
}

fn catalog_options(config: &CatalogConfig) -> CatalogOptions {
    CatalogOptions {
        min_price: config.min_price,
        max_price: config.max_price,
        price_seed: config.price_seed,
    }
}

impl NomadApp {
    pub fn from_config(config: Config) -> Result<Self, AppError> {
        let store = open_store(&config.storage)?;
        let catalog = DestinationCatalog::load_from_path(&config.catalog.path, catalog_options(&config.catalog))?;
        info!("Loaded {} destinations from {}", catalog.len(), config.catalog.path);
        Self::build(config, store, Arc::new(SystemClock), catalog)
    }

    /// Memory-backed app with default settings.
    pub fn in_memory(catalog: DestinationCatalog, clock: Arc<dyn Clock>) -> Result<Self, AppError> {
        Self::build(Config::default(), Arc::new(MemoryStore::new()), clock, catalog)
    }

    /// Wire the stores and restore any persisted session.
    pub fn build(
        config: Config,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        catalog: DestinationCatalog,
    ) -> Result<Self, AppError> {
        let events = Arc::new(EventBus::new());
        let accounts = Arc::new(AccountManager::new(store.clone(), events.clone(), clock.clone()));
        let auth: Arc<dyn AuthProvider> = accounts.clone();

        let bookings = BookingStore::new(
            store.clone(),
            auth.clone(),
            events.clone(),
            clock.clone(),
            config.business_rules.clone(),
        );
        let favorites = FavoritesStore::new(store.clone(), auth.clone(), events.clone());
        let reviews = ReviewsStore::new(store.clone(), auth.clone(), events.clone(), clock.clone());
        let community = CommunityStore::new(store.clone(), auth, events.clone(), clock.clone());
        let language = LanguagePreference::new(store.clone(), events.clone());

        accounts.init()?;

        Ok(Self {
            config,
            store,
            events,
            clock,
            accounts,
            language,
            catalog,
            bookings,
            favorites,
            reviews,
            community,
        })
    }

    /// Write the demo accounts when the registry is empty. Returns true if written.
    pub fn seed_demo_users(&self) -> Result<bool, AppError> {
        let seeded = self.accounts.seed_if_empty(demo_accounts(self.clock.now()))?;
        if seeded {
            info!("Seeded demo accounts");
        }
        Ok(seeded)
    }

    pub fn profile_stats(&self, email: &str) -> Result<ProfileStats, AppError> {
        Ok(ProfileStats {
            upcoming_trips: self.bookings.count_upcoming(email)?,
            favorites: self.favorites.count(email)?,
            reviews: self.reviews.list_by_user(email)?.len(),
            posts: self.community.count_by_author(email)?,
        })
    }

    /// Drop every event subscriber. Persisted state is left untouched.
    pub fn shutdown(&self) {
        self.events.clear();
        debug!("Event bus cleared");
    }
}
