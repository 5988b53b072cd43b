use crate::validation::NewAccount;
use crate::{AccountError, AccountResult};
use nomad_core::{keys, AuthProvider, Clock, EventBus, JsonStoreExt, KeyValueStore};
use nomad_shared::{Session, StoreEvent, UserAccount};
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

/// Owns the account registry and the single live session.
pub struct AccountManager {
    store: Arc<dyn KeyValueStore>,
    events: Arc<EventBus>,
    clock: Arc<dyn Clock>,
    current: RwLock<Option<Session>>,
}

impl AccountManager {
    pub fn new(store: Arc<dyn KeyValueStore>, events: Arc<EventBus>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            events,
            clock,
            current: RwLock::new(None),
        }
    }

    /// Restore the persisted session, if any.
    pub fn init(&self) -> AccountResult<Option<Session>> {
        let session: Option<Session> = self.store.load_json_opt(keys::CURRENT_USER)?;
        if let Some(s) = &session {
            debug!("Restored session for {}", s.email);
        }
        *self.write_current() = session.clone();
        Ok(session)
    }

    /// Validate, reject duplicate emails, append to the registry and log the new user in.
    pub fn register(&self, input: NewAccount) -> AccountResult<Session> {
        let input = input.normalized();
        let errors = input.validate();
        if !errors.is_empty() {
            return Err(AccountError::Validation(errors));
        }

        let mut users = self.load_users()?;
        if users.iter().any(|u| u.email == input.email) {
            warn!("Registration rejected, email already present: {}", input.email);
            return Err(AccountError::EmailTaken(input.email));
        }

        let account = UserAccount::new(input.username, input.email, input.password, self.clock.now());
        let session = account.session();
        users.push(account);
        self.store.save_json(keys::REGISTERED_USERS, &users)?;

        info!("Registered {} ({} accounts)", session.email, users.len());
        self.start_session(session.clone())?;
        Ok(session)
    }

    pub fn login(&self, email: &str, password: &str) -> AccountResult<Session> {
        let users = self.load_users()?;
        let Some(account) = users.iter().find(|u| u.credentials_match(email, password)) else {
            warn!("Failed login attempt");
            return Err(AccountError::InvalidCredentials);
        };
        let session = account.session();
        self.start_session(session.clone())?;
        Ok(session)
    }

    /// `notify = false` asks the presentation to skip the "logged out" notice.
    pub fn logout(&self, notify: bool) -> AccountResult<()> {
        let previous = self.write_current().take();
        self.store.remove(keys::CURRENT_USER)?;
        if let Some(s) = previous {
            info!("Session ended for {}", s.email);
        }
        self.events.publish(StoreEvent::SessionEnded { notify });
        Ok(())
    }

    pub fn current_user(&self) -> Option<Session> {
        self.current.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.read().unwrap_or_else(|e| e.into_inner()).is_some()
    }

    /// Run `f` with the session, or prompt for login and withhold it.
    pub fn require_auth<T, F>(&self, action: &str, f: F) -> AccountResult<T>
    where
        F: FnOnce(&Session) -> T,
    {
        let session = self.require_session(action)?;
        Ok(f(&session))
    }

    pub fn registered_count(&self) -> AccountResult<usize> {
        Ok(self.load_users()?.len())
    }

    /// Write `accounts` as the registry only if it is currently empty.
    pub fn seed_if_empty(&self, accounts: Vec<UserAccount>) -> AccountResult<bool> {
        if !self.load_users()?.is_empty() {
            return Ok(false);
        }
        self.store.save_json(keys::REGISTERED_USERS, &accounts)?;
        info!("Seeded {} accounts", accounts.len());
        Ok(true)
    }

    fn load_users(&self) -> AccountResult<Vec<UserAccount>> {
        Ok(self.store.load_json(keys::REGISTERED_USERS)?)
    }

    fn start_session(&self, session: Session) -> AccountResult<()> {
        self.store.save_json(keys::CURRENT_USER, &session)?;
        *self.write_current() = Some(session.clone());
        info!("Session started for {}", session.email);
        self.events.publish(StoreEvent::SessionStarted {
            username: session.username,
            email: session.email,
        });
        Ok(())
    }

    fn write_current(&self) -> std::sync::RwLockWriteGuard<'_, Option<Session>> {
        self.current.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl AuthProvider for AccountManager {
    fn current_session(&self) -> Option<Session> {
        self.current_user()
    }

    fn prompt_login(&self, action: &str) {
        info!("Login required for {}", action);
        self.events.publish(StoreEvent::LoginRequired {
            action: action.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nomad_core::{CoreError, SystemClock};
    use nomad_store::MemoryStore;
    use std::sync::Mutex;

    fn setup() -> (AccountManager, Arc<MemoryStore>, Arc<Mutex<Vec<StoreEvent>>>) {
        let store = Arc::new(MemoryStore::new());
        let events = Arc::new(EventBus::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        events.subscribe(move |e| sink.lock().unwrap().push(e.clone()));
        let manager = AccountManager::new(store.clone(), events, Arc::new(SystemClock));
        (manager, store, seen)
    }

    fn alice() -> NewAccount {
        NewAccount::new("alice", "alice@example.com", "Passw0rd!")
    }

    #[test]
    fn test_register_logs_in() {
        let (manager, store, seen) = setup();
        let session = manager.register(alice()).unwrap();

        assert_eq!(session.username, "alice");
        assert!(manager.is_authenticated());
        assert_eq!(manager.registered_count().unwrap(), 1);
        assert!(store.get(keys::CURRENT_USER).unwrap().is_some());
        assert!(matches!(seen.lock().unwrap()[0], StoreEvent::SessionStarted { .. }));
    }

    #[test]
    fn test_duplicate_email_leaves_registry_unchanged() {
        let (manager, _, _) = setup();
        manager.register(alice()).unwrap();

        let again = NewAccount::new("alice2", "alice@example.com", "Other123");
        assert!(matches!(manager.register(again), Err(AccountError::EmailTaken(_))));
        assert_eq!(manager.registered_count().unwrap(), 1);
    }

    #[test]
    fn test_invalid_input_is_not_stored() {
        let (manager, _, _) = setup();
        let result = manager.register(NewAccount::new("al", "nope", "weak"));
        match result {
            Err(AccountError::Validation(errors)) => assert_eq!(errors.len(), 3),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(manager.registered_count().unwrap(), 0);
        assert!(!manager.is_authenticated());
    }

    #[test]
    fn test_login_logout_cycle() {
        let (manager, store, seen) = setup();
        manager.register(alice()).unwrap();
        manager.logout(false).unwrap();
        assert!(!manager.is_authenticated());
        assert!(store.get(keys::CURRENT_USER).unwrap().is_none());

        // Wrong password and unknown email fail the same way
        let wrong = manager.login("alice@example.com", "nope").unwrap_err();
        let unknown = manager.login("bob@example.com", "Passw0rd!").unwrap_err();
        assert_eq!(wrong.to_string(), unknown.to_string());
        assert!(!manager.is_authenticated());

        let session = manager.login("alice@example.com", "Passw0rd!").unwrap();
        assert_eq!(session.username, "alice");

        manager.logout(true).unwrap();
        assert!(manager.current_user().is_none());
        assert!(seen
            .lock()
            .unwrap()
            .iter()
            .any(|e| *e == StoreEvent::SessionEnded { notify: false }));
    }

    #[test]
    fn test_init_restores_session() {
        let (manager, store, _) = setup();
        manager.register(alice()).unwrap();

        let events = Arc::new(EventBus::new());
        let fresh = AccountManager::new(store, events, Arc::new(SystemClock));
        assert!(!fresh.is_authenticated());
        let restored = fresh.init().unwrap().unwrap();
        assert_eq!(restored.email, "alice@example.com");
        assert!(fresh.is_authenticated());
    }

    #[test]
    fn test_require_auth() {
        let (manager, _, seen) = setup();

        let denied = manager.require_auth("book", |s| s.email.clone());
        assert!(matches!(denied, Err(AccountError::Core(CoreError::Unauthenticated))));
        assert!(matches!(seen.lock().unwrap().last(), Some(StoreEvent::LoginRequired { .. })));

        manager.register(alice()).unwrap();
        assert_eq!(manager.require_auth("book", |s| s.email.clone()).unwrap(), "alice@example.com");
    }

    #[test]
    fn test_seed_only_when_empty() {
        let (manager, _, _) = setup();
        let demo = UserAccount::new("demo".into(), "demo@nomadtrails.com".into(), "Demo123".into(), chrono::Utc::now());
        assert!(manager.seed_if_empty(vec![demo.clone()]).unwrap());
        assert!(!manager.seed_if_empty(vec![demo]).unwrap());
        assert_eq!(manager.registered_count().unwrap(), 1);
        assert!(manager.login("demo@nomadtrails.com", "Demo123").is_ok());
    }
}
