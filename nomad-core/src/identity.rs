use crate::{CoreError, CoreResult};
use nomad_shared::Session;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

/// Capability handed to every store that needs to know who is logged in.
pub trait AuthProvider: Send + Sync {
    fn current_session(&self) -> Option<Session>;

    /// Signal the presentation to show the login/register prompt.
    fn prompt_login(&self, action: &str);

    /// The active session, or a login prompt plus `Unauthenticated`.
    fn require_session(&self, action: &str) -> CoreResult<Session> {
        match self.current_session() {
            Some(session) => Ok(session),
            None => {
                self.prompt_login(action);
                Err(CoreError::Unauthenticated)
            }
        }
    }
}

/// Fixed-session provider for tests of stores that only consume identity.
#[derive(Debug, Default)]
pub struct MockAuthProvider {
    session: RwLock<Option<Session>>,
    prompts: AtomicUsize,
}

impl MockAuthProvider {
    pub fn logged_out() -> Self {
        Self::default()
    }

    pub fn logged_in(username: &str, email: &str) -> Self {
        let provider = Self::default();
        provider.set_session(Some(Session {
            id: "1".to_string(),
            username: username.to_string(),
            email: email.to_string(),
        }));
        provider
    }

    pub fn set_session(&self, session: Option<Session>) {
        *self.session.write().unwrap_or_else(|e| e.into_inner()) = session;
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }
}

impl AuthProvider for MockAuthProvider {
    fn current_session(&self) -> Option<Session> {
        self.session.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn prompt_login(&self, action: &str) {
        tracing::info!("Login required for {}", action);
        self.prompts.fetch_add(1, Ordering::SeqCst);
    }
}
