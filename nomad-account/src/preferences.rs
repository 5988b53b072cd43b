use crate::AccountResult;
use nomad_core::{keys, EventBus, JsonStoreExt, KeyValueStore};
use nomad_shared::{Language, StoreEvent};
use std::sync::Arc;
use tracing::{debug, warn};

/// Interface language, stored under `language` and shared by every page.
pub struct LanguagePreference {
    store: Arc<dyn KeyValueStore>,
    events: Arc<EventBus>,
}

impl LanguagePreference {
    pub fn new(store: Arc<dyn KeyValueStore>, events: Arc<EventBus>) -> Self {
        Self { store, events }
    }

    /// Falls back to Spanish when unset or unrecognized. Accepts both the
    /// JSON form (`"en"`) and a bare code (`en`).
    pub fn get(&self) -> AccountResult<Language> {
        let Some(raw) = self.store.get(keys::LANGUAGE)? else {
            return Ok(Language::default());
        };
        let code = raw.trim().trim_matches('"');
        match code.parse() {
            Ok(lang) => Ok(lang),
            Err(e) => {
                warn!("Ignoring stored language: {}", e);
                Ok(Language::default())
            }
        }
    }

    pub fn set(&self, language: Language) -> AccountResult<()> {
        self.store.save_json(keys::LANGUAGE, &language)?;
        debug!("Language set to {}", language);
        self.events.publish(StoreEvent::LanguageChanged {
            language: language.code().to_string(),
        });
        Ok(())
    }
}
