use crate::{CoreError, CoreResult};
use std::collections::HashSet;
use std::sync::Mutex;
use tracing::warn;

/// Per-key in-flight marker against re-entrant mutations (double clicks,
/// duplicated handlers). A second acquire of a held key fails with `Busy`.
#[derive(Debug, Default)]
pub struct InFlightGuard {
    in_flight: Mutex<HashSet<String>>,
}

impl InFlightGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self, key: &str) -> CoreResult<InFlightToken<'_>> {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        if !in_flight.insert(key.to_string()) {
            warn!("Rejected re-entrant operation on {}", key);
            return Err(CoreError::Busy(key.to_string()));
        }
        Ok(InFlightToken {
            guard: self,
            key: key.to_string(),
        })
    }

    pub fn is_held(&self, key: &str) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(key)
    }
}

/// Releases its key on drop.
#[derive(Debug)]
pub struct InFlightToken<'a> {
    guard: &'a InFlightGuard,
    key: String,
}

impl Drop for InFlightToken<'_> {
    fn drop(&mut self) {
        self.guard
            .in_flight
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.key);
    }
}
