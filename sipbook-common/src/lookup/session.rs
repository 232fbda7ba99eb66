//! Per-consumer lookup state
//!
//! A [`LookupSession`] belongs to one composition-editing session. It issues
//! at most one lookup while one is outstanding and, once ingredients have
//! loaded, answers every later call from its own copy. Nothing here is
//! shared between sessions.

use std::sync::Mutex;

use tracing::debug;

use super::{RecipeLookupError, RecipeLookupService};
use crate::model::{DrinkKind, PresetDrink};

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    Idle,
    InFlight,
    Loaded(Vec<String>),
    Failed(RecipeLookupError),
}

/// Result of [`LookupSession::load`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionLoad {
    /// This call performed the lookup
    Fetched(Vec<String>),
    /// Ingredients were already loaded; no lookup was issued
    Cached(Vec<String>),
    /// Another call is still running; no lookup was issued
    InFlight,
}

impl SessionLoad {
    pub fn ingredients(&self) -> Option<&[String]> {
        match self {
            SessionLoad::Fetched(i) | SessionLoad::Cached(i) => Some(i),
            SessionLoad::InFlight => None,
        }
    }
}

/// One-shot original-ingredients loader for a single preset
#[derive(Debug)]
pub struct LookupSession {
    preset_name: String,
    kind: DrinkKind,
    state: Mutex<State>,
}

/// Resets an abandoned in-flight state so a dropped future does not wedge the session
struct InFlightGuard<'a> {
    state: &'a Mutex<State>,
    armed: bool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            if let Ok(mut state) = self.state.lock() {
                *state = State::Idle;
            }
        }
    }
}

impl LookupSession {
    pub fn new(preset_name: impl Into<String>, kind: DrinkKind) -> Self {
        Self {
            preset_name: preset_name.into(),
            kind,
            state: Mutex::new(State::Idle),
        }
    }

    pub fn for_preset(preset: &PresetDrink) -> Self {
        Self::new(preset.name.clone(), preset.kind)
    }

    pub fn preset_name(&self) -> &str {
        &self.preset_name
    }

    pub fn is_loaded(&self) -> bool {
        matches!(*self.lock(), State::Loaded(_))
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(*self.lock(), State::InFlight)
    }

    pub fn ingredients(&self) -> Option<Vec<String>> {
        match &*self.lock() {
            State::Loaded(ingredients) => Some(ingredients.clone()),
            _ => None,
        }
    }

    /// User-facing message from the most recent failed attempt
    pub fn error_message(&self) -> Option<String> {
        match &*self.lock() {
            State::Failed(e) => Some(e.to_string()),
            _ => None,
        }
    }

    /// Load the preset's original ingredients through `service`.
    ///
    /// Errors are recorded and returned; the session stays unloaded so a
    /// later call can retry.
    pub async fn load(&self, service: &RecipeLookupService) -> Result<SessionLoad, RecipeLookupError> {
        {
            let mut state = self.lock();
            if let State::Loaded(ingredients) = &*state {
                debug!(preset = %self.preset_name, "Original ingredients already loaded");
                return Ok(SessionLoad::Cached(ingredients.clone()));
            }
            if *state == State::InFlight {
                debug!(preset = %self.preset_name, "Lookup already in flight");
                return Ok(SessionLoad::InFlight);
            }
            *state = State::InFlight;
        }

        let mut guard = InFlightGuard {
            state: &self.state,
            armed: true,
        };
        let result = service.lookup(&self.preset_name, self.kind).await;
        guard.armed = false;

        let mut state = self.lock();
        match result {
            Ok(ingredients) => {
                *state = State::Loaded(ingredients.clone());
                Ok(SessionLoad::Fetched(ingredients))
            }
            Err(e) => {
                *state = State::Failed(e.clone());
                Err(e)
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        // State is replaced wholesale, so a poisoned value is still coherent
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::tests::{record, FakeSource};
    use std::sync::Arc;
    use std::time::Duration;

    fn service_with(remote: Arc<FakeSource>, local: Arc<FakeSource>) -> RecipeLookupService {
        RecipeLookupService::new(remote, local)
    }

    #[tokio::test]
    async fn test_second_load_is_cached() {
        let remote = Arc::new(FakeSource::new("remote", Ok(vec![record("Martini", &["Gin", "Vermouth"])])));
        let local = Arc::new(FakeSource::new("local", Ok(vec![])));
        let service = service_with(remote.clone(), local);
        let session = LookupSession::new("Martini", DrinkKind::Cocktail);

        let first = session.load(&service).await.unwrap();
        assert_eq!(first, SessionLoad::Fetched(vec!["Gin".into(), "Vermouth".into()]));

        let second = session.load(&service).await.unwrap();
        assert_eq!(second, SessionLoad::Cached(vec!["Gin".into(), "Vermouth".into()]));
        assert_eq!(remote.calls(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_load_is_skipped_while_in_flight() {
        let mut slow = FakeSource::new("remote", Ok(vec![record("Daiquiri", &["Rum", "Lime Juice"])]));
        slow.delay = Duration::from_millis(50);
        let remote = Arc::new(slow);
        let local = Arc::new(FakeSource::new("local", Ok(vec![])));
        let service = service_with(remote.clone(), local);
        let session = LookupSession::new("Daiquiri", DrinkKind::Cocktail);

        let (a, b) = tokio::join!(session.load(&service), session.load(&service));
        let outcomes = [a.unwrap(), b.unwrap()];

        assert!(outcomes.contains(&SessionLoad::InFlight));
        assert!(outcomes.iter().any(|o| matches!(o, SessionLoad::Fetched(_))));
        assert_eq!(remote.calls(), 1);
        assert!(session.is_loaded());
    }

    #[tokio::test]
    async fn test_failure_is_recorded_and_retryable() {
        let remote = Arc::new(FakeSource::new("remote", Err(RecipeLookupError::ServerError(502))));
        let local = Arc::new(FakeSource::new("local", Ok(vec![])));
        let service = service_with(remote.clone(), local);
        let session = LookupSession::new("Mojito", DrinkKind::Cocktail);

        let err = session.load(&service).await.unwrap_err();
        assert_eq!(err, RecipeLookupError::ServerError(502));
        assert_eq!(session.error_message().as_deref(), Some("server error (502)"));
        assert!(!session.is_loaded());

        let _ = session.load(&service).await;
        assert_eq!(remote.calls(), 2);
    }

    #[tokio::test]
    async fn test_dropped_load_does_not_wedge_session() {
        let mut slow = FakeSource::new("local", Ok(vec![record("Nojito", &["Mint"])]));
        slow.delay = Duration::from_secs(5);
        let local = Arc::new(slow);
        let remote = Arc::new(FakeSource::new("remote", Ok(vec![])));
        let service = service_with(remote, local);
        let session = LookupSession::new("Nojito", DrinkKind::Mocktail);

        let abandoned = tokio::time::timeout(Duration::from_millis(20), session.load(&service)).await;
        assert!(abandoned.is_err());
        assert!(!session.is_in_flight());
    }

    #[tokio::test]
    async fn test_sessions_do_not_share_cache() {
        let remote = Arc::new(FakeSource::new("remote", Ok(vec![record("Margarita", &["Tequila"])])));
        let local = Arc::new(FakeSource::new("local", Ok(vec![])));
        let service = service_with(remote.clone(), local);

        LookupSession::new("Margarita", DrinkKind::Cocktail).load(&service).await.unwrap();
        LookupSession::new("Margarita", DrinkKind::Cocktail).load(&service).await.unwrap();
        assert_eq!(remote.calls(), 2);
    }
}
