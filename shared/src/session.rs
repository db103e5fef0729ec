//! Persisted session and the guard in front of protected screens.
//!
//! The session lives in a plain key-value store under four string keys. It
//! is written by the auth flows (login/signup/verify/logout) and only read
//! everywhere else. [`SessionService::check`] is synchronous so a screen
//! can decide before rendering anything whether to show protected content.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{ClientError, StoreError};

pub mod keys {
    pub const TOKEN: &str = "token";
    pub const USERNAME: &str = "username";
    pub const EMAIL: &str = "email";
    pub const PHONENUMBER: &str = "phonenumber";

    pub const ALL: [&str; 4] = [TOKEN, USERNAME, EMAIL, PHONENUMBER];
}

/// String key-value persistence (file, browser `localStorage`, memory).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub phonenumber: Option<String>,
}

impl Session {
    /// Presence is all that matters; the token is never inspected.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCheck {
    Authenticated(Session),
    Unauthenticated,
}

impl SessionCheck {
    pub fn token(&self) -> Option<&str> {
        match self {
            SessionCheck::Authenticated(s) => s.token.as_deref(),
            SessionCheck::Unauthenticated => None,
        }
    }
}

/// What to do with the stored session when a protected request answers 401.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnauthorizedPolicy {
    /// Show the error and keep the session.
    #[default]
    Surface,
    /// Drop the session so the guard sends the user back to login.
    ClearSession,
}

type Listener = Box<dyn Fn(&Session) + Send + Sync>;

#[derive(Default)]
struct Changes {
    generation: AtomicU64,
    listeners: Mutex<Vec<Listener>>,
}

impl fmt::Debug for Changes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Changes")
            .field("generation", &self.generation.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

/// Single owner of session reads and writes.
///
/// Clones are handles onto the same service: they share the change counter
/// and the subscribers, and see each other's writes as long as the store
/// reads through to shared storage (`localStorage`, a file reopened per
/// run). Changes are observable either by polling
/// [`SessionService::generation`], which increases on every `set` and
/// `clear`, or by registering a callback with [`SessionService::subscribe`].
#[derive(Debug, Clone)]
pub struct SessionService<S> {
    store: S,
    policy: UnauthorizedPolicy,
    changes: Arc<Changes>,
}

impl<S: KeyValueStore> SessionService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            policy: UnauthorizedPolicy::default(),
            changes: Arc::default(),
        }
    }

    pub fn with_policy(mut self, policy: UnauthorizedPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> UnauthorizedPolicy {
        self.policy
    }

    pub fn generation(&self) -> u64 {
        self.changes.generation.load(Ordering::Acquire)
    }

    /// Call `listener` with the new session after every `set` and `clear`
    /// made through this service or any of its clones. Listeners must not
    /// write the session themselves.
    pub fn subscribe(&self, listener: impl Fn(&Session) + Send + Sync + 'static) {
        self.changes
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(listener));
    }

    fn changed(&self, session: &Session) {
        let generation = self.changes.generation.fetch_add(1, Ordering::AcqRel) + 1;
        debug!(generation, "session changed");
        let listeners = self
            .changes
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        for listener in listeners.iter() {
            listener(session);
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn get(&self) -> Result<Session, StoreError> {
        let read = |key: &str| -> Result<Option<String>, StoreError> {
            Ok(self.store.get(key)?.filter(|v| !v.is_empty()))
        };
        Ok(Session {
            token: read(keys::TOKEN)?,
            username: read(keys::USERNAME)?,
            email: read(keys::EMAIL)?,
            phonenumber: read(keys::PHONENUMBER)?,
        })
    }

    /// Write every present field and remove every absent one.
    pub fn set(&mut self, session: &Session) -> Result<(), StoreError> {
        let fields = [
            (keys::TOKEN, &session.token),
            (keys::USERNAME, &session.username),
            (keys::EMAIL, &session.email),
            (keys::PHONENUMBER, &session.phonenumber),
        ];
        for (key, value) in fields {
            match value {
                Some(v) => self.store.set(key, v)?,
                None => self.store.remove(key)?,
            }
        }
        self.changed(session);
        Ok(())
    }

    pub fn update(&mut self, f: impl FnOnce(&mut Session)) -> Result<Session, StoreError> {
        let mut session = self.get()?;
        f(&mut session);
        self.set(&session)?;
        Ok(session)
    }

    pub fn clear(&mut self) -> Result<(), StoreError> {
        for key in keys::ALL {
            self.store.remove(key)?;
        }
        info!("session cleared");
        self.changed(&Session::default());
        Ok(())
    }

    /// Guard check run before any protected content renders.
    pub fn check(&self) -> Result<SessionCheck, StoreError> {
        let session = self.get()?;
        if session.is_authenticated() {
            Ok(SessionCheck::Authenticated(session))
        } else {
            debug!("no stored token; redirecting to login");
            Ok(SessionCheck::Unauthenticated)
        }
    }

    pub fn require_token(&self) -> Result<String, ClientError> {
        match self.check()? {
            SessionCheck::Authenticated(Session {
                token: Some(token), ..
            }) => Ok(token),
            _ => Err(ClientError::Unauthenticated),
        }
    }

    /// Apply the unauthorized policy to a failed request. Returns `true`
    /// when the session was cleared.
    pub fn handle_error(&mut self, err: &ClientError) -> Result<bool, StoreError> {
        match (err, self.policy) {
            (ClientError::AuthExpired { .. }, UnauthorizedPolicy::ClearSession) => {
                self.clear()?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::SharedStore;

    fn logged_in() -> SessionService<MemoryStore> {
        SessionService::new(MemoryStore::with_entries([
            (keys::TOKEN, "jwt"),
            (keys::USERNAME, "ana"),
            (keys::EMAIL, "ana@example.com"),
            (keys::PHONENUMBER, "5551234"),
        ]))
    }

    #[test]
    fn empty_store_is_unauthenticated() {
        let svc = SessionService::new(MemoryStore::new());
        assert_eq!(svc.check().unwrap(), SessionCheck::Unauthenticated);
        assert_eq!(svc.require_token(), Err(ClientError::Unauthenticated));
    }

    #[test]
    fn empty_token_counts_as_absent() {
        let svc = SessionService::new(MemoryStore::with_entries([(keys::TOKEN, "")]));
        assert_eq!(svc.check().unwrap(), SessionCheck::Unauthenticated);
    }

    #[test]
    fn stored_token_authenticates() {
        let svc = logged_in();
        let check = svc.check().unwrap();
        assert_eq!(check.token(), Some("jwt"));
        assert_eq!(svc.require_token().unwrap(), "jwt");
    }

    #[test]
    fn clear_removes_every_key_and_bumps_generation() {
        let mut svc = logged_in();
        let before = svc.generation();
        svc.clear().unwrap();
        assert!(svc.generation() > before);
        assert_eq!(svc.get().unwrap(), Session::default());
        for key in keys::ALL {
            assert_eq!(svc.store().get(key).unwrap(), None);
        }
    }

    #[test]
    fn clones_share_changes() {
        let mut writer = SessionService::new(SharedStore::default());
        let observer = writer.clone();

        let seen = Arc::new(Mutex::new(Vec::new()));
        {
            let seen = Arc::clone(&seen);
            observer.subscribe(move |s| seen.lock().unwrap().push(s.username.clone()));
        }

        writer.update(|s| s.username = Some("ana".into())).unwrap();
        assert_eq!(observer.generation(), 1);
        assert_eq!(observer.get().unwrap().username.as_deref(), Some("ana"));

        writer.clear().unwrap();
        assert_eq!(observer.generation(), 2);
        assert_eq!(*seen.lock().unwrap(), [Some("ana".to_string()), None]);
    }

    #[test]
    fn separate_services_track_changes_separately() {
        let store = SharedStore::default();
        let mut first = SessionService::new(store.clone());
        let second = SessionService::new(store);
        first.update(|s| s.token = Some("jwt".into())).unwrap();
        assert_eq!(first.generation(), 1);
        assert_eq!(second.generation(), 0);
        assert_eq!(second.require_token().unwrap(), "jwt");
    }

    #[test]
    fn set_removes_absent_fields() {
        let mut svc = logged_in();
        svc.update(|s| s.token = None).unwrap();
        let session = svc.get().unwrap();
        assert_eq!(session.token, None);
        assert_eq!(session.username.as_deref(), Some("ana"));
    }

    #[test]
    fn surface_policy_keeps_session_on_401() {
        let mut svc = logged_in();
        let err = ClientError::AuthExpired {
            message: "expired".into(),
        };
        assert!(!svc.handle_error(&err).unwrap());
        assert!(svc.check().unwrap().token().is_some());
    }

    #[test]
    fn clear_policy_drops_session_on_401_only() {
        let mut svc = logged_in().with_policy(UnauthorizedPolicy::ClearSession);
        let server = ClientError::Server {
            status: 500,
            message: "boom".into(),
        };
        assert!(!svc.handle_error(&server).unwrap());
        assert!(svc.check().unwrap().token().is_some());

        let expired = ClientError::AuthExpired {
            message: "expired".into(),
        };
        assert!(svc.handle_error(&expired).unwrap());
        assert_eq!(svc.check().unwrap(), SessionCheck::Unauthenticated);
    }
}
