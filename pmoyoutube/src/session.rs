//! Sessions utilisateur en mémoire
//!
//! Une session est créée à la fin du flux OAuth et référencée par le cookie
//! [`SESSION_COOKIE`]. Elle porte le token d'accès YouTube de l'utilisateur et
//! son expiration ; une session expirée est traitée comme absente.

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Nom du cookie de session
pub const SESSION_COOKIE: &str = "pmotube_session";

/// Durée de validité d'un `state` OAuth en attente
const OAUTH_STATE_TTL_MINUTES: i64 = 10;

/// Session d'un utilisateur connecté
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: String,
    /// Id de la chaîne YouTube de l'utilisateur
    pub user_id: String,
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

#[derive(Debug, Default)]
struct Inner {
    sessions: HashMap<String, Session>,
    pending_states: HashMap<String, DateTime<Utc>>,
}

/// Stockage partagé des sessions et des `state` OAuth en attente
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<Inner>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Crée une session et retourne une copie
    ///
    /// Les sessions expirées sont purgées au passage.
    pub fn create(
        &self,
        user_id: impl Into<String>,
        access_token: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Session {
        let session = Session {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            access_token: access_token.into(),
            expires_at,
        };

        let mut inner = self.inner.write();
        let before = inner.sessions.len();
        inner.sessions.retain(|_, s| !s.is_expired());
        let pruned = before - inner.sessions.len();
        inner.sessions.insert(session.id.clone(), session.clone());

        debug!(user_id = %session.user_id, pruned, "Session created");
        session
    }

    /// Retourne la session si elle existe et n'a pas expiré
    ///
    /// Une session expirée est retirée du stockage.
    pub fn get(&self, id: &str) -> Option<Session> {
        let session = self.inner.read().sessions.get(id).cloned()?;
        if session.is_expired() {
            debug!(user_id = %session.user_id, "Session expired");
            self.remove(id);
            return None;
        }
        Some(session)
    }

    /// Supprime une session, retourne vrai si elle existait
    pub fn remove(&self, id: &str) -> bool {
        self.inner.write().sessions.remove(id).is_some()
    }

    /// Nombre de sessions enregistrées (expirées incluses)
    pub fn len(&self) -> usize {
        self.inner.read().sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Génère et mémorise un `state` OAuth
    pub fn new_oauth_state(&self) -> String {
        let state = Uuid::new_v4().simple().to_string();
        let mut inner = self.inner.write();
        let now = Utc::now();
        inner.pending_states.retain(|_, expires| *expires > now);
        inner.pending_states.insert(
            state.clone(),
            now + Duration::minutes(OAUTH_STATE_TTL_MINUTES),
        );
        state
    }

    /// Consomme un `state` OAuth ; faux s'il est inconnu ou périmé
    pub fn take_oauth_state(&self, state: &str) -> bool {
        match self.inner.write().pending_states.remove(state) {
            Some(expires) => expires > Utc::now(),
            None => false,
        }
    }
}

#[cfg(feature = "pmoserver")]
mod cookies {
    use super::{SESSION_COOKIE, Session, SessionStore};
    use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

    impl SessionStore {
        /// Session référencée par le cookie de la requête
        pub fn session_for(&self, jar: &CookieJar) -> Option<Session> {
            jar.get(SESSION_COOKIE).and_then(|c| self.get(c.value()))
        }
    }

    /// Cookie portant l'id de session
    pub fn session_cookie(session_id: &str) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, session_id.to_string()))
            .http_only(true)
            .same_site(SameSite::Lax)
            .path("/")
            .build()
    }

    /// Cookie vide servant à effacer le cookie de session
    pub fn removal_cookie() -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, "")).path("/").build()
    }
}

#[cfg(feature = "pmoserver")]
pub use cookies::{removal_cookie, session_cookie};
