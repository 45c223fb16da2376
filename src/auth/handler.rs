//! Session handling: serving access tokens and coordinating refreshes.
//!
//! At most one refresh runs per session at any time. The first caller to
//! observe an expired token spawns the refresh; every caller (that one
//! included) parks on a oneshot receiver and is released with the shared
//! outcome when the refresh settles. The refresh task is owned by no caller,
//! so a cancelled waiter never tears it down.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{oneshot, watch};
use tracing::{debug, info, warn};

use crate::auth::flow::MultifactorHandler;
use crate::config::Endpoints;
use crate::error::{Error, Result};
use crate::models::auth::MultifactorInfo;
use crate::models::session::{AccessToken, Session};

/// What to do when the session has expired and needs re-authentication.
#[derive(Clone, Default)]
pub enum ReauthBehavior {
    /// Don't try anything, just fail.
    #[default]
    NoReauth,
    /// Reauthenticate automatically with the stored credentials, failing
    /// immediately if a multifactor code turns out to be required.
    FailOnMfa,
    /// Reauthenticate automatically with the stored credentials, resolving
    /// multifactor challenges through the given handler.
    Full(Arc<dyn MultifactorHandler>),
}

impl std::fmt::Debug for ReauthBehavior {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoReauth => write!(f, "NoReauth"),
            Self::FailOnMfa => write!(f, "FailOnMfa"),
            Self::Full(_) => write!(f, "Full(..)"),
        }
    }
}

/// Handler that converts any multifactor challenge into an immediate,
/// synchronous session-expired failure.
struct FailOnMfaHandler;

#[async_trait]
impl MultifactorHandler for FailOnMfaHandler {
    async fn resolve_code(&self, _challenge: &MultifactorInfo) -> Result<String> {
        Err(Error::SessionExpired { mfa_required: true })
    }
}

/// The one outcome of a settled refresh, fanned out to every waiter.
#[derive(Clone)]
enum RefreshOutcome {
    Refreshed(AccessToken),
    Expired { mfa_required: bool },
    Failed(Arc<Error>),
}

impl RefreshOutcome {
    fn into_result(self) -> Result<AccessToken> {
        match self {
            Self::Refreshed(token) => Ok(token),
            Self::Expired { mfa_required } => Err(Error::SessionExpired { mfa_required }),
            Self::Failed(cause) => Err(Error::SessionResumptionFailure { cause }),
        }
    }
}

struct HandlerState {
    session: Session,
    reauth: ReauthBehavior,
    /// Waiters of the in-flight refresh; `Some` while one is running.
    refresh: Option<Vec<oneshot::Sender<RefreshOutcome>>>,
}

struct HandlerInner {
    http: reqwest::Client,
    endpoints: Endpoints,
    state: Mutex<HandlerState>,
    updates: watch::Sender<Session>,
}

/// Provides access to a session, refreshing it as needed.
///
/// Cheap to clone; clones share the same session.
#[derive(Clone)]
pub struct SessionHandler {
    inner: Arc<HandlerInner>,
}

impl SessionHandler {
    pub fn new(http: reqwest::Client, endpoints: Endpoints, session: Session) -> Self {
        let (updates, _) = watch::channel(session.clone());
        Self {
            inner: Arc::new(HandlerInner {
                http,
                endpoints,
                state: Mutex::new(HandlerState {
                    session,
                    reauth: ReauthBehavior::default(),
                    refresh: None,
                }),
                updates,
            }),
        }
    }

    /// A snapshot of the current session.
    pub fn session(&self) -> Session {
        self.inner.lock_state().session.clone()
    }

    /// Subscribe to session updates (successful refreshes and expiry marks),
    /// e.g. to persist the session when it changes.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.inner.updates.subscribe()
    }

    pub fn set_reauth_behavior(&self, behavior: ReauthBehavior) {
        self.inner.lock_state().reauth = behavior;
    }

    /// Mark the session expired, e.g. after an out-of-band invalidation.
    pub fn mark_expired(&self) {
        let session = {
            let mut state = self.inner.lock_state();
            state.session.has_expired = true;
            state.session.clone()
        };
        let _ = self.inner.updates.send(session);
    }

    /// Get a valid access token, refreshing the session if necessary.
    ///
    /// Returns immediately with no network activity while the current token
    /// is valid. Otherwise either starts the (sole) refresh or joins the one
    /// already in flight; either way the caller receives the refresh's shared
    /// outcome.
    pub async fn get_access_token(&self) -> Result<AccessToken> {
        let receiver = {
            let mut guard = self.inner.lock_state();
            let state = &mut *guard;
            if !state.session.access_token.is_expired() {
                return Ok(state.session.access_token.clone());
            }

            let (sender, receiver) = oneshot::channel();
            match &mut state.refresh {
                Some(waiters) => {
                    debug!("session refresh in flight; waiting");
                    waiters.push(sender);
                }
                None => {
                    let handler = match &state.reauth {
                        ReauthBehavior::NoReauth => {
                            return Err(Error::SessionExpired {
                                mfa_required: false,
                            });
                        }
                        ReauthBehavior::FailOnMfa => {
                            Arc::new(FailOnMfaHandler) as Arc<dyn MultifactorHandler>
                        }
                        ReauthBehavior::Full(handler) => Arc::clone(handler),
                    };
                    info!("session expired; starting refresh");
                    state.refresh = Some(vec![sender]);
                    let inner = Arc::clone(&self.inner);
                    let session = state.session.clone();
                    tokio::spawn(inner.drive_refresh(session, handler));
                }
            }
            receiver
        };

        match receiver.await {
            Ok(outcome) => outcome.into_result(),
            // The refresh task cannot settle without sending; treat a dropped
            // channel as an opaque resumption failure.
            Err(_) => Err(Error::SessionResumptionFailure {
                cause: Arc::new(Error::Config("session refresh task was aborted".into())),
            }),
        }
    }
}

impl HandlerInner {
    fn lock_state(&self) -> std::sync::MutexGuard<'_, HandlerState> {
        self.state.lock().expect("session state lock poisoned")
    }

    /// Run one refresh to completion and release every waiter with the same
    /// outcome. The session and the waiter queue are updated under one lock
    /// acquisition, so no waiter can observe a half-settled state.
    async fn drive_refresh(self: Arc<Self>, mut session: Session, handler: Arc<dyn MultifactorHandler>) {
        let result = session
            .refresh(&self.http, &self.endpoints, Some(handler))
            .await;

        let (outcome, waiters, snapshot) = {
            let mut guard = self.lock_state();
            let state = &mut *guard;
            let (outcome, snapshot) = match result {
                Ok(()) => {
                    info!("session refreshed");
                    session.has_expired = false;
                    state.session = session;
                    (
                        RefreshOutcome::Refreshed(state.session.access_token.clone()),
                        Some(state.session.clone()),
                    )
                }
                Err(Error::SessionExpired { mfa_required }) => {
                    warn!(mfa_required, "session expired unrecoverably");
                    state.session.has_expired = true;
                    (
                        RefreshOutcome::Expired { mfa_required },
                        Some(state.session.clone()),
                    )
                }
                // The session is untouched; nothing to broadcast.
                Err(error) => {
                    warn!(%error, "session resumption failed");
                    (RefreshOutcome::Failed(Arc::new(error)), None)
                }
            };
            let waiters = state.refresh.take().unwrap_or_default();
            (outcome, waiters, snapshot)
        };

        if let Some(snapshot) = snapshot {
            let _ = self.updates.send(snapshot);
        }
        for waiter in waiters {
            // A waiter may have been cancelled; that is not our concern.
            let _ = waiter.send(outcome.clone());
        }
    }
}

impl std::fmt::Debug for SessionHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.lock_state();
        f.debug_struct("SessionHandler")
            .field("user_id", &state.session.user_id)
            .field("has_expired", &state.session.has_expired)
            .field("reauth", &state.reauth)
            .field("refresh_in_flight", &state.refresh.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::cookies::CookieJar;
    use crate::models::location::Location;
    use crate::models::session::Credentials;
    use chrono::{TimeDelta, Utc};

    fn session(expires_in: i64) -> Session {
        Session {
            credentials: Credentials::new("user", "pass"),
            access_token: AccessToken {
                kind: "Bearer".into(),
                token: "ACCESS".into(),
                id_token: "ID".into(),
                expires_at: Utc::now() + TimeDelta::seconds(expires_in),
            },
            entitlements_token: "ENT".into(),
            cookies: CookieJar::default(),
            location: Location::europe(),
            user_id: uuid::Uuid::new_v4(),
            has_expired: false,
        }
    }

    fn handler(session: Session) -> SessionHandler {
        // The endpoints point nowhere; tests relying on them would fail with
        // a network error rather than the typed errors asserted below.
        SessionHandler::new(
            reqwest::Client::new(),
            Endpoints::local("http://127.0.0.1:1"),
            session,
        )
    }

    #[tokio::test]
    async fn test_valid_token_returned_without_refresh() {
        let handler = handler(session(3600));
        let token = handler.get_access_token().await.unwrap();
        assert_eq!(token.token, "ACCESS");
    }

    #[tokio::test]
    async fn test_no_reauth_fails_synchronously() {
        let handler = handler(session(-10));
        let error = handler.get_access_token().await.unwrap_err();
        assert!(matches!(
            error,
            Error::SessionExpired {
                mfa_required: false
            }
        ));
    }

    #[tokio::test]
    async fn test_mark_expired_notifies_subscribers() {
        let handler = handler(session(3600));
        let mut updates = handler.subscribe();
        assert!(!updates.borrow().has_expired);

        handler.mark_expired();
        updates.changed().await.unwrap();
        assert!(updates.borrow().has_expired);
        assert!(handler.session().has_expired);
    }
}
