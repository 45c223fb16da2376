//! Main client entry point.

use std::sync::Arc;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::watch;
use tracing::info;
use uuid::Uuid;

use crate::auth::flow::MultifactorHandler;
use crate::auth::handler::{ReauthBehavior, SessionHandler};
use crate::config::{Endpoints, CONNECT_TIMEOUT, REQUEST_TIMEOUT};
use crate::error::{Error, Result};
use crate::models::location::Location;
use crate::models::session::{Credentials, Session};
use crate::transport::http::ValorantHttpClient;
use crate::transport::log::Exchange;

/// Valorant player-data API client.
///
/// Holds one session and keeps it fresh through the session handler; all
/// game-API requests carry the session's auth headers and surface typed
/// errors.
///
/// # Examples
///
/// ```rust,no_run
/// use valorant_gateway::{Credentials, ValorantClient};
/// # use std::sync::Arc;
/// # use valorant_gateway::MultifactorHandler;
/// # async fn example(mfa: Arc<dyn MultifactorHandler>) -> valorant_gateway::Result<()> {
/// let client = ValorantClient::builder()
///     .client_version("release-08.05-shipping-5-2402529")
///     .login(Credentials::new("username", "password"), mfa)
///     .await?;
///
/// // Persist the session so the next run can resume without a password.
/// let session = client.session();
/// # let _ = session;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ValorantClient {
    handler: SessionHandler,
    http: Arc<ValorantHttpClient>,
    endpoints: Endpoints,
    /// The location requests are made in. Sessions are valid for all
    /// locations.
    location: Location,
    user_id: Uuid,
}

impl ValorantClient {
    /// Create a builder for configuring the client.
    pub fn builder() -> ValorantClientBuilder {
        ValorantClientBuilder::new()
    }

    /// The ID of the user owning this client's session.
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    /// The location this client makes requests in.
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// A version of this client targeting a different location.
    ///
    /// Cheap: the session and transport are shared with the new instance.
    /// With `None` this just returns a clone.
    pub fn in_location(&self, location: Option<Location>) -> Self {
        let mut client = self.clone();
        if let Some(location) = location {
            client.location = location;
        }
        client
    }

    /// A snapshot of the current session, e.g. for persistence.
    pub fn session(&self) -> Session {
        self.handler.session()
    }

    /// Watch for session updates (refreshes and expiry marks), e.g. to
    /// persist the session whenever it changes.
    pub fn session_updates(&self) -> watch::Receiver<Session> {
        self.handler.subscribe()
    }

    /// Configure what happens when the session expires.
    pub fn set_reauth_behavior(&self, behavior: ReauthBehavior) {
        self.handler.set_reauth_behavior(behavior);
    }

    /// Mark the session expired, e.g. after an out-of-band invalidation.
    pub fn mark_session_expired(&self) {
        self.handler.mark_expired();
    }

    /// The session handler serving tokens for this client.
    pub fn session_handler(&self) -> &SessionHandler {
        &self.handler
    }

    /// A log of the last few exchanges with the game API.
    pub fn exchange_log(&self) -> Vec<Exchange> {
        self.http.exchange_log()
    }

    /// URL of a game-API path for the current location.
    pub fn game_url(&self, path: &str) -> String {
        format!("{}{}", self.endpoints.game_base(&self.location), path)
    }

    /// URL of a live-game path for the current location.
    pub fn live_game_url(&self, path: &str) -> String {
        format!("{}{}", self.endpoints.live_game_base(&self.location), path)
    }

    /// GET a game-API path and decode the response.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.http
            .send_json::<(), T>(Method::GET, &self.game_url(path), None)
            .await
    }

    /// POST a JSON body to a game-API path and decode the response.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.http
            .send_json(Method::POST, &self.game_url(path), Some(body))
            .await
    }

    /// PUT a JSON body to a game-API path and decode the response.
    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.http
            .send_json(Method::PUT, &self.game_url(path), Some(body))
            .await
    }

    /// Send a request to an arbitrary URL (e.g. a live-game endpoint) with
    /// the session's auth headers.
    pub async fn send_json<B, T>(&self, method: Method, url: &str, body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.http.send_json(method, url, body).await
    }
}

impl std::fmt::Debug for ValorantClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValorantClient")
            .field("user_id", &self.user_id)
            .field("location", &self.location)
            .finish()
    }
}

/// Builder for [`ValorantClient`].
pub struct ValorantClientBuilder {
    endpoints: Endpoints,
    client_version: Option<String>,
    reauth: ReauthBehavior,
    reqwest_client: Option<reqwest::Client>,
    cookies_from: Option<Session>,
}

impl ValorantClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            endpoints: Endpoints::default(),
            client_version: None,
            reauth: ReauthBehavior::default(),
            reqwest_client: None,
            cookies_from: None,
        }
    }

    /// Override the API endpoints (useful for testing).
    pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Set the client version sent with game-API requests. Many endpoints
    /// reject requests without it; a third-party source is
    /// <https://valorant-api.com/v1/version>.
    pub fn client_version(mut self, version: impl Into<String>) -> Self {
        self.client_version = Some(version.into());
        self
    }

    /// Set the behavior when the session expires.
    pub fn reauth_behavior(mut self, behavior: ReauthBehavior) -> Self {
        self.reauth = behavior;
        self
    }

    /// Set a custom reqwest client.
    pub fn reqwest_client(mut self, client: reqwest::Client) -> Self {
        self.reqwest_client = Some(client);
        self
    }

    /// Carry cookies over from a previous session when logging in, letting
    /// the probe short-circuit the credential rounds.
    pub fn cookies_from(mut self, session: Session) -> Self {
        self.cookies_from = Some(session);
        self
    }

    /// Build the client around an existing session.
    pub fn build(self, session: Session) -> Result<ValorantClient> {
        let http = match self.reqwest_client {
            Some(client) => client,
            None => reqwest::Client::builder()
                .connect_timeout(CONNECT_TIMEOUT)
                .timeout(REQUEST_TIMEOUT)
                .build()
                .map_err(Error::Network)?,
        };

        let user_id = session.user_id;
        let location = session.location.clone();
        let handler = SessionHandler::new(http.clone(), self.endpoints.clone(), session);
        handler.set_reauth_behavior(self.reauth);
        let transport = Arc::new(ValorantHttpClient::new(
            http,
            handler.clone(),
            self.client_version,
        ));

        info!(%user_id, "ValorantClient initialized");
        Ok(ValorantClient {
            handler,
            http: transport,
            endpoints: self.endpoints,
            location,
            user_id,
        })
    }

    /// Run the full login protocol and build the client around the new
    /// session.
    pub async fn login(
        self,
        credentials: Credentials,
        handler: Arc<dyn MultifactorHandler>,
    ) -> Result<ValorantClient> {
        let http = match &self.reqwest_client {
            Some(client) => client.clone(),
            None => reqwest::Client::builder()
                .connect_timeout(CONNECT_TIMEOUT)
                .timeout(REQUEST_TIMEOUT)
                .build()
                .map_err(Error::Network)?,
        };

        let session = Session::login(
            &http,
            &self.endpoints,
            credentials,
            handler,
            self.cookies_from.as_ref(),
        )
        .await?;

        self.reqwest_client(http).build(session)
    }
}

impl Default for ValorantClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
