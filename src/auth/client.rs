//! HTTP transport for the auth, entitlements, and geo services.

use std::sync::Mutex;

use reqwest::header::{AUTHORIZATION, COOKIE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::auth::cookies::CookieJar;
use crate::config::{self, Endpoints};
use crate::error::{retry_after_seconds, Error, Result};
use crate::models::auth::{
    AuthResponse, CredentialsRequest, EntitlementsResponse, MultifactorRequest, ProbeRequest,
    RegionAffinityRequest, RegionAffinityResponse, UserInfoResponse,
};
use crate::models::location::Location;
use crate::models::session::{AccessToken, Credentials};

/// Client for the login protocol and its sibling auth endpoints.
///
/// Operates on a snapshot of the session's cookie jar: cookies are applied to
/// every request and `Set-Cookie` response headers are merged back in, so the
/// updated jar can be handed back to the session atomically at the end of a
/// round.
pub(crate) struct AuthClient {
    http: reqwest::Client,
    endpoints: Endpoints,
    jar: Mutex<CookieJar>,
    access_token: Option<AccessToken>,
}

impl AuthClient {
    pub fn new(http: reqwest::Client, endpoints: Endpoints, jar: CookieJar) -> Self {
        Self {
            http,
            endpoints,
            jar: Mutex::new(jar),
            access_token: None,
        }
    }

    /// The current cookie set.
    pub fn cookies(&self) -> CookieJar {
        self.jar.lock().expect("cookie jar lock poisoned").clone()
    }

    /// Discard all cookies, e.g. after the server rejected the session they
    /// represent.
    pub fn clear_cookies(&self) {
        self.jar.lock().expect("cookie jar lock poisoned").clear();
    }

    /// Attach the access token used for the post-login lookups.
    pub fn set_access_token(&mut self, token: AccessToken) {
        self.access_token = Some(token);
    }

    /// Send the stateless authorization probe.
    pub async fn probe(&self) -> Result<AuthResponse> {
        self.send(
            Method::POST,
            format!("{}{}", self.endpoints.auth_base, config::AUTHORIZATION_PATH),
            Some(&ProbeRequest::default()),
        )
        .await
    }

    /// Submit credentials for the current authorization session.
    pub async fn submit_credentials(&self, credentials: &Credentials) -> Result<AuthResponse> {
        self.send(
            Method::PUT,
            format!("{}{}", self.endpoints.auth_base, config::AUTHORIZATION_PATH),
            Some(&CredentialsRequest::new(
                &credentials.username,
                &credentials.password,
            )),
        )
        .await
    }

    /// Submit a multifactor code.
    pub async fn submit_multifactor_code(&self, code: &str) -> Result<AuthResponse> {
        self.send(
            Method::PUT,
            format!("{}{}", self.endpoints.auth_base, config::AUTHORIZATION_PATH),
            Some(&MultifactorRequest::new(code)),
        )
        .await
    }

    /// Fetch the entitlements token for the authenticated user.
    pub async fn fetch_entitlements_token(&self) -> Result<String> {
        let response: EntitlementsResponse = self
            .send(
                Method::POST,
                format!(
                    "{}{}",
                    self.endpoints.entitlements_base,
                    config::ENTITLEMENTS_PATH
                ),
                Some(&serde_json::json!({})),
            )
            .await?;
        Ok(response.entitlements_token)
    }

    /// Fetch the authenticated user's ID.
    pub async fn fetch_user_id(&self) -> Result<uuid::Uuid> {
        let response: UserInfoResponse = self
            .send::<(), _>(
                Method::GET,
                format!("{}{}", self.endpoints.auth_base, config::USERINFO_PATH),
                None,
            )
            .await?;
        Ok(response.sub)
    }

    /// Resolve the user's live region into a known location.
    pub async fn fetch_location(&self, token: &AccessToken) -> Result<Location> {
        let response: RegionAffinityResponse = self
            .send(
                Method::PUT,
                format!("{}{}", self.endpoints.geo_base, config::REGION_AFFINITY_PATH),
                Some(&RegionAffinityRequest {
                    id_token: &token.id_token,
                }),
            )
            .await?;
        let region = response.affinities.live;
        Location::for_region(&region).ok_or(Error::UnknownRegion { region })
    }

    async fn send<B, T>(&self, method: Method, url: String, body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self.http.request(method.clone(), &url);
        if let Some(header) = self.cookies().header_value() {
            request = request.header(COOKIE, header);
        }
        if let Some(token) = &self.access_token {
            request = request.header(AUTHORIZATION, token.encoded());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        debug!(%method, url = url.as_str(), status = status.as_u16(), "auth exchange");

        self.jar
            .lock()
            .expect("cookie jar lock poisoned")
            .merge_from_headers(response.headers());

        if !status.is_success() {
            let retry_after = retry_after_seconds(response.headers());
            let body = response.bytes().await.unwrap_or_default();
            return Err(Error::classify(status.as_u16(), retry_after, &body));
        }

        Ok(response.json().await?)
    }
}
