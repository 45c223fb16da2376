//! Configuration constants and endpoint construction for the Riot APIs.

use std::time::Duration;

use crate::models::location::Location;

/// Safety margin for token expiry checks; a token this close to expiry is
/// treated as already expired so we never race the server clock.
pub const EXPIRY_SAFETY_MARGIN: Duration = Duration::from_secs(30);

/// Default capacity of the diagnostic exchange log.
pub const DEFAULT_LOG_CAPACITY: usize = 50;

/// Connect timeout for HTTP requests.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default timeout for requests.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// OAuth client ID the web player API accepts.
pub const AUTH_CLIENT_ID: &str = "play-valorant-web-prod";

/// Token response type requested during the authorization probe.
pub const AUTH_RESPONSE_TYPE: &str = "token id_token";

/// Redirect URI registered for the web client.
pub const AUTH_REDIRECT_URI: &str = "https://playvalorant.com/";

/// OAuth scopes requested during login.
pub const AUTH_SCOPE: &str = "account openid";

/// Path of the authorization endpoint (probe via POST, credentials and
/// multifactor rounds via PUT).
pub const AUTHORIZATION_PATH: &str = "/api/v1/authorization";

/// Path of the entitlements token endpoint, relative to the entitlements host.
pub const ENTITLEMENTS_PATH: &str = "/token/v1";

/// Path of the userinfo endpoint, relative to the auth host.
pub const USERINFO_PATH: &str = "/userinfo";

/// Path of the region-affinity endpoint, relative to the geo host.
pub const REGION_AFFINITY_PATH: &str = "/pas/v1/product/valorant";

const AUTH_BASE: &str = "https://auth.riotgames.com";
const ENTITLEMENTS_BASE: &str = "https://entitlements.auth.riotgames.com/api";
const GEO_BASE: &str = "https://riot-geo.pas.si.riotgames.com";

/// The set of base URLs the client talks to.
///
/// Defaults to the production Riot hosts; every host can be overridden,
/// which is how the test suite points the client at a local mock server.
#[derive(Debug, Clone)]
pub struct Endpoints {
    /// Auth service host (authorization + userinfo).
    pub auth_base: String,
    /// Entitlements service host.
    pub entitlements_base: String,
    /// Geo/affinity service host.
    pub geo_base: String,
    /// When set, replaces the per-shard game-API host.
    pub game_base_override: Option<String>,
    /// When set, replaces the per-region live-game host.
    pub live_base_override: Option<String>,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            auth_base: AUTH_BASE.to_string(),
            entitlements_base: ENTITLEMENTS_BASE.to_string(),
            geo_base: GEO_BASE.to_string(),
            game_base_override: None,
            live_base_override: None,
        }
    }
}

impl Endpoints {
    /// Point every host at a single base URL (for tests against a mock server).
    pub fn local(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            auth_base: base.clone(),
            entitlements_base: format!("{}/entitlements/api", base),
            geo_base: base.clone(),
            game_base_override: Some(base.clone()),
            live_base_override: Some(base),
        }
    }

    /// Game-API host for a location. Sessions are valid for all shards.
    pub fn game_base(&self, location: &Location) -> String {
        match &self.game_base_override {
            Some(base) => base.clone(),
            None => format!("https://pd.{}.a.pvp.net", location.shard),
        }
    }

    /// Live-game host for a location.
    pub fn live_game_base(&self, location: &Location) -> String {
        match &self.live_base_override {
            Some(base) => base.clone(),
            None => format!(
                "https://glz-{}-1.{}.a.pvp.net",
                location.region, location.shard
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_base_uses_shard() {
        let endpoints = Endpoints::default();
        assert_eq!(
            endpoints.game_base(&Location::europe()),
            "https://pd.eu.a.pvp.net"
        );
        assert_eq!(
            endpoints.game_base(&Location::latin_america()),
            "https://pd.na.a.pvp.net"
        );
    }

    #[test]
    fn test_live_game_base_uses_region_and_shard() {
        let endpoints = Endpoints::default();
        assert_eq!(
            endpoints.live_game_base(&Location::europe()),
            "https://glz-eu-1.eu.a.pvp.net"
        );
        assert_eq!(
            endpoints.live_game_base(&Location::brazil()),
            "https://glz-br-1.na.a.pvp.net"
        );
    }

    #[test]
    fn test_override_wins() {
        let endpoints = Endpoints::local("http://127.0.0.1:9999");
        assert_eq!(
            endpoints.game_base(&Location::europe()),
            "http://127.0.0.1:9999"
        );
        assert_eq!(endpoints.auth_base, "http://127.0.0.1:9999");
    }
}
