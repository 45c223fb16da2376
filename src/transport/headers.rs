//! Game-API header construction.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};

use crate::models::session::AccessToken;

/// Entitlements token header.
pub const ENTITLEMENTS_JWT: &str = "x-riot-entitlements-jwt";
/// Client version header; many endpoints reject requests without it.
pub const CLIENT_VERSION: &str = "x-riot-clientversion";
/// Base64-encoded platform info header.
pub const CLIENT_PLATFORM: &str = "x-riot-clientplatform";

/// Build the standard headers for game-API requests.
pub fn game_api_headers(
    token: &AccessToken,
    entitlements_token: &str,
    client_version: Option<&str>,
    platform: &str,
) -> HeaderMap {
    let mut headers = HeaderMap::new();

    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&token.encoded())
            .unwrap_or_else(|_| HeaderValue::from_static("Bearer invalid")),
    );

    headers.insert(
        HeaderName::from_static(ENTITLEMENTS_JWT),
        HeaderValue::from_str(entitlements_token)
            .unwrap_or_else(|_| HeaderValue::from_static("")),
    );

    if let Some(version) = client_version {
        headers.insert(
            HeaderName::from_static(CLIENT_VERSION),
            HeaderValue::from_str(version).unwrap_or_else(|_| HeaderValue::from_static("")),
        );
    }

    headers.insert(
        HeaderName::from_static(CLIENT_PLATFORM),
        HeaderValue::from_str(platform).unwrap_or_else(|_| HeaderValue::from_static("")),
    );

    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_game_api_headers() {
        let token = AccessToken {
            kind: "Bearer".into(),
            token: "ACCESS".into(),
            id_token: "ID".into(),
            expires_at: Utc::now(),
        };
        let headers = game_api_headers(&token, "ENT", Some("release-01.00"), "cGxhdGZvcm0=");
        assert_eq!(headers[AUTHORIZATION], "Bearer ACCESS");
        assert_eq!(headers[ENTITLEMENTS_JWT], "ENT");
        assert_eq!(headers[CLIENT_VERSION], "release-01.00");
        assert_eq!(headers[CLIENT_PLATFORM], "cGxhdGZvcm0=");
    }

    #[test]
    fn test_client_version_optional() {
        let token = AccessToken {
            kind: "Bearer".into(),
            token: "T".into(),
            id_token: "I".into(),
            expires_at: Utc::now(),
        };
        let headers = game_api_headers(&token, "ENT", None, "p");
        assert!(headers.get(CLIENT_VERSION).is_none());
    }
}
