//! Wire types for the authorization protocol.

use serde::{Deserialize, Serialize};

use crate::config;

/// Body of the stateless authorization probe (POST).
#[derive(Debug, Serialize)]
pub(crate) struct ProbeRequest {
    pub client_id: &'static str,
    pub response_type: &'static str,
    pub redirect_uri: &'static str,
    pub scope: &'static str,
    pub nonce: u32,
}

impl Default for ProbeRequest {
    fn default() -> Self {
        Self {
            client_id: config::AUTH_CLIENT_ID,
            response_type: config::AUTH_RESPONSE_TYPE,
            redirect_uri: config::AUTH_REDIRECT_URI,
            scope: config::AUTH_SCOPE,
            nonce: 1,
        }
    }
}

/// Body of the credentials round (PUT).
#[derive(Debug, Serialize)]
pub(crate) struct CredentialsRequest<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub username: &'a str,
    pub password: &'a str,
    pub remember: bool,
}

impl<'a> CredentialsRequest<'a> {
    pub fn new(username: &'a str, password: &'a str) -> Self {
        Self {
            kind: "auth",
            username,
            password,
            remember: true,
        }
    }
}

/// Body of a multifactor code submission (PUT).
///
/// This request keeps the service's camelCase key for `rememberDevice`; the
/// auth service does not accept snake_case here.
#[derive(Debug, Serialize)]
pub(crate) struct MultifactorRequest<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub code: &'a str,
    #[serde(rename = "rememberDevice")]
    pub remember_device: bool,
}

impl<'a> MultifactorRequest<'a> {
    pub fn new(code: &'a str) -> Self {
        Self {
            kind: "multifactor",
            code,
            remember_device: true,
        }
    }
}

/// Every response the authorization endpoint can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum AuthResponseType {
    /// Login (or further login input) is required; as a response to a
    /// credentials round this means the credentials were rejected.
    Auth,
    /// Terminal success carrying the token redirect.
    Response,
    /// Server-side error.
    Error,
    /// A multifactor code is required (again, if a bad code was submitted).
    Multifactor,
}

/// A response from the authorization endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct AuthResponse {
    #[serde(rename = "type")]
    pub kind: AuthResponseType,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub response: Option<TokenRedirect>,
    #[serde(default)]
    pub multifactor: Option<MultifactorInfo>,
}

/// The redirect payload of a successful authorization.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenRedirect {
    /// Expected to be `fragment`.
    pub mode: String,
    pub parameters: TokenRedirectParameters,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenRedirectParameters {
    /// Redirect URI whose fragment carries the token fields.
    pub uri: String,
}

/// A multifactor challenge, presented to the [`MultifactorHandler`] so it can
/// produce the out-of-band code.
///
/// [`MultifactorHandler`]: crate::auth::MultifactorHandler
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MultifactorInfo {
    /// Challenge version, e.g. `v2`.
    #[serde(rename = "mfaVersion")]
    pub version: String,
    /// Number of digits in the expected code.
    #[serde(rename = "multiFactorCodeLength")]
    pub code_length: u32,
    /// The method the server has chosen (currently always email).
    pub method: String,
    /// Other methods that are available.
    pub methods: Vec<String>,
    /// The address the code was sent to; mostly blanked out.
    pub email: String,
}

/// Response of the entitlements endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct EntitlementsResponse {
    pub entitlements_token: String,
}

/// Response of the userinfo endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct UserInfoResponse {
    pub sub: uuid::Uuid,
}

/// Body of the region-affinity lookup (PUT).
#[derive(Debug, Serialize)]
pub(crate) struct RegionAffinityRequest<'a> {
    pub id_token: &'a str,
}

/// Response of the region-affinity endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct RegionAffinityResponse {
    pub affinities: RegionAffinities,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RegionAffinities {
    pub live: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_body_wire_names() {
        let body = serde_json::to_value(ProbeRequest::default()).unwrap();
        assert_eq!(body["client_id"], "play-valorant-web-prod");
        assert_eq!(body["response_type"], "token id_token");
        assert_eq!(body["redirect_uri"], "https://playvalorant.com/");
        assert_eq!(body["scope"], "account openid");
        assert_eq!(body["nonce"], 1);
    }

    #[test]
    fn test_multifactor_body_keeps_camel_case() {
        let body = serde_json::to_value(MultifactorRequest::new("123456")).unwrap();
        assert_eq!(body["type"], "multifactor");
        assert_eq!(body["code"], "123456");
        assert_eq!(body["rememberDevice"], true);
    }

    #[test]
    fn test_decode_multifactor_response() {
        let response: AuthResponse = serde_json::from_str(
            r#"{
                "type": "multifactor",
                "multifactor": {
                    "email": "jul**@****.com",
                    "method": "email",
                    "methods": ["email"],
                    "multiFactorCodeLength": 6,
                    "mfaVersion": "v2"
                }
            }"#,
        )
        .unwrap();
        assert_eq!(response.kind, AuthResponseType::Multifactor);
        let info = response.multifactor.unwrap();
        assert_eq!(info.code_length, 6);
        assert_eq!(info.method, "email");
        assert_eq!(info.email, "jul**@****.com");
    }

    #[test]
    fn test_decode_probe_auth_response() {
        // Extra fields like `country` are ignored.
        let response: AuthResponse =
            serde_json::from_str(r#"{ "type": "auth", "country": "che" }"#).unwrap();
        assert_eq!(response.kind, AuthResponseType::Auth);
        assert!(response.error.is_none());
    }
}
