//! The login protocol: cookie probe, credential submission, the multifactor
//! loop, and token extraction.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use tracing::{debug, info, warn};

use crate::auth::client::AuthClient;
use crate::config::Endpoints;
use crate::error::{Error, Result};
use crate::models::auth::{AuthResponseType, MultifactorInfo};
use crate::models::session::{AccessToken, Credentials, Session};

/// Resolves a multifactor challenge to the out-of-band code.
///
/// The handler fully governs retry and abort: an incorrect code produces
/// another challenge and another call, with no retry cap imposed here. The
/// wait is unbounded by design (a human may be reading an email) - callers
/// that need a timeout must impose one inside their handler.
#[async_trait]
pub trait MultifactorHandler: Send + Sync {
    /// Produce the code for the given challenge, or fail to abort the login.
    async fn resolve_code(&self, challenge: &MultifactorInfo) -> Result<String>;
}

/// How to behave when there is no valid cookie session and a login would be
/// required.
pub(crate) enum LoginBehavior {
    /// Only allow cookie-based resumption.
    Resume,
    /// Allow a fresh login with these credentials, resolving multifactor
    /// challenges through the handler.
    Allow {
        credentials: Credentials,
        handler: Arc<dyn MultifactorHandler>,
    },
}

/// Drive the auth service through the login protocol until it yields a token.
pub(crate) async fn negotiate_access_token(
    client: &AuthClient,
    behavior: &LoginBehavior,
) -> Result<AccessToken> {
    let probe = client.probe().await?;

    let mut response = match probe.kind {
        AuthResponseType::Auth => {
            let LoginBehavior::Allow { credentials, .. } = behavior else {
                return Err(Error::SessionExpired {
                    mfa_required: false,
                });
            };

            if let Some(error) = &probe.error {
                // The server rejected the cookie session outright; a stale
                // partial jar must not be left half-applied.
                warn!(error = error.as_str(), "session rejected; discarding cookies");
                client.clear_cookies();
                let _ = client.probe().await?;
            }

            client.submit_credentials(credentials).await?
        }
        _ => probe,
    };

    loop {
        match response.kind {
            AuthResponseType::Auth => {
                return Err(Error::AuthenticationFailed {
                    message: response
                        .error
                        .unwrap_or_else(|| "<no message given>".to_string()),
                });
            }
            AuthResponseType::Error => {
                return Err(Error::UnexpectedAuthError {
                    message: response.error,
                });
            }
            AuthResponseType::Multifactor => {
                let LoginBehavior::Allow { handler, .. } = behavior else {
                    return Err(Error::SessionExpired {
                        mfa_required: false,
                    });
                };
                // error is "multifactor_attempt_failed" when a bad code was given
                let challenge = response.multifactor.ok_or(Error::MissingAuthPayload {
                    context: "multifactor",
                })?;
                debug!(method = challenge.method.as_str(), "multifactor code required");
                let code = handler.resolve_code(&challenge).await?;
                response = client.submit_multifactor_code(&code).await?;
            }
            AuthResponseType::Response => {
                let redirect = response.response.ok_or(Error::MissingAuthPayload {
                    context: "response",
                })?;
                if redirect.mode != "fragment" {
                    return Err(Error::MalformedAccessToken { missing: "fragment" });
                }
                return extract_access_token(&redirect.parameters.uri);
            }
        }
    }
}

/// Parse the token fields out of the redirect URI's fragment.
///
/// All four fields are required; a partially valid token is never produced.
pub(crate) fn extract_access_token(uri: &str) -> Result<AccessToken> {
    let (_, fragment) = uri
        .split_once('#')
        .ok_or(Error::MalformedAccessToken { missing: "fragment" })?;

    let values: HashMap<&str, &str> = fragment
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .collect();

    let kind = *values
        .get("token_type")
        .ok_or(Error::MalformedAccessToken { missing: "token_type" })?;
    let token = *values
        .get("access_token")
        .ok_or(Error::MalformedAccessToken {
            missing: "access_token",
        })?;
    let id_token = *values
        .get("id_token")
        .ok_or(Error::MalformedAccessToken { missing: "id_token" })?;
    let expires_in: i64 = values
        .get("expires_in")
        .and_then(|v| v.parse().ok())
        .ok_or(Error::MalformedAccessToken { missing: "expires_in" })?;

    Ok(AccessToken {
        kind: kind.to_string(),
        token: token.to_string(),
        id_token: id_token.to_string(),
        expires_at: Utc::now() + TimeDelta::seconds(expires_in),
    })
}

impl Session {
    /// Establish a session via the full login protocol.
    ///
    /// Cookies from a previous session may be carried over, in which case the
    /// probe can short-circuit the credential rounds entirely. The
    /// entitlements token, user ID, and region affinity are fetched
    /// concurrently once the token is in hand.
    pub async fn login(
        http: &reqwest::Client,
        endpoints: &Endpoints,
        credentials: Credentials,
        handler: Arc<dyn MultifactorHandler>,
        cookies_from: Option<&Session>,
    ) -> Result<Self> {
        let jar = cookies_from.map(|s| s.cookies.clone()).unwrap_or_default();
        let mut client = AuthClient::new(http.clone(), endpoints.clone(), jar);

        let access_token = negotiate_access_token(
            &client,
            &LoginBehavior::Allow {
                credentials: credentials.clone(),
                handler,
            },
        )
        .await?;
        client.set_access_token(access_token.clone());

        let (entitlements_token, user_id, location) = tokio::try_join!(
            client.fetch_entitlements_token(),
            client.fetch_user_id(),
            client.fetch_location(&access_token),
        )?;

        info!(%user_id, region = location.region.as_str(), "session established");

        Ok(Self {
            credentials,
            access_token,
            entitlements_token,
            cookies: client.cookies(),
            location,
            user_id,
            has_expired: false,
        })
    }

    /// Re-establish the access token, preferably by cookie resumption.
    ///
    /// With a handler, a full credential + multifactor login is allowed as a
    /// fallback; without one, only resumption is attempted. On success the
    /// token and cookies are replaced together; on failure the session is
    /// left untouched.
    pub async fn refresh(
        &mut self,
        http: &reqwest::Client,
        endpoints: &Endpoints,
        handler: Option<Arc<dyn MultifactorHandler>>,
    ) -> Result<()> {
        let behavior = match handler {
            Some(handler) => LoginBehavior::Allow {
                credentials: self.credentials.clone(),
                handler,
            },
            None => LoginBehavior::Resume,
        };

        let client = AuthClient::new(http.clone(), endpoints.clone(), self.cookies.clone());
        let access_token = negotiate_access_token(&client, &behavior).await?;

        self.access_token = access_token;
        self.cookies = client.cookies();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_URI: &str = "https://playvalorant.com/opt_in#access_token=ACCESS&scope=openid&iss=x&id_token=ID&token_type=Bearer&session_state=s&expires_in=3600";

    #[test]
    fn test_extract_access_token() {
        let token = extract_access_token(FULL_URI).unwrap();
        assert_eq!(token.kind, "Bearer");
        assert_eq!(token.token, "ACCESS");
        assert_eq!(token.id_token, "ID");
        assert!(!token.is_expired());
    }

    #[test]
    fn test_extract_rejects_missing_fields() {
        let uri = "https://playvalorant.com/#access_token=A&id_token=I&expires_in=3600";
        assert!(matches!(
            extract_access_token(uri),
            Err(Error::MalformedAccessToken {
                missing: "token_type"
            })
        ));

        let uri = "https://playvalorant.com/#token_type=Bearer&access_token=A&id_token=I&expires_in=soon";
        assert!(matches!(
            extract_access_token(uri),
            Err(Error::MalformedAccessToken {
                missing: "expires_in"
            })
        ));

        assert!(matches!(
            extract_access_token("https://playvalorant.com/"),
            Err(Error::MalformedAccessToken { missing: "fragment" })
        ));
    }
}
