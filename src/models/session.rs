//! Session value types: credentials, access token, and the session record.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::cookies::CookieJar;
use crate::config::EXPIRY_SAFETY_MARGIN;
use crate::models::location::Location;

/// Riot username and password.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// An access token extracted from a successful login round.
///
/// Immutable; a refresh replaces the whole value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    /// Token kind as reported by the service, e.g. `Bearer`.
    pub kind: String,
    /// The access token itself.
    pub token: String,
    /// The accompanying ID token, needed for the region-affinity lookup.
    pub id_token: String,
    /// Absolute expiration instant.
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// The `Authorization` header value for this token.
    #[must_use]
    pub fn encoded(&self) -> String {
        format!("{} {}", self.kind, self.token)
    }

    /// Whether the token should no longer be used.
    ///
    /// Applies [`EXPIRY_SAFETY_MARGIN`] and is boundary-inclusive: a token
    /// expiring exactly now is expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        let margin = TimeDelta::seconds(EXPIRY_SAFETY_MARGIN.as_secs() as i64);
        Utc::now() + margin >= self.expires_at
    }
}

/// An established session with the Riot auth servers.
///
/// Created once via the full login protocol ([`Session::login`]), serialized
/// by the caller for persistence, and mutated in place only by the session
/// handler during refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// The credentials this session was established with.
    pub credentials: Credentials,
    /// Current access token.
    pub access_token: AccessToken,
    /// Entitlements token sent alongside the access token on game-API calls.
    pub entitlements_token: String,
    /// Auth cookies; carried forward across every refresh so the session can
    /// be resumed without resubmitting credentials.
    pub cookies: CookieJar,
    /// Server-assigned region/shard.
    pub location: Location,
    /// ID of the user owning this session.
    pub user_id: Uuid,
    /// True once a refresh failed unrecoverably (new credentials or an MFA
    /// code are required); cleared by the next successful refresh.
    #[serde(default)]
    pub has_expired: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(expires_at: DateTime<Utc>) -> AccessToken {
        AccessToken {
            kind: "Bearer".into(),
            token: "ACCESS".into(),
            id_token: "ID".into(),
            expires_at,
        }
    }

    #[test]
    fn test_encoded() {
        assert_eq!(token(Utc::now()).encoded(), "Bearer ACCESS");
    }

    #[test]
    fn test_expiry_boundary_inclusive() {
        // Exactly now: expired.
        assert!(token(Utc::now()).is_expired());
        // Inside the safety margin: expired even though literally still valid.
        assert!(token(Utc::now() + TimeDelta::seconds(10)).is_expired());
        // Comfortably in the future: valid.
        assert!(!token(Utc::now() + TimeDelta::seconds(3600)).is_expired());
        // Long expired.
        assert!(token(Utc::now() - TimeDelta::seconds(3600)).is_expired());
    }

    #[test]
    fn test_session_roundtrip() {
        let session = Session {
            credentials: Credentials::new("user", "pass"),
            access_token: token(Utc::now() + TimeDelta::seconds(3600)),
            entitlements_token: "ENT".into(),
            cookies: CookieJar::default(),
            location: Location::europe(),
            user_id: Uuid::new_v4(),
            has_expired: false,
        };
        let json = serde_json::to_string(&session).unwrap();
        let restored: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.user_id, session.user_id);
        assert_eq!(restored.access_token, session.access_token);
        assert!(!restored.has_expired);
    }
}
