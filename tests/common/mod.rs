//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use valorant_gateway::{
    AccessToken, Cookie, CookieJar, Credentials, Error, Location, MultifactorHandler,
    MultifactorInfo, Result, Session,
};

pub const PLAYER_ID: &str = "3fa8598d-066e-5bdb-998c-74c015c5dba5";

/// A session whose token expires `expires_in` seconds from now.
pub fn session(expires_in: i64, cookies: &[(&str, &str)]) -> Session {
    Session {
        credentials: Credentials::new("username", "password"),
        access_token: AccessToken {
            kind: "Bearer".into(),
            token: "OLD_ACCESS".into(),
            id_token: "OLD_ID".into(),
            expires_at: Utc::now() + TimeDelta::seconds(expires_in),
        },
        entitlements_token: "ENTITLEMENTS_TOKEN".into(),
        cookies: cookies
            .iter()
            .map(|(name, value)| Cookie::new(*name, *value))
            .collect::<CookieJar>(),
        location: Location::europe(),
        user_id: Uuid::parse_str(PLAYER_ID).unwrap(),
        has_expired: false,
    }
}

/// A successful authorization response carrying a token redirect.
pub fn token_response(access_token: &str) -> Value {
    json!({
        "type": "response",
        "response": {
            "mode": "fragment",
            "parameters": {
                "uri": format!(
                    "https://playvalorant.com/opt_in#access_token={access_token}\
                     &scope=openid&iss=x&id_token=NEW_ID&token_type=Bearer\
                     &session_state=s&expires_in=3600"
                )
            }
        }
    })
}

/// A multifactor challenge response.
pub fn multifactor_response() -> Value {
    json!({
        "type": "multifactor",
        "error": "multifactor_attempt_failed",
        "multifactor": {
            "email": "jul**@****.com",
            "method": "email",
            "methods": ["email"],
            "multiFactorCodeLength": 6,
            "mfaVersion": "v2"
        }
    })
}

/// Handler that replays a fixed sequence of codes and counts its calls.
pub struct CodeSequence {
    codes: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl CodeSequence {
    pub fn new(codes: &[&str]) -> Self {
        Self {
            codes: Mutex::new(codes.iter().rev().map(|c| c.to_string()).collect()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MultifactorHandler for CodeSequence {
    async fn resolve_code(&self, challenge: &MultifactorInfo) -> Result<String> {
        assert_eq!(challenge.version, "v2");
        assert_eq!(challenge.code_length, 6);
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.codes
            .lock()
            .unwrap()
            .pop()
            .ok_or(Error::Config("code sequence exhausted".into()))
    }
}

/// Handler that must never be consulted.
pub struct NoMfaExpected;

#[async_trait]
impl MultifactorHandler for NoMfaExpected {
    async fn resolve_code(&self, _challenge: &MultifactorInfo) -> Result<String> {
        panic!("multifactor handler should not be called");
    }
}
