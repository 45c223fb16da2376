//! Auth cookie records and the session cookie jar.
//!
//! Cookies are session state here, not transport state: the jar is owned by
//! the [`Session`](crate::Session), snapshotted into the login flow, and
//! handed back updated when a round completes. Losing it would force a full
//! credential re-login instead of a lightweight resumption.

use reqwest::header::{HeaderMap, SET_COOKIE};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// One opaque auth cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: String::new(),
            path: "/".into(),
        }
    }
}

// Versioned deserialization: the current schema is the full record; older
// stored sessions carried bare "name=value" strings.
impl<'de> Deserialize<'de> for Cookie {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Record {
                name: String,
                value: String,
                #[serde(default)]
                domain: String,
                #[serde(default)]
                path: String,
            },
            Legacy(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Record {
                name,
                value,
                domain,
                path,
            } => Ok(Cookie {
                name,
                value,
                domain,
                path,
            }),
            Repr::Legacy(raw) => {
                let (name, value) = raw
                    .split_once('=')
                    .ok_or_else(|| D::Error::custom("invalid cookie data"))?;
                Ok(Cookie::new(name, value))
            }
        }
    }
}

/// A set of cookies keyed by name, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CookieJar {
    cookies: Vec<Cookie>,
}

impl CookieJar {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cookie> {
        self.cookies.iter()
    }

    /// Insert a cookie, replacing any existing cookie of the same name.
    pub fn insert(&mut self, cookie: Cookie) {
        match self.cookies.iter_mut().find(|c| c.name == cookie.name) {
            Some(existing) => *existing = cookie,
            None => self.cookies.push(cookie),
        }
    }

    pub fn clear(&mut self) {
        self.cookies.clear();
    }

    /// Render the `Cookie` request header value, if the jar has any cookies.
    #[must_use]
    pub fn header_value(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        Some(
            self.cookies
                .iter()
                .map(|c| format!("{}={}", c.name, c.value))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    /// Merge every `Set-Cookie` header of a response into the jar.
    pub fn merge_from_headers(&mut self, headers: &HeaderMap) {
        for raw in headers.get_all(SET_COOKIE) {
            let Ok(raw) = raw.to_str() else { continue };
            if let Some(cookie) = parse_set_cookie(raw) {
                self.insert(cookie);
            }
        }
    }
}

impl FromIterator<Cookie> for CookieJar {
    fn from_iter<I: IntoIterator<Item = Cookie>>(iter: I) -> Self {
        let mut jar = Self::default();
        for cookie in iter {
            jar.insert(cookie);
        }
        jar
    }
}

fn parse_set_cookie(raw: &str) -> Option<Cookie> {
    let mut parts = raw.split(';');
    let (name, value) = parts.next()?.trim().split_once('=')?;
    if name.is_empty() {
        return None;
    }
    let mut cookie = Cookie::new(name.trim(), value.trim());
    for attribute in parts {
        let (key, val) = match attribute.split_once('=') {
            Some((k, v)) => (k.trim(), v.trim()),
            None => continue,
        };
        if key.eq_ignore_ascii_case("domain") {
            cookie.domain = val.to_string();
        } else if key.eq_ignore_ascii_case("path") {
            cookie.path = val.to_string();
        }
    }
    Some(cookie)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_parse_set_cookie() {
        let cookie =
            parse_set_cookie("ssid=abc123; Path=/; Domain=auth.riotgames.com; HttpOnly").unwrap();
        assert_eq!(cookie.name, "ssid");
        assert_eq!(cookie.value, "abc123");
        assert_eq!(cookie.domain, "auth.riotgames.com");
        assert_eq!(cookie.path, "/");

        assert!(parse_set_cookie("garbage").is_none());
    }

    #[test]
    fn test_insert_replaces_by_name() {
        let mut jar = CookieJar::default();
        jar.insert(Cookie::new("ssid", "old"));
        jar.insert(Cookie::new("tdid", "t"));
        jar.insert(Cookie::new("ssid", "new"));
        assert_eq!(jar.len(), 2);
        assert_eq!(jar.header_value().unwrap(), "ssid=new; tdid=t");
    }

    #[test]
    fn test_merge_from_headers() {
        let mut headers = HeaderMap::new();
        headers.append(SET_COOKIE, HeaderValue::from_static("ssid=S; Path=/"));
        headers.append(SET_COOKIE, HeaderValue::from_static("clid=C"));

        let mut jar = CookieJar::default();
        jar.insert(Cookie::new("ssid", "stale"));
        jar.merge_from_headers(&headers);

        assert_eq!(jar.len(), 2);
        assert_eq!(jar.header_value().unwrap(), "ssid=S; clid=C");
    }

    #[test]
    fn test_empty_jar_has_no_header() {
        assert!(CookieJar::default().header_value().is_none());
    }

    #[test]
    fn test_versioned_deserialization() {
        // Current schema.
        let cookie: Cookie =
            serde_json::from_str(r#"{"name":"ssid","value":"v","domain":"d","path":"/"}"#).unwrap();
        assert_eq!(cookie.domain, "d");

        // Legacy schema: a bare "name=value" string.
        let cookie: Cookie = serde_json::from_str(r#""ssid=v""#).unwrap();
        assert_eq!(cookie.name, "ssid");
        assert_eq!(cookie.value, "v");

        // Neither schema parses.
        assert!(serde_json::from_str::<Cookie>(r#""not a cookie""#).is_err());
        assert!(serde_json::from_str::<Cookie>("42").is_err());
    }

    #[test]
    fn test_jar_roundtrip() {
        let jar: CookieJar = [Cookie::new("a", "1"), Cookie::new("b", "2")]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&jar).unwrap();
        let restored: CookieJar = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, jar);
    }
}
