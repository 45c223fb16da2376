//! HTTP client for the game API, with auth-header injection and exchange
//! logging.

use std::sync::Mutex;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::auth::handler::SessionHandler;
use crate::error::{retry_after_seconds, Error, Result};
use crate::models::platform::PlatformInfo;
use crate::transport::headers;
use crate::transport::log::{Exchange, ExchangeLog, ExchangeOutcome};

/// Sends authenticated game-API requests.
///
/// Each request obtains a valid access token from the session handler (which
/// refreshes the session if needed), injects the auth headers, and classifies
/// any non-200 response into a typed error before the caller sees it.
pub struct ValorantHttpClient {
    client: reqwest::Client,
    handler: SessionHandler,
    log: Mutex<ExchangeLog>,
    client_version: Option<String>,
    platform: String,
}

impl ValorantHttpClient {
    pub fn new(
        client: reqwest::Client,
        handler: SessionHandler,
        client_version: Option<String>,
    ) -> Self {
        Self {
            client,
            handler,
            log: Mutex::new(ExchangeLog::new()),
            client_version,
            platform: PlatformInfo::supported_example().encoded(),
        }
    }

    /// A snapshot of the recent exchange log, oldest first.
    pub fn exchange_log(&self) -> Vec<Exchange> {
        self.log.lock().expect("exchange log lock poisoned").snapshot()
    }

    /// Send a JSON request and decode the 200 response.
    pub async fn send_json<B, T>(&self, method: Method, url: &str, body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let token = self.handler.get_access_token().await?;
        let session = self.handler.session();
        let hdrs = headers::game_api_headers(
            &token,
            &session.entitlements_token,
            self.client_version.as_deref(),
            &self.platform,
        );

        let mut request = self.client.request(method.clone(), url).headers(hdrs);
        if let Some(body) = body {
            request = request.json(body);
        }

        debug!(%method, url, "sending game-API request");
        let response = match request.send().await {
            Ok(response) => response,
            Err(error) => {
                self.record(Exchange::new(
                    method.as_str(),
                    url,
                    ExchangeOutcome::Error {
                        message: error.to_string(),
                    },
                ));
                return Err(Error::Network(error));
            }
        };

        let status = response.status();
        self.record(Exchange::new(
            method.as_str(),
            url,
            ExchangeOutcome::Response {
                status: status.as_u16(),
            },
        ));

        if status.as_u16() != 200 {
            let retry_after = retry_after_seconds(response.headers());
            let body = response.bytes().await.unwrap_or_default();
            return Err(Error::classify(status.as_u16(), retry_after, &body));
        }

        Ok(response.json().await?)
    }

    fn record(&self, exchange: Exchange) {
        self.log
            .lock()
            .expect("exchange log lock poisoned")
            .record(exchange);
    }
}

impl std::fmt::Debug for ValorantHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValorantHttpClient")
            .field("handler", &self.handler)
            .field("client_version", &self.client_version)
            .finish()
    }
}
