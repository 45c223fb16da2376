//! # valorant-gateway
//!
//! Rust client library for the Valorant player-data API.
//!
//! Handles the full Riot session lifecycle: the multi-round login protocol
//! (credentials + optional multifactor), cookie-based session resumption,
//! and a refresh coordinator that keeps arbitrarily many concurrent callers
//! behind a single in-flight re-authentication.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use valorant_gateway::{
//!     Credentials, MultifactorHandler, MultifactorInfo, ReauthBehavior, Result, ValorantClient,
//! };
//!
//! struct PromptForCode;
//!
//! #[async_trait::async_trait]
//! impl MultifactorHandler for PromptForCode {
//!     async fn resolve_code(&self, challenge: &MultifactorInfo) -> Result<String> {
//!         println!("enter the {}-digit code sent to {}", challenge.code_length, challenge.email);
//!         // read the code from wherever your app gets user input
//!         # Ok("123456".into())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let handler = Arc::new(PromptForCode);
//!     let client = ValorantClient::builder()
//!         .login(Credentials::new("username", "password"), handler.clone())
//!         .await?;
//!
//!     // Resume automatically when the token expires mid-run.
//!     client.set_reauth_behavior(ReauthBehavior::Full(handler));
//!
//!     let session = client.session(); // serialize this to skip login next run
//!     # let _ = session;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;
pub mod transport;

// Re-exports for ergonomic usage
pub use auth::cookies::{Cookie, CookieJar};
pub use auth::{MultifactorHandler, ReauthBehavior, SessionHandler};
pub use client::{ValorantClient, ValorantClientBuilder};
pub use config::Endpoints;
pub use error::{Error, Result, RiotError};
pub use models::auth::MultifactorInfo;
pub use models::location::Location;
pub use models::platform::PlatformInfo;
pub use models::session::{AccessToken, Credentials, Session};
pub use storage::SessionStorage;
pub use transport::{Exchange, ExchangeLog, ExchangeOutcome};
