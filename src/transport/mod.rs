//! Transport for the game API: header construction, the authenticated HTTP
//! client, and the diagnostic exchange log.

pub mod headers;
pub mod http;
pub mod log;

pub use http::ValorantHttpClient;
pub use log::{Exchange, ExchangeLog, ExchangeOutcome};
