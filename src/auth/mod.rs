//! Authentication: the login protocol, cookie handling, and the
//! refresh-coordinating session handler.

pub(crate) mod client;
pub mod cookies;
pub mod flow;
pub mod handler;

pub use flow::MultifactorHandler;
pub use handler::{ReauthBehavior, SessionHandler};
