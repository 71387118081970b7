//! QuickBite authentication client.
//!
//! This library implements the login flow for the QuickBite delivery API:
//! credential validation, a connectivity gate, a single HTTP login call,
//! session decoding, and session persistence, composed by [`LoginFlow`].
//!
//! The flow reports every outcome through the [`LoginDelegate`] trait and
//! renders nothing itself; front ends (the bundled CLI, a future GUI) plug
//! in their own delegate.

pub mod api;
pub mod auth;
pub mod config;
pub mod net;

pub use api::{ApiClient, ApiError, AuthService};
pub use auth::{Credentials, LoginDelegate, LoginFlow, LoginState, Session, SessionStore};
pub use config::Config;
pub use net::{Connectivity, ConnectivityMonitor};
