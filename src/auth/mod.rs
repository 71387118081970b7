//! Authentication module: validation, session persistence, and the login flow.
//!
//! This module provides:
//! - `validator`: the submit-enablement check for the email field
//! - `Session` / `SessionStore`: the decoded session and its on-disk store
//! - `CredentialStore`: OS keychain storage for a remembered password
//! - `LoginFlow`: the orchestrator tying validation, connectivity, the
//!   request, decoding, and persistence together

pub mod credentials;
pub mod flow;
pub mod session;
pub mod validator;

pub use credentials::CredentialStore;
pub use flow::{Credentials, LoginDelegate, LoginFlow, LoginState};
pub use session::{Session, SessionStore};
pub use validator::is_valid_email;
