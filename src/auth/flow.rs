//! Login orchestration.
//!
//! `LoginFlow` composes the validator, the connectivity check, the auth
//! client, the session decoder, and the session store into one submit
//! path: validate → check connectivity → request → decode → persist →
//! notify. Every outcome is reported through the [`LoginDelegate`] trait;
//! nothing propagates past `submit` and no error is fatal - the user can
//! always retry with a fresh submit.

use tracing::{debug, error, info, warn};

use crate::api::{ApiError, AuthService};
use crate::auth::session::{Session, SessionStore};
use crate::auth::validator::is_valid_email;
use crate::net::Connectivity;

/// Callbacks the login flow raises toward the UI layer.
///
/// Implementations own all rendering; the flow never prints or draws.
pub trait LoginDelegate {
    fn on_loading_start(&self);
    fn on_loading_stop(&self);
    fn on_success(&self, session: &Session);
    fn on_failure(&self, message: &str);
}

/// Email/password pair for one submit attempt. Transient, never persisted.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Progress of the current login attempt.
///
/// Anything other than `Idle` means an attempt is mid-flight and the
/// front end should keep its submit trigger disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginState {
    Idle,
    Validating,
    CheckingConnectivity,
    Requesting,
    Decoding,
}

/// Why an attempt failed. All causes collapse into the single failure
/// callback, but each keeps its own user-facing message - reporting
/// "incorrect password" for an offline device would mislead the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoginFailure {
    Offline,
    Transport,
    InvalidCredentials,
    Decode,
}

impl LoginFailure {
    fn message(self) -> &'static str {
        match self {
            LoginFailure::Offline => "No internet connection. Check your network and try again.",
            LoginFailure::Transport => "Could not reach the server. Please try again.",
            LoginFailure::InvalidCredentials => "Incorrect email or password.",
            LoginFailure::Decode => "The server returned an unexpected response. Please try again.",
        }
    }

    fn from_api_error(err: &ApiError) -> Self {
        match err {
            ApiError::Decode(_) | ApiError::NoData => LoginFailure::Decode,
            e if e.is_unauthorized() => LoginFailure::InvalidCredentials,
            _ => LoginFailure::Transport,
        }
    }
}

/// The login orchestrator.
///
/// Holds its collaborators as injected services rather than reaching for
/// process-wide singletons; one instance drives one login screen.
pub struct LoginFlow<A, C, D> {
    auth: A,
    connectivity: C,
    store: SessionStore,
    delegate: D,
    state: LoginState,
}

impl<A, C, D> LoginFlow<A, C, D>
where
    A: AuthService,
    C: Connectivity,
    D: LoginDelegate,
{
    pub fn new(auth: A, connectivity: C, store: SessionStore, delegate: D) -> Self {
        Self {
            auth,
            connectivity,
            store,
            delegate,
            state: LoginState::Idle,
        }
    }

    pub fn state(&self) -> LoginState {
        self.state
    }

    pub fn delegate(&self) -> &D {
        &self.delegate
    }

    /// Run one login attempt.
    ///
    /// All outcomes are reported through the delegate. The session is
    /// persisted if and only if the request succeeded and the payload
    /// decoded; a failed attempt leaves any previously persisted session
    /// untouched. There are no automatic retries.
    ///
    /// Submits are serialized by the exclusive borrow: a second submit
    /// cannot start until the previous attempt has settled back to
    /// `Idle`. Front ends should still disable their trigger while
    /// [`state`](Self::state) is not `Idle`.
    pub async fn submit(&mut self, credentials: &Credentials) {
        self.state = LoginState::Validating;
        if !is_valid_email(&credentials.email) {
            // Invalid input halts silently: the submit action is expected
            // to stay disabled while the email fails validation, so there
            // is no message to show.
            debug!("Submit halted, email failed validation");
            self.state = LoginState::Idle;
            return;
        }

        self.state = LoginState::CheckingConnectivity;
        if !self.connectivity.is_connected() {
            warn!("Login attempted while offline");
            self.delegate.on_failure(LoginFailure::Offline.message());
            self.state = LoginState::Idle;
            return;
        }

        self.state = LoginState::Requesting;
        self.delegate.on_loading_start();

        let bytes = match self.auth.login(&credentials.email, &credentials.password).await {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(error = %e, "Login request failed");
                self.fail(LoginFailure::from_api_error(&e));
                return;
            }
        };

        self.state = LoginState::Decoding;
        let session = match Session::decode(&bytes) {
            Ok(session) => session,
            Err(e) => {
                error!(error = %e, "Login response failed to decode");
                self.fail(LoginFailure::Decode);
                return;
            }
        };

        if let Err(e) = self.store.save(&session) {
            warn!(error = %e, "Failed to persist session");
        }

        info!(user_id = %session.id, "Login successful");
        self.delegate.on_loading_stop();
        self.delegate.on_success(&session);
        self.state = LoginState::Idle;
    }

    fn fail(&mut self, failure: LoginFailure) {
        self.delegate.on_loading_stop();
        self.delegate.on_failure(failure.message());
        self.state = LoginState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use tempfile::TempDir;

    const VALID_BODY: &[u8] = br#"{"id": "16", "token": "abc123"}"#;

    enum FakeResponse {
        Body(&'static [u8]),
        Status(u16),
        EmptyBody,
    }

    struct FakeAuth {
        response: FakeResponse,
        calls: Cell<usize>,
    }

    impl FakeAuth {
        fn new(response: FakeResponse) -> Self {
            Self {
                response,
                calls: Cell::new(0),
            }
        }
    }

    impl AuthService for &FakeAuth {
        async fn login(&self, _email: &str, _password: &str) -> Result<Vec<u8>, ApiError> {
            self.calls.set(self.calls.get() + 1);
            match &self.response {
                FakeResponse::Body(body) => Ok(body.to_vec()),
                FakeResponse::Status(code) => Err(ApiError::InvalidStatusCode(*code)),
                FakeResponse::EmptyBody => Err(ApiError::NoData),
            }
        }
    }

    struct FakeConnectivity(bool);

    impl Connectivity for FakeConnectivity {
        fn is_connected(&self) -> bool {
            self.0
        }
    }

    #[derive(Default)]
    struct RecordingDelegate {
        started: Cell<usize>,
        stopped: Cell<usize>,
        successes: RefCell<Vec<Session>>,
        failures: RefCell<Vec<String>>,
    }

    impl LoginDelegate for RecordingDelegate {
        fn on_loading_start(&self) {
            self.started.set(self.started.get() + 1);
        }

        fn on_loading_stop(&self) {
            self.stopped.set(self.stopped.get() + 1);
        }

        fn on_success(&self, session: &Session) {
            self.successes.borrow_mut().push(session.clone());
        }

        fn on_failure(&self, message: &str) {
            self.failures.borrow_mut().push(message.to_string());
        }
    }

    fn store() -> (TempDir, SessionStore) {
        let dir = TempDir::new().expect("temp dir");
        let store = SessionStore::new(dir.path().to_path_buf());
        (dir, store)
    }

    fn creds() -> Credentials {
        Credentials::new("user@quickbite.dev", "hunter2")
    }

    #[tokio::test]
    async fn test_offline_submit_fails_without_network_call() {
        let auth = FakeAuth::new(FakeResponse::Body(VALID_BODY));
        let (_dir, session_store) = store();
        let mut flow = LoginFlow::new(
            &auth,
            FakeConnectivity(false),
            session_store,
            RecordingDelegate::default(),
        );

        flow.submit(&creds()).await;

        let delegate = flow.delegate();
        assert_eq!(auth.calls.get(), 0);
        assert_eq!(delegate.failures.borrow().len(), 1);
        assert!(delegate.failures.borrow()[0].contains("internet"));
        // No request means no loading indicator either
        assert_eq!(delegate.started.get(), 0);
        assert!(delegate.successes.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_successful_login_persists_session() {
        let auth = FakeAuth::new(FakeResponse::Body(VALID_BODY));
        let (dir, session_store) = store();
        let mut flow = LoginFlow::new(
            &auth,
            FakeConnectivity(true),
            session_store,
            RecordingDelegate::default(),
        );

        flow.submit(&creds()).await;

        let delegate = flow.delegate();
        assert_eq!(auth.calls.get(), 1);
        assert_eq!(delegate.successes.borrow().len(), 1);
        assert_eq!(delegate.successes.borrow()[0].id, "16");
        assert!(delegate.failures.borrow().is_empty());
        assert_eq!(delegate.started.get(), 1);
        assert_eq!(delegate.stopped.get(), 1);

        let persisted = SessionStore::new(dir.path().to_path_buf())
            .read()
            .unwrap()
            .expect("session persisted");
        assert_eq!(persisted.token, "abc123");
    }

    #[tokio::test]
    async fn test_malformed_body_preserves_previous_session() {
        let previous = Session {
            id: "old".to_string(),
            token: "old-token".to_string(),
        };
        let (dir, session_store) = store();
        session_store.save(&previous).unwrap();

        let auth = FakeAuth::new(FakeResponse::Body(b"<html>gateway timeout</html>"));
        let mut flow = LoginFlow::new(
            &auth,
            FakeConnectivity(true),
            session_store,
            RecordingDelegate::default(),
        );

        flow.submit(&creds()).await;

        let delegate = flow.delegate();
        assert_eq!(delegate.failures.borrow().len(), 1);
        assert!(delegate.successes.borrow().is_empty());

        let persisted = SessionStore::new(dir.path().to_path_buf()).read().unwrap();
        assert_eq!(persisted, Some(previous));
    }

    #[tokio::test]
    async fn test_repeated_failed_submits_never_persist() {
        let auth = FakeAuth::new(FakeResponse::Status(500));
        let (dir, session_store) = store();
        let mut flow = LoginFlow::new(
            &auth,
            FakeConnectivity(true),
            session_store,
            RecordingDelegate::default(),
        );

        for _ in 0..3 {
            flow.submit(&creds()).await;
        }

        let delegate = flow.delegate();
        assert_eq!(auth.calls.get(), 3);
        assert_eq!(delegate.failures.borrow().len(), 3);
        assert_eq!(
            SessionStore::new(dir.path().to_path_buf()).read().unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_invalid_email_halts_silently() {
        let auth = FakeAuth::new(FakeResponse::Body(VALID_BODY));
        let (_dir, session_store) = store();
        let mut flow = LoginFlow::new(
            &auth,
            FakeConnectivity(true),
            session_store,
            RecordingDelegate::default(),
        );

        flow.submit(&Credentials::new("not-an-email", "hunter2")).await;

        let delegate = flow.delegate();
        assert_eq!(auth.calls.get(), 0);
        assert!(delegate.failures.borrow().is_empty());
        assert!(delegate.successes.borrow().is_empty());
        assert_eq!(delegate.started.get(), 0);
        assert_eq!(flow.state(), LoginState::Idle);
    }

    #[tokio::test]
    async fn test_unauthorized_reports_credential_message() {
        let auth = FakeAuth::new(FakeResponse::Status(401));
        let (_dir, session_store) = store();
        let mut flow = LoginFlow::new(
            &auth,
            FakeConnectivity(true),
            session_store,
            RecordingDelegate::default(),
        );

        flow.submit(&creds()).await;

        let delegate = flow.delegate();
        assert_eq!(
            delegate.failures.borrow()[0],
            "Incorrect email or password."
        );
    }

    #[tokio::test]
    async fn test_loading_pair_fires_on_failure() {
        let auth = FakeAuth::new(FakeResponse::EmptyBody);
        let (_dir, session_store) = store();
        let mut flow = LoginFlow::new(
            &auth,
            FakeConnectivity(true),
            session_store,
            RecordingDelegate::default(),
        );

        flow.submit(&creds()).await;

        let delegate = flow.delegate();
        assert_eq!(delegate.started.get(), 1);
        assert_eq!(delegate.stopped.get(), 1);
        assert_eq!(delegate.failures.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_flow_returns_to_idle_after_each_outcome() {
        let auth = FakeAuth::new(FakeResponse::Status(503));
        let (_dir, session_store) = store();
        let mut flow = LoginFlow::new(
            &auth,
            FakeConnectivity(true),
            session_store,
            RecordingDelegate::default(),
        );

        assert_eq!(flow.state(), LoginState::Idle);
        flow.submit(&creds()).await;
        assert_eq!(flow.state(), LoginState::Idle);
    }
}
