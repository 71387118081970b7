//! QuickBite login CLI.
//!
//! Drives the library's login flow from the terminal: prompts for
//! credentials, reports progress through a console delegate, and persists
//! the session so later runs start authenticated.

use std::cell::Cell;
use std::io::{self, Write};

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use quickbite_auth::auth::CredentialStore;
use quickbite_auth::{
    ApiClient, Config, ConnectivityMonitor, Credentials, LoginDelegate, LoginFlow, Session,
    SessionStore,
};

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Console delegate: prints progress and remembers the outcome so the CLI
/// can update config and the keychain after a successful login.
struct ConsoleDelegate {
    succeeded: Cell<bool>,
}

impl ConsoleDelegate {
    fn new() -> Self {
        Self {
            succeeded: Cell::new(false),
        }
    }
}

impl LoginDelegate for ConsoleDelegate {
    fn on_loading_start(&self) {
        eprintln!("Signing in...");
    }

    fn on_loading_stop(&self) {}

    fn on_success(&self, session: &Session) {
        self.succeeded.set(true);
        println!("Signed in (user id {}).", session.id);
    }

    fn on_failure(&self, message: &str) {
        eprintln!("{}", message);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();
    info!("QuickBite login starting");

    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 && args[1] == "--logout" {
        return logout();
    }

    let mut config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            Config::default()
        }
    };

    let store = SessionStore::new(Config::data_dir()?);
    if let Some(session) = store.read().unwrap_or(None) {
        println!(
            "Already signed in (user id {}). Run with --logout to sign out.",
            session.id
        );
        return Ok(());
    }

    let email = prompt_email(config.last_email.as_deref())?;
    let (password, source) = prompt_password(&email)?;

    let monitor = ConnectivityMonitor::new();
    let _probe = monitor.spawn_probe();

    let api = match config.base_url.as_deref() {
        Some(url) => ApiClient::with_base_url(url)?,
        None => ApiClient::new()?,
    };

    let mut flow = LoginFlow::new(api, monitor.clone(), store, ConsoleDelegate::new());
    flow.submit(&Credentials::new(email.clone(), password.clone())).await;

    if flow.delegate().succeeded.get() {
        // Only a freshly typed password triggers the remember-me prompt;
        // keychain passwords are already stored and env passwords belong
        // to scripted runs.
        if source == PasswordSource::Prompt && confirm("Remember password?")? {
            if let Err(e) = CredentialStore::store(&email, &password) {
                warn!(error = %e, "Failed to store credentials");
            }
        }
        config.last_email = Some(email);
        if let Err(e) = config.save() {
            warn!(error = %e, "Failed to save config");
        }
    }

    Ok(())
}

/// Where the password for this attempt came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PasswordSource {
    Env,
    Keychain,
    Prompt,
}

/// Whether a y/n answer means yes. Empty input defaults to yes.
fn is_yes(input: &str) -> bool {
    let input = input.trim();
    !(input.eq_ignore_ascii_case("n") || input.eq_ignore_ascii_case("no"))
}

fn confirm(question: &str) -> Result<bool> {
    print!("{} [Y/n]: ", question);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(is_yes(&input))
}

fn prompt_email(last_email: Option<&str>) -> Result<String> {
    if let Ok(email) = std::env::var("QUICKBITE_EMAIL") {
        return Ok(email);
    }

    match last_email {
        Some(last) => print!("Email [{}]: ", last),
        None => print!("Email: "),
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    if input.is_empty() {
        Ok(last_email.unwrap_or_default().to_string())
    } else {
        Ok(input.to_string())
    }
}

fn prompt_password(email: &str) -> Result<(String, PasswordSource)> {
    if let Ok(password) = std::env::var("QUICKBITE_PASSWORD") {
        return Ok((password, PasswordSource::Env));
    }

    if CredentialStore::has_credentials(email) && confirm("Use stored password?")? {
        return Ok((CredentialStore::get_password(email)?, PasswordSource::Keychain));
    }

    Ok((rpassword::prompt_password("Password: ")?, PasswordSource::Prompt))
}

/// Sign out: remove the persisted session and any remembered password
fn logout() -> Result<()> {
    let store = SessionStore::new(Config::data_dir()?);
    store.clear()?;

    let config = Config::load().unwrap_or_default();
    if let Some(email) = config.last_email.as_deref() {
        if CredentialStore::has_credentials(email) {
            if let Err(e) = CredentialStore::delete(email) {
                warn!(error = %e, "Failed to remove stored password");
            }
        }
    }

    println!("Signed out.");
    Ok(())
}
