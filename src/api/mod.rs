//! HTTP client module for the QuickBite authentication API.
//!
//! This module provides the `ApiClient` for issuing the login request and
//! the `AuthService` trait the login flow is written against, so tests can
//! substitute a fake service without touching the network.

pub mod client;
pub mod error;

pub use client::{ApiClient, AuthService};
pub use error::ApiError;
