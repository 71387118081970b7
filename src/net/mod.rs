//! Network reachability monitoring.
//!
//! The login flow consults a process-wide reachability flag before every
//! request so a submit on an offline device fails immediately instead of
//! waiting out a transport timeout.

pub mod monitor;

pub use monitor::{Connectivity, ConnectivityMonitor};
