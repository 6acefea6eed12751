//! Snooze player crate.
//!
//! Session and story state for a Hack-or-Snooze style news client: the
//! application layer (session context, services), the ports it talks
//! through, and the infrastructure adapters behind them. Platform support
//! is selected at compile time via `cfg`.

pub mod application;
#[cfg(not(target_arch = "wasm32"))]
pub mod config;
pub mod infrastructure;
pub mod ports;
pub mod runner;

pub use application::{SessionContext, SessionError};
