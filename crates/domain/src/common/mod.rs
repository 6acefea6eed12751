//! Common utility functions shared by the domain and the player.
//!
//! Pure functions only: no side effects, no I/O, WASM compatible.

pub mod string;

pub use string::host_name;
