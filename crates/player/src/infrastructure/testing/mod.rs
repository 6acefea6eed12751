//! Test-only infrastructure fakes.
//!
//! These implement outbound ports so services and scenario tests can run
//! without a real story server.

pub mod fake_api;
#[cfg(test)]
pub mod fixtures;

pub use fake_api::FakeStoryApi;
