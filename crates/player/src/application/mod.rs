//! Application layer: session and story use cases.

pub mod dto;
pub mod error;
pub mod services;
pub mod session_context;

pub use error::SessionError;
pub use session_context::SessionContext;
