//! Application services
//!
//! Services depend on port traits, not concrete infrastructure
//! implementations.

pub mod session_service;
pub mod story_service;

pub use session_service::SessionStore;
pub use story_service::{FavoriteChange, StoryCatalog};
