//! Snooze domain: stories, users and the value types they are built from.
//!
//! No I/O lives here; everything compiles for wasm32 as well as native.

pub mod common;
pub mod entities;
pub mod error;
pub mod ids;
pub mod value_objects;

// Re-export all entities
pub use entities::{CurrentUser, NewStory, Story, StoryCollection, StorySet, User};

pub use error::DomainError;

// Re-export ID types
pub use ids::StoryId;

// Re-export value objects
pub use value_objects::{DisplayName, LoginToken, Username};
