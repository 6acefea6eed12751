//! Domain entities - Core business objects with identity

mod story;
mod user;

pub use story::{NewStory, Story, StoryCollection};
pub use user::{CurrentUser, StorySet, User};
