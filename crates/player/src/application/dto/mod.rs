//! View-facing data produced by the application layer.

mod navigation;
mod story_card;

pub use navigation::{NavAction, Navigation};
pub use story_card::{Section, StoryCard};
