use snooze_domain::Story;

/// Which story list is being shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    AllStories,
    Favorites,
    OwnStories,
}

/// A story together with its per-user flags, ready to hand to a renderer.
///
/// `is_favorite` is derived from the current user's favorites at the time the
/// card is built; it is never stored on the story itself.
#[derive(Debug, Clone, PartialEq)]
pub struct StoryCard<'a> {
    pub story: &'a Story,
    pub is_favorite: bool,
    /// Whether to offer deletion (only in the user's own-stories list)
    pub is_own: bool,
}
