//! Renderer port - turns a story into a displayable unit

use snooze_domain::Story;

/// Converts a story plus its per-user flags into renderable content.
pub trait StoryRenderer {
    fn render_story(&self, story: &Story, is_favorite: bool, is_own: bool) -> String;
}
