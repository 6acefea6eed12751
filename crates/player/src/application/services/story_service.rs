//! Story Service - the shared story list and the calls that change it
//!
//! The cached collection only ever changes in two ways: a wholesale
//! replacement by `fetch_all`, or dropping a story the server confirmed
//! deleted. Submissions are never inserted locally; the caller refetches.

use std::sync::Arc;

use snooze_domain::{LoginToken, NewStory, Story, StoryCollection, StoryId, User};

use crate::application::SessionError;
use crate::ports::outbound::{ApiStatus, StoryApiPort};

/// What a favorite toggle did on the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteChange {
    Favorited,
    Unfavorited,
}

/// Holds the story list and forwards story mutations to the API.
pub struct StoryCatalog {
    api: Arc<dyn StoryApiPort>,
    stories: StoryCollection,
}

impl StoryCatalog {
    pub fn new(api: Arc<dyn StoryApiPort>) -> Self {
        Self {
            api,
            stories: StoryCollection::default(),
        }
    }

    /// The collection as of the last fetch
    pub fn stories(&self) -> &StoryCollection {
        &self.stories
    }

    /// Replace the collection with the server's current list.
    ///
    /// On failure the previous collection is kept.
    pub async fn fetch_all(&mut self) -> Result<&StoryCollection, SessionError> {
        let stories = self.api.list_stories().await.map_err(|e| {
            tracing::warn!(error = %e, "Failed to fetch stories");
            SessionError::from(e)
        })?;
        tracing::debug!(count = stories.len(), "Fetched stories");
        self.stories = StoryCollection::new(stories);
        Ok(&self.stories)
    }

    /// Submit a story. Requires the API's "created" status.
    ///
    /// The returned story carries its server-assigned id. It is not added to
    /// the cached collection.
    pub async fn add_story(
        &self,
        token: &LoginToken,
        story: &NewStory,
    ) -> Result<Story, SessionError> {
        let response = self.api.create_story(token, story).await?;
        if response.status != ApiStatus::CREATED {
            return Err(SessionError::unexpected_status(
                ApiStatus::CREATED,
                response.status,
            ));
        }
        tracing::info!(story_id = %response.body.id, "Story created");
        Ok(response.body)
    }

    /// Delete a story. Requires the API's "ok" status.
    pub async fn delete_story(
        &self,
        token: &LoginToken,
        story_id: StoryId,
    ) -> Result<(), SessionError> {
        let status = self.api.delete_story(token, story_id).await?;
        expect_ok(status)?;
        tracing::info!(story_id = %story_id, "Story deleted");
        Ok(())
    }

    /// Favorite or unfavorite depending on current membership in `user.favorites`.
    pub async fn toggle_favorite(
        &self,
        user: &User,
        story_id: StoryId,
    ) -> Result<FavoriteChange, SessionError> {
        let (status, change) = if user.is_favorite(story_id) {
            let status = self
                .api
                .unfavorite(&user.token, &user.username, story_id)
                .await?;
            (status, FavoriteChange::Unfavorited)
        } else {
            let status = self
                .api
                .favorite(&user.token, &user.username, story_id)
                .await?;
            (status, FavoriteChange::Favorited)
        };
        expect_ok(status)?;
        tracing::info!(story_id = %story_id, change = ?change, "Favorite toggled");
        Ok(change)
    }

    /// Drop a story from the rendered list after a confirmed delete.
    pub fn remove_rendered(&mut self, story_id: StoryId) -> Option<Story> {
        self.stories.remove(story_id)
    }

    /// Forget the cached list (used on logout)
    pub fn reset(&mut self) {
        self.stories = StoryCollection::default();
    }
}

fn expect_ok(status: ApiStatus) -> Result<(), SessionError> {
    if status == ApiStatus::OK {
        Ok(())
    } else {
        Err(SessionError::unexpected_status(ApiStatus::OK, status))
    }
}
