//! Session context - the explicit owner of client state
//!
//! One `SessionContext` holds the current user and the story catalog for the
//! life of a session. It is created at startup and replaced (or reset) on
//! login and logout; nothing else writes to the state it holds.
//!
//! # Refresh-on-write
//!
//! Every successful mutating call is followed by a full refetch of the user
//! (and of the story list when the mutation adds a story) instead of patching
//! local state. A mutation that fails returns before any state is touched, so
//! the rendered view never shows a change the server did not accept. Favorite
//! status in particular is only ever read from a refetched user; there is no
//! optimistic toggle.
//!
//! Operations take `&mut self`, so two actions can never write concurrently;
//! anything read after an `.await` comes from the refetch, not from a
//! snapshot taken before it.

use std::cmp::Reverse;
use std::sync::Arc;

use snooze_domain::{CurrentUser, NewStory, Story, StoryCollection, StoryId, User};

use crate::application::dto::{Navigation, Section, StoryCard};
use crate::application::services::{FavoriteChange, SessionStore, StoryCatalog};
use crate::application::SessionError;
use crate::ports::outbound::{StorageProvider, StoryApiPort, StoryRenderer};

pub struct SessionContext<S: StorageProvider> {
    sessions: SessionStore<S>,
    catalog: StoryCatalog,
    current: CurrentUser,
}

impl<S: StorageProvider> SessionContext<S> {
    pub fn new(api: Arc<dyn StoryApiPort>, storage: S) -> Self {
        Self {
            sessions: SessionStore::new(Arc::clone(&api), storage),
            catalog: StoryCatalog::new(api),
            current: CurrentUser::Anonymous,
        }
    }

    /// Restore any persisted session, then load the story list.
    ///
    /// A session that cannot be restored leaves the context anonymous; only a
    /// failure to load stories is reported.
    pub async fn start(&mut self) -> Result<(), SessionError> {
        self.restore().await;
        self.catalog.fetch_all().await?;
        Ok(())
    }

    /// Restore any persisted session without touching the story list.
    pub async fn restore(&mut self) -> &CurrentUser {
        self.current = self.sessions.restore_session().await.into();
        &self.current
    }

    pub fn current_user(&self) -> &CurrentUser {
        &self.current
    }

    pub fn stories(&self) -> &StoryCollection {
        self.catalog.stories()
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<User, SessionError> {
        let user = self.sessions.login(username, password).await?;
        self.current = CurrentUser::Authenticated(user.clone());
        Ok(user)
    }

    pub async fn signup(
        &mut self,
        username: &str,
        password: &str,
        display_name: &str,
    ) -> Result<User, SessionError> {
        let user = self.sessions.signup(username, password, display_name).await?;
        self.current = CurrentUser::Authenticated(user.clone());
        Ok(user)
    }

    /// Full reset: durable store cleared, user and cached stories dropped.
    pub fn logout(&mut self) {
        self.sessions.logout();
        self.current = CurrentUser::Anonymous;
        self.catalog.reset();
    }

    pub async fn fetch_stories(&mut self) -> Result<&StoryCollection, SessionError> {
        self.catalog.fetch_all().await
    }

    /// Submit a story, then refetch the user and the story list.
    ///
    /// Once the server has created the story this returns it even if either
    /// refetch fails; the failure only leaves local state stale and is logged.
    pub async fn submit_story(&mut self, story: NewStory) -> Result<Story, SessionError> {
        let user = self.require_user()?;
        let created = self.catalog.add_story(&user.token, &story).await?;
        // Logged inside refresh_on_write; the previous user is kept.
        let _ = self.refresh_on_write().await;
        if let Err(e) = self.catalog.fetch_all().await {
            tracing::warn!(story_id = %created.id, error = %e, "Story list refetch after submit failed");
        }
        Ok(created)
    }

    /// Delete one of the user's stories, drop it from the rendered list, then
    /// refetch the user so its own-stories set no longer lists it.
    pub async fn delete_story(&mut self, story_id: StoryId) -> Result<(), SessionError> {
        let user = self.require_user()?;
        self.catalog.delete_story(&user.token, story_id).await?;
        self.catalog.remove_rendered(story_id);
        self.refresh_on_write().await?;
        Ok(())
    }

    /// Flip favorite status for the current user, then refetch the user.
    pub async fn toggle_favorite(
        &mut self,
        story_id: StoryId,
    ) -> Result<FavoriteChange, SessionError> {
        let user = self.require_user()?;
        let change = self.catalog.toggle_favorite(user, story_id).await?;
        self.refresh_on_write().await?;
        Ok(change)
    }

    /// Derived from the current user's favorites; false when anonymous.
    pub fn is_favorited(&self, story_id: StoryId) -> bool {
        self.current.is_favorite(story_id)
    }

    /// Refetch the current user from the server.
    pub async fn refresh_current_user(&mut self) -> Result<User, SessionError> {
        self.refresh_on_write().await?;
        self.require_user().cloned()
    }

    /// Stories for a section with their per-user flags.
    ///
    /// The favorites and own-stories sets have no inherent order; they are
    /// listed most recent first to match the main list.
    pub fn cards(&self, section: Section) -> Vec<StoryCard<'_>> {
        match section {
            Section::AllStories => self
                .catalog
                .stories()
                .iter()
                .map(|story| self.card(story, false))
                .collect(),
            Section::Favorites => match self.current.user() {
                Some(user) => newest_first(user.favorites.iter())
                    .into_iter()
                    .map(|story| self.card(story, false))
                    .collect(),
                None => Vec::new(),
            },
            Section::OwnStories => match self.current.user() {
                Some(user) => newest_first(user.own_stories.iter())
                    .into_iter()
                    .map(|story| self.card(story, true))
                    .collect(),
                None => Vec::new(),
            },
        }
    }

    pub fn all_stories(&self) -> Vec<StoryCard<'_>> {
        self.cards(Section::AllStories)
    }

    pub fn favorite_stories(&self) -> Vec<StoryCard<'_>> {
        self.cards(Section::Favorites)
    }

    pub fn own_stories(&self) -> Vec<StoryCard<'_>> {
        self.cards(Section::OwnStories)
    }

    pub fn navigation(&self) -> Navigation {
        Navigation::for_user(&self.current)
    }

    /// Render a section with the given renderer, one unit per story.
    pub fn render<R>(&self, section: Section, renderer: &R) -> Vec<String>
    where
        R: StoryRenderer + ?Sized,
    {
        self.cards(section)
            .into_iter()
            .map(|card| renderer.render_story(card.story, card.is_favorite, card.is_own))
            .collect()
    }

    /// Refresh-on-write: replace the current user with the server's record.
    ///
    /// If the refetch fails the previous user is kept and the error returned;
    /// the write itself has already been accepted by the server.
    async fn refresh_on_write(&mut self) -> Result<(), SessionError> {
        let user = self.require_user()?;
        let refreshed = self.sessions.refresh(user).await.map_err(|e| {
            tracing::warn!(error = %e, "Refresh after write failed");
            e
        })?;
        self.current = CurrentUser::Authenticated(refreshed);
        Ok(())
    }

    fn require_user(&self) -> Result<&User, SessionError> {
        self.current.user().ok_or(SessionError::NotAuthenticated)
    }

    fn card<'a>(&self, story: &'a Story, is_own: bool) -> StoryCard<'a> {
        StoryCard {
            story,
            is_favorite: self.is_favorited(story.id),
            is_own,
        }
    }
}

fn newest_first<'a>(stories: impl Iterator<Item = &'a Story>) -> Vec<&'a Story> {
    let mut stories: Vec<_> = stories.collect();
    stories.sort_by_key(|s| Reverse(s.created_at));
    stories
}
