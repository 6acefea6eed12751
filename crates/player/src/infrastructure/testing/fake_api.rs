//! In-memory story server implementing `StoryApiPort`.
//!
//! Behaves like the real service closely enough for scenario tests: it checks
//! tokens, assigns story ids, answers 201 on create and 200 on other writes,
//! and rebuilds each user's favorites and own stories on every fetch.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use snooze_domain::{DisplayName, LoginToken, NewStory, Story, StoryId, User, Username};

use crate::ports::outbound::{ApiError, ApiResponse, ApiStatus, StoryApiPort};

struct Account {
    username: Username,
    password: String,
    name: DisplayName,
    token: LoginToken,
    favorites: BTreeSet<StoryId>,
}

#[derive(Default)]
struct State {
    accounts: BTreeMap<String, Account>,
    /// Newest first, as the service lists them
    stories: Vec<Story>,
    issued_tokens: u32,
    offline: bool,
}

impl State {
    fn user(&self, account: &Account) -> User {
        let favorites = self
            .stories
            .iter()
            .filter(|s| account.favorites.contains(&s.id))
            .cloned()
            .collect();
        let own_stories = self
            .stories
            .iter()
            .filter(|s| s.username == account.username)
            .cloned()
            .collect();

        User {
            username: account.username.clone(),
            name: account.name.clone(),
            token: account.token.clone(),
            favorites,
            own_stories,
            created_at: None,
        }
    }

    fn account_for_token(&self, token: &LoginToken) -> Result<&Account, ApiError> {
        self.accounts
            .values()
            .find(|a| &a.token == token)
            .ok_or_else(|| ApiError::Unauthorized("Invalid token".to_string()))
    }

    fn account_mut(
        &mut self,
        token: &LoginToken,
        username: &Username,
    ) -> Result<&mut Account, ApiError> {
        match self.accounts.get_mut(username.as_str()) {
            Some(account) if &account.token == token => Ok(account),
            Some(_) => Err(ApiError::Unauthorized("Invalid token".to_string())),
            None => Err(ApiError::NotFound(format!("No such user: {username}"))),
        }
    }

    fn require_story(&self, story_id: StoryId) -> Result<(), ApiError> {
        if self.stories.iter().any(|s| s.id == story_id) {
            Ok(())
        } else {
            Err(ApiError::NotFound(format!("No such story: {story_id}")))
        }
    }

    fn check_online(&self) -> Result<(), ApiError> {
        if self.offline {
            Err(ApiError::RequestFailed("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

/// Story server kept entirely in memory.
///
/// Clones share the same state, so a test can hand one clone to the session
/// and keep another to inspect or reconfigure the server.
#[derive(Clone, Default)]
pub struct FakeStoryApi {
    state: Arc<Mutex<State>>,
}

impl FakeStoryApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account that logs in with `password` and receives `token`.
    pub fn with_account(
        self,
        username: Username,
        password: &str,
        name: DisplayName,
        token: LoginToken,
    ) -> Self {
        self.lock().accounts.insert(
            username.as_str().to_string(),
            Account {
                username,
                password: password.to_string(),
                name,
                token,
                favorites: BTreeSet::new(),
            },
        );
        self
    }

    /// Add a story directly on the server side, as if another client posted it.
    pub fn seed_story(&self, story: Story) {
        self.lock().stories.insert(0, story);
    }

    /// While offline every call fails as a transport error.
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    /// Drop an account, as if it had been deleted on the server.
    pub fn remove_account(&self, username: &Username) {
        self.lock().accounts.remove(username.as_str());
    }

    pub fn story_ids(&self) -> Vec<StoryId> {
        self.lock().stories.iter().map(|s| s.id).collect()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl StoryApiPort for FakeStoryApi {
    async fn authenticate(&self, username: &Username, password: &str) -> Result<User, ApiError> {
        let state = self.lock();
        state.check_online()?;
        match state.accounts.get(username.as_str()) {
            Some(account) if account.password == password => Ok(state.user(account)),
            Some(_) => Err(ApiError::Unauthorized("Invalid password".to_string())),
            None => Err(ApiError::NotFound(format!("No such user: {username}"))),
        }
    }

    async fn create_account(
        &self,
        username: &Username,
        password: &str,
        display_name: &DisplayName,
    ) -> Result<User, ApiError> {
        let mut state = self.lock();
        state.check_online()?;
        if state.accounts.contains_key(username.as_str()) {
            return Err(ApiError::Rejected {
                status: 409,
                message: format!("There already exists a user with username '{username}'"),
            });
        }

        state.issued_tokens += 1;
        let token = LoginToken::new(format!("token-{}", state.issued_tokens))
            .map_err(|e| ApiError::SerializeError(e.to_string()))?;
        let account = Account {
            username: username.clone(),
            password: password.to_string(),
            name: display_name.clone(),
            token,
            favorites: BTreeSet::new(),
        };
        let user = state.user(&account);
        state
            .accounts
            .insert(username.as_str().to_string(), account);
        Ok(user)
    }

    async fn fetch_user(
        &self,
        token: &LoginToken,
        username: &Username,
    ) -> Result<Option<User>, ApiError> {
        let state = self.lock();
        state.check_online()?;
        match state.accounts.get(username.as_str()) {
            Some(account) if &account.token == token => Ok(Some(state.user(account))),
            Some(_) => Err(ApiError::Unauthorized("Invalid token".to_string())),
            None => Ok(None),
        }
    }

    async fn list_stories(&self) -> Result<Vec<Story>, ApiError> {
        let state = self.lock();
        state.check_online()?;
        Ok(state.stories.clone())
    }

    async fn create_story(
        &self,
        token: &LoginToken,
        story: &NewStory,
    ) -> Result<ApiResponse<Story>, ApiError> {
        let mut state = self.lock();
        state.check_online()?;
        let username = state.account_for_token(token)?.username.clone();

        let created = Story {
            id: StoryId::new(),
            author: story.author().to_string(),
            title: story.title().to_string(),
            url: story.url().to_string(),
            username,
            created_at: Some(Utc::now()),
        };
        state.stories.insert(0, created.clone());
        Ok(ApiResponse::new(ApiStatus::CREATED, created))
    }

    async fn delete_story(
        &self,
        token: &LoginToken,
        story_id: StoryId,
    ) -> Result<ApiStatus, ApiError> {
        let mut state = self.lock();
        state.check_online()?;
        let username = state.account_for_token(token)?.username.clone();
        let story = state
            .stories
            .iter()
            .find(|s| s.id == story_id)
            .ok_or_else(|| ApiError::NotFound(format!("No such story: {story_id}")))?;
        if story.username != username {
            return Err(ApiError::Rejected {
                status: 403,
                message: "Only the creator of a story can delete it".to_string(),
            });
        }

        state.stories.retain(|s| s.id != story_id);
        for account in state.accounts.values_mut() {
            account.favorites.remove(&story_id);
        }
        Ok(ApiStatus::OK)
    }

    async fn favorite(
        &self,
        token: &LoginToken,
        username: &Username,
        story_id: StoryId,
    ) -> Result<ApiStatus, ApiError> {
        let mut state = self.lock();
        state.check_online()?;
        state.require_story(story_id)?;
        state.account_mut(token, username)?.favorites.insert(story_id);
        Ok(ApiStatus::OK)
    }

    async fn unfavorite(
        &self,
        token: &LoginToken,
        username: &Username,
        story_id: StoryId,
    ) -> Result<ApiStatus, ApiError> {
        let mut state = self.lock();
        state.check_online()?;
        state.require_story(story_id)?;
        state
            .account_mut(token, username)?
            .favorites
            .remove(&story_id);
        Ok(ApiStatus::OK)
    }
}
