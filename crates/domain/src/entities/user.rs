//! User entity - The authenticated account and its story sets
//!
//! A `User` is never patched locally after a write. The favorites and
//! authored-story sets are always replaced by refetching the whole record.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::entities::Story;
use crate::ids::StoryId;
use crate::value_objects::{DisplayName, LoginToken, Username};

/// Set of stories keyed by id. Duplicate ids collapse; order is irrelevant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StorySet {
    stories: BTreeMap<StoryId, Story>,
}

impl StorySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: StoryId) -> bool {
        self.stories.contains_key(&id)
    }

    pub fn get(&self, id: StoryId) -> Option<&Story> {
        self.stories.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Story> {
        self.stories.values()
    }

    pub fn len(&self) -> usize {
        self.stories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }
}

impl FromIterator<Story> for StorySet {
    fn from_iter<I: IntoIterator<Item = Story>>(iter: I) -> Self {
        Self {
            stories: iter.into_iter().map(|s| (s.id, s)).collect(),
        }
    }
}

/// The logged-in account as last fetched from the story API
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub username: Username,
    pub name: DisplayName,
    /// Credential required by every mutating API call
    pub token: LoginToken,
    pub favorites: StorySet,
    /// Stories this account submitted
    pub own_stories: StorySet,
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_favorite(&self, story_id: StoryId) -> bool {
        self.favorites.contains(story_id)
    }

    pub fn owns(&self, story_id: StoryId) -> bool {
        self.own_stories.contains(story_id)
    }
}

/// Who is using the client right now.
///
/// `Anonymous` is the named empty state: no session record was restored or
/// the user logged out.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CurrentUser {
    #[default]
    Anonymous,
    Authenticated(User),
}

impl CurrentUser {
    pub fn user(&self) -> Option<&User> {
        match self {
            CurrentUser::Anonymous => None,
            CurrentUser::Authenticated(user) => Some(user),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, CurrentUser::Authenticated(_))
    }

    /// Derived favorite status; always false when anonymous.
    pub fn is_favorite(&self, story_id: StoryId) -> bool {
        self.user().is_some_and(|u| u.is_favorite(story_id))
    }
}

impl From<Option<User>> for CurrentUser {
    fn from(user: Option<User>) -> Self {
        match user {
            Some(user) => CurrentUser::Authenticated(user),
            None => CurrentUser::Anonymous,
        }
    }
}
