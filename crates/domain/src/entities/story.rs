//! Story entity - A submitted link with author, title, URL, and owner
//!
//! Stories are created by submission and destroyed by their owner. They are
//! otherwise immutable; favorite status is never stored here but derived from
//! the current user's favorites.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::common::host_name;
use crate::error::DomainError;
use crate::ids::StoryId;
use crate::value_objects::Username;

/// Maximum length for the author and title fields
const MAX_FIELD_LENGTH: usize = 500;

/// A story as returned by the story API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub id: StoryId,
    /// Free-text author credit (not necessarily the submitting account)
    pub author: String,
    pub title: String,
    pub url: String,
    /// Account that submitted the story
    pub username: Username,
    pub created_at: Option<DateTime<Utc>>,
}

impl Story {
    /// Host name shown next to the link (e.g. "example.com")
    pub fn host_name(&self) -> &str {
        host_name(&self.url)
    }

    /// Whether `username` submitted this story
    pub fn is_owned_by(&self, username: &Username) -> bool {
        &self.username == username
    }
}

/// Submission payload for a new story.
///
/// Validated on construction so a malformed submission never reaches the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewStory {
    author: String,
    title: String,
    url: String,
}

impl NewStory {
    /// Create a validated submission.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if:
    /// - author or title is empty after trimming, or longer than 500 characters
    /// - url is not an absolute http(s) URL
    pub fn new(
        author: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let author = required_field("Author", author.into())?;
        let title = required_field("Title", title.into())?;
        let url = url.into().trim().to_string();

        let parsed =
            Url::parse(&url).map_err(|e| DomainError::validation(format!("Invalid URL: {}", e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(DomainError::validation(format!(
                "URL must use http or https, got {}",
                parsed.scheme()
            )));
        }

        Ok(Self { author, title, url })
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

fn required_field(label: &str, value: String) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{} cannot be empty", label)));
    }
    if trimmed.chars().count() > MAX_FIELD_LENGTH {
        return Err(DomainError::validation(format!(
            "{} cannot exceed {} characters",
            label, MAX_FIELD_LENGTH
        )));
    }
    Ok(trimmed.to_string())
}

/// Ordered list of stories in server order (most recent first).
///
/// Replaced wholesale on every fetch; the only in-place edit is dropping a
/// story the server has confirmed deleted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoryCollection {
    stories: Vec<Story>,
}

impl StoryCollection {
    pub fn new(stories: Vec<Story>) -> Self {
        Self { stories }
    }

    pub fn get(&self, id: StoryId) -> Option<&Story> {
        self.stories.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: StoryId) -> bool {
        self.get(id).is_some()
    }

    /// Remove a story by id, returning it if it was present.
    pub fn remove(&mut self, id: StoryId) -> Option<Story> {
        let index = self.stories.iter().position(|s| s.id == id)?;
        Some(self.stories.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Story> {
        self.stories.iter()
    }

    pub fn len(&self) -> usize {
        self.stories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }

    pub fn as_slice(&self) -> &[Story] {
        &self.stories
    }
}

impl From<Vec<Story>> for StoryCollection {
    fn from(stories: Vec<Story>) -> Self {
        Self::new(stories)
    }
}

impl<'a> IntoIterator for &'a StoryCollection {
    type Item = &'a Story;
    type IntoIter = std::slice::Iter<'a, Story>;

    fn into_iter(self) -> Self::IntoIter {
        self.stories.iter()
    }
}
