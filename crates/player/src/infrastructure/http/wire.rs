//! JSON shapes of the story API.
//!
//! Kept separate from the domain types: the server calls the id `storyId`,
//! returns the token next to the user rather than on it, and names the
//! authored stories `stories`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use snooze_domain::{DisplayName, LoginToken, NewStory, Story, StoryId, User, Username};

// =============================================================================
// Responses
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryWire {
    pub story_id: StoryId,
    pub title: String,
    pub author: String,
    pub url: String,
    pub username: Username,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<StoryWire> for Story {
    fn from(wire: StoryWire) -> Self {
        Story {
            id: wire.story_id,
            author: wire.author,
            title: wire.title,
            url: wire.url,
            username: wire.username,
            created_at: wire.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWire {
    pub username: Username,
    pub name: DisplayName,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub favorites: Vec<StoryWire>,
    #[serde(default)]
    pub stories: Vec<StoryWire>,
}

impl UserWire {
    /// The server never echoes the token inside the user record.
    pub fn into_user(self, token: LoginToken) -> User {
        User {
            username: self.username,
            name: self.name,
            token,
            favorites: self.favorites.into_iter().map(Story::from).collect(),
            own_stories: self.stories.into_iter().map(Story::from).collect(),
            created_at: self.created_at,
        }
    }
}

/// Body of `/login` and `/signup`
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub token: LoginToken,
    pub user: UserWire,
}

#[derive(Debug, Deserialize)]
pub struct UserEnvelope {
    pub user: UserWire,
}

#[derive(Debug, Deserialize)]
pub struct StoriesEnvelope {
    pub stories: Vec<StoryWire>,
}

#[derive(Debug, Deserialize)]
pub struct StoryEnvelope {
    pub story: StoryWire,
}

#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorEnvelope {
    /// Best human-readable message in an error body, if it has one
    pub fn parse_message(body: &str) -> Option<String> {
        let envelope: ErrorEnvelope = serde_json::from_str(body).ok()?;
        envelope.error.message.or(envelope.error.title)
    }
}

// =============================================================================
// Requests
// =============================================================================

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub user: Credentials<'a>,
}

#[derive(Debug, Serialize)]
pub struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct SignupRequest<'a> {
    pub user: NewAccount<'a>,
}

#[derive(Debug, Serialize)]
pub struct NewAccount<'a> {
    pub name: &'a str,
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct TokenBody<'a> {
    pub token: &'a str,
}

#[derive(Debug, Serialize)]
pub struct CreateStoryRequest<'a> {
    pub token: &'a str,
    pub story: &'a NewStory,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn story_json(id: StoryId) -> serde_json::Value {
        json!({
            "storyId": id.to_string(),
            "title": "Test",
            "author": "Alice",
            "url": "http://example.com",
            "username": "alice",
            "createdAt": "2024-03-01T12:00:00.000Z",
            "updatedAt": "2024-03-01T12:00:00.000Z"
        })
    }

    #[test]
    fn auth_response_builds_user_with_token() {
        let fav = StoryId::new();
        let own = StoryId::new();
        let body = json!({
            "token": "abc123",
            "user": {
                "username": "alice",
                "name": "Alice",
                "createdAt": "2024-01-01T00:00:00.000Z",
                "favorites": [story_json(fav)],
                "stories": [story_json(own)]
            }
        });

        let response: AuthResponse = serde_json::from_value(body).unwrap();
        let user = response.user.into_user(response.token);

        assert_eq!(user.username.as_str(), "alice");
        assert_eq!(user.name.as_str(), "Alice");
        assert_eq!(user.token.expose(), "abc123");
        assert!(user.is_favorite(fav));
        assert!(user.owns(own));
        assert!(user.created_at.is_some());
    }

    #[test]
    fn user_without_story_lists_has_empty_sets() {
        let body = json!({"user": {"username": "bob", "name": "Bob"}});
        let envelope: UserEnvelope = serde_json::from_value(body).unwrap();
        let user = envelope
            .user
            .into_user(LoginToken::new("t").unwrap());
        assert!(user.favorites.is_empty());
        assert!(user.own_stories.is_empty());
    }

    #[test]
    fn create_story_request_shape() {
        let story = NewStory::new("Alice", "Test", "http://example.com").unwrap();
        let body = serde_json::to_value(CreateStoryRequest {
            token: "abc123",
            story: &story,
        })
        .unwrap();
        assert_eq!(
            body,
            json!({
                "token": "abc123",
                "story": {"author": "Alice", "title": "Test", "url": "http://example.com"}
            })
        );
    }

    #[test]
    fn error_message_prefers_message_over_title() {
        let body = r#"{"error":{"status":409,"title":"Conflict","message":"Username taken"}}"#;
        assert_eq!(
            ErrorEnvelope::parse_message(body).as_deref(),
            Some("Username taken")
        );
        let titled = r#"{"error":{"status":401,"title":"Unauthorized"}}"#;
        assert_eq!(
            ErrorEnvelope::parse_message(titled).as_deref(),
            Some("Unauthorized")
        );
        assert!(ErrorEnvelope::parse_message("<html>").is_none());
    }
}
