//! Simple test fixtures used across unit tests.

use chrono::Utc;
use snooze_domain::{DisplayName, LoginToken, NewStory, Story, StoryId, User, Username};

use crate::ports::outbound::ApiError;

pub fn api_request_failed(msg: &str) -> ApiError {
    ApiError::RequestFailed(msg.to_string())
}

pub fn user(username: &str, name: &str, token: &str) -> User {
    User {
        username: Username::new(username).unwrap(),
        name: DisplayName::new(name).unwrap(),
        token: LoginToken::new(token).unwrap(),
        favorites: Default::default(),
        own_stories: Default::default(),
        created_at: None,
    }
}

pub fn story(username: &str, title: &str) -> Story {
    Story {
        id: StoryId::new(),
        author: "Someone".to_string(),
        title: title.to_string(),
        url: "http://example.com".to_string(),
        username: Username::new(username).unwrap(),
        created_at: Some(Utc::now()),
    }
}

pub fn new_story(title: &str) -> NewStory {
    NewStory::new("Someone", title, "http://example.com").unwrap()
}
