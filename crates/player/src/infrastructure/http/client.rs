//! Story API client over HTTP
//!
//! Implements the StoryApiPort trait against the Hack-or-Snooze style REST
//! API. Non-success statuses become `ApiError`s; success statuses are handed
//! back so the application layer can check for the exact one it needs.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use snooze_domain::{DisplayName, LoginToken, NewStory, Story, StoryId, User, Username};

use super::wire::{
    AuthResponse, CreateStoryRequest, Credentials, ErrorEnvelope, LoginRequest, NewAccount,
    SignupRequest, StoriesEnvelope, StoryEnvelope, TokenBody, UserEnvelope,
};
use crate::ports::outbound::{ApiError, ApiResponse, ApiStatus, StoryApiPort};

/// Client for the story API
#[derive(Clone)]
pub struct HttpStoryApi {
    client: Client,
    base_url: Url,
}

impl HttpStoryApi {
    pub fn new(base_url: Url, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, base_url }
    }

    /// Build an endpoint URL from path segments, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::RequestFailed(format!("Invalid base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request, turning transport failures and non-success statuses into errors.
    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(error_from_response(response).await)
        }
    }

    async fn authenticated_user(&self, request: RequestBuilder) -> Result<User, ApiError> {
        let response = self.send(request).await?;
        let body: AuthResponse = read_json(response).await?;
        Ok(body.user.into_user(body.token))
    }

    async fn send_for_status(&self, request: RequestBuilder) -> Result<ApiStatus, ApiError> {
        let response = self.send(request).await?;
        Ok(ApiStatus::new(response.status().as_u16()))
    }

    fn user_request(
        &self,
        token: &LoginToken,
        username: &Username,
    ) -> Result<RequestBuilder, ApiError> {
        Ok(self
            .client
            .get(self.endpoint(&["users", username.as_str()])?)
            .query(&[("token", token.expose())]))
    }

    fn create_story_request(
        &self,
        token: &LoginToken,
        story: &NewStory,
    ) -> Result<RequestBuilder, ApiError> {
        Ok(self
            .client
            .post(self.endpoint(&["stories"])?)
            .json(&CreateStoryRequest {
                token: token.expose(),
                story,
            }))
    }

    fn delete_story_request(
        &self,
        token: &LoginToken,
        story_id: StoryId,
    ) -> Result<RequestBuilder, ApiError> {
        let story_id = story_id.to_string();
        Ok(self
            .client
            .delete(self.endpoint(&["stories", &story_id])?)
            .json(&TokenBody {
                token: token.expose(),
            }))
    }

    /// POST adds the favorite, DELETE removes it; same URL and body either way.
    fn favorite_request(
        &self,
        method: Method,
        token: &LoginToken,
        username: &Username,
        story_id: StoryId,
    ) -> Result<RequestBuilder, ApiError> {
        let story_id = story_id.to_string();
        let url = self.endpoint(&["users", username.as_str(), "favorites", &story_id])?;
        Ok(self.client.request(method, url).json(&TokenBody {
            token: token.expose(),
        }))
    }
}

async fn read_text(response: Response) -> Result<String, ApiError> {
    response
        .text()
        .await
        .map_err(|e| ApiError::RequestFailed(e.to_string()))
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    parse_json(&read_text(response).await?)
}

fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::ParseError(e.to_string()))
}

/// A 404 on a lookup means the thing is gone, not that the call failed.
fn absent_if_not_found<T>(result: Result<T, ApiError>) -> Result<Option<T>, ApiError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(ApiError::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Pair the created story with the status it arrived with, whatever that was.
fn created_story(status: StatusCode, body: &str) -> Result<ApiResponse<Story>, ApiError> {
    let envelope: StoryEnvelope = parse_json(body)?;
    Ok(ApiResponse::new(
        ApiStatus::new(status.as_u16()),
        envelope.story.into(),
    ))
}

async fn error_from_response(response: Response) -> ApiError {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    classify_error(status, &body)
}

fn classify_error(status: StatusCode, body: &str) -> ApiError {
    let message = ErrorEnvelope::parse_message(body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    });

    match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized(message),
        StatusCode::NOT_FOUND => ApiError::NotFound(message),
        _ => ApiError::Rejected {
            status: status.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl StoryApiPort for HttpStoryApi {
    async fn authenticate(&self, username: &Username, password: &str) -> Result<User, ApiError> {
        let request = self
            .client
            .post(self.endpoint(&["login"])?)
            .json(&LoginRequest {
                user: Credentials {
                    username: username.as_str(),
                    password,
                },
            });
        self.authenticated_user(request).await
    }

    async fn create_account(
        &self,
        username: &Username,
        password: &str,
        display_name: &DisplayName,
    ) -> Result<User, ApiError> {
        let request = self
            .client
            .post(self.endpoint(&["signup"])?)
            .json(&SignupRequest {
                user: NewAccount {
                    name: display_name.as_str(),
                    username: username.as_str(),
                    password,
                },
            });
        self.authenticated_user(request).await
    }

    async fn fetch_user(
        &self,
        token: &LoginToken,
        username: &Username,
    ) -> Result<Option<User>, ApiError> {
        let request = self.user_request(token, username)?;
        let Some(response) = absent_if_not_found(self.send(request).await)? else {
            return Ok(None);
        };
        let body: UserEnvelope = read_json(response).await?;
        Ok(Some(body.user.into_user(token.clone())))
    }

    async fn list_stories(&self) -> Result<Vec<Story>, ApiError> {
        let request = self.client.get(self.endpoint(&["stories"])?);
        let response = self.send(request).await?;
        let body: StoriesEnvelope = read_json(response).await?;
        Ok(body.stories.into_iter().map(Story::from).collect())
    }

    async fn create_story(
        &self,
        token: &LoginToken,
        story: &NewStory,
    ) -> Result<ApiResponse<Story>, ApiError> {
        let request = self.create_story_request(token, story)?;
        let response = self.send(request).await?;
        let status = response.status();
        created_story(status, &read_text(response).await?)
    }

    async fn delete_story(
        &self,
        token: &LoginToken,
        story_id: StoryId,
    ) -> Result<ApiStatus, ApiError> {
        let request = self.delete_story_request(token, story_id)?;
        self.send_for_status(request).await
    }

    async fn favorite(
        &self,
        token: &LoginToken,
        username: &Username,
        story_id: StoryId,
    ) -> Result<ApiStatus, ApiError> {
        let request = self.favorite_request(Method::POST, token, username, story_id)?;
        self.send_for_status(request).await
    }

    async fn unfavorite(
        &self,
        token: &LoginToken,
        username: &Username,
        story_id: StoryId,
    ) -> Result<ApiStatus, ApiError> {
        let request = self.favorite_request(Method::DELETE, token, username, story_id)?;
        self.send_for_status(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base: &str) -> HttpStoryApi {
        HttpStoryApi::new(Url::parse(base).unwrap(), Duration::from_secs(5))
    }

    fn token() -> LoginToken {
        LoginToken::new("abc123").unwrap()
    }

    fn alice() -> Username {
        Username::new("alice").unwrap()
    }

    fn json_body(request: &reqwest::Request) -> serde_json::Value {
        let bytes = request.body().and_then(|b| b.as_bytes()).unwrap();
        serde_json::from_slice(bytes).unwrap()
    }

    #[test]
    fn endpoint_appends_segments() {
        let url = api("https://api.example.com").endpoint(&["users", "alice"]).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/users/alice");
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let url = api("https://api.example.com/v3/").endpoint(&["stories"]).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v3/stories");
    }

    #[test]
    fn endpoint_encodes_segments() {
        let url = api("https://api.example.com").endpoint(&["users", "a/b"]).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/users/a%2Fb");
    }

    #[test]
    fn user_lookup_passes_token_as_query() {
        let request = api("https://api.example.com")
            .user_request(&token(), &alice())
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(request.method(), &Method::GET);
        assert_eq!(
            request.url().as_str(),
            "https://api.example.com/users/alice?token=abc123"
        );
    }

    #[test]
    fn favorite_and_unfavorite_share_url_and_body() {
        let api = api("https://api.example.com");
        let id = StoryId::new();
        for method in [Method::POST, Method::DELETE] {
            let request = api
                .favorite_request(method.clone(), &token(), &alice(), id)
                .unwrap()
                .build()
                .unwrap();
            assert_eq!(request.method(), &method);
            assert_eq!(
                request.url().as_str(),
                format!("https://api.example.com/users/alice/favorites/{id}")
            );
            assert_eq!(json_body(&request), serde_json::json!({ "token": "abc123" }));
        }
    }

    #[test]
    fn delete_story_sends_token_in_body() {
        let id = StoryId::new();
        let request = api("https://api.example.com")
            .delete_story_request(&token(), id)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(request.method(), &Method::DELETE);
        assert_eq!(
            request.url().as_str(),
            format!("https://api.example.com/stories/{id}")
        );
        assert_eq!(json_body(&request), serde_json::json!({ "token": "abc123" }));
    }

    #[test]
    fn create_story_wraps_submission_with_token() {
        let story = NewStory::new("Alice", "Test", "http://example.com").unwrap();
        let request = api("https://api.example.com")
            .create_story_request(&token(), &story)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.url().as_str(), "https://api.example.com/stories");
        let body = json_body(&request);
        assert_eq!(body["token"], "abc123");
        assert_eq!(body["story"]["title"], "Test");
    }

    #[test]
    fn lookup_not_found_is_absent() {
        let missing: Result<u8, ApiError> = Err(ApiError::NotFound("gone".into()));
        assert_eq!(absent_if_not_found(missing), Ok(None));
        assert_eq!(absent_if_not_found(Ok(7u8)), Ok(Some(7)));

        let refused: Result<u8, ApiError> = Err(ApiError::Unauthorized("expired".into()));
        assert_eq!(
            absent_if_not_found(refused),
            Err(ApiError::Unauthorized("expired".into()))
        );
    }

    #[test]
    fn created_story_keeps_the_actual_status() {
        let id = StoryId::new();
        let body = serde_json::json!({
            "story": {
                "storyId": id,
                "title": "Test",
                "author": "Alice",
                "url": "http://example.com",
                "username": "alice"
            }
        })
        .to_string();

        let created = created_story(StatusCode::CREATED, &body).unwrap();
        assert_eq!(created.status, ApiStatus::CREATED);
        assert_eq!(created.body.id, id);
        assert_eq!(created.body.username.as_str(), "alice");

        let ok = created_story(StatusCode::OK, &body).unwrap();
        assert_eq!(ok.status, ApiStatus::OK);
    }

    #[test]
    fn created_story_with_malformed_body_is_parse_error() {
        assert!(matches!(
            created_story(StatusCode::CREATED, "{}"),
            Err(ApiError::ParseError(_))
        ));
    }

    #[test]
    fn unauthorized_status_maps_to_unauthorized() {
        let body = r#"{"error":{"status":401,"title":"Unauthorized","message":"Invalid password"}}"#;
        assert_eq!(
            classify_error(StatusCode::UNAUTHORIZED, body),
            ApiError::Unauthorized("Invalid password".into())
        );
    }

    #[test]
    fn not_found_status_maps_to_not_found() {
        assert_eq!(
            classify_error(StatusCode::NOT_FOUND, ""),
            ApiError::NotFound("Not Found".into())
        );
    }

    #[test]
    fn conflict_status_is_rejected_with_server_message() {
        let body = r#"{"error":{"status":409,"title":"Conflict","message":"Username taken"}}"#;
        assert_eq!(
            classify_error(StatusCode::CONFLICT, body),
            ApiError::Rejected {
                status: 409,
                message: "Username taken".into()
            }
        );
    }
}
