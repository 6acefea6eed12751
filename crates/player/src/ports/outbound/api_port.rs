//! Story API port - authentication, story CRUD, and favorites
//!
//! The remote service is a black box; this trait is its whole contract as far
//! as the client is concerned. Adapters translate transport failures into
//! `ApiError` and hand back the success status so callers can insist on the
//! exact status an operation promises ("created" for submissions, "ok" for
//! deletes and favorite toggles).

use snooze_domain::{DisplayName, LoginToken, NewStory, Story, StoryId, User, Username};

/// Errors reported by a story API adapter
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The service could not be reached or the request did not complete
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Credentials or token were refused
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The addressed user or story does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The service refused the request (bad input, conflict, ...)
    #[error("Rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The response body did not have the expected shape
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// The request body could not be encoded
    #[error("Failed to serialize request: {0}")]
    SerializeError(String),
}

/// Success status returned by a mutating call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ApiStatus(u16);

impl ApiStatus {
    pub const OK: ApiStatus = ApiStatus(200);
    pub const CREATED: ApiStatus = ApiStatus(201);

    pub fn new(code: u16) -> Self {
        Self(code)
    }

    pub fn code(self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for ApiStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Body plus the status it arrived with
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub status: ApiStatus,
    pub body: T,
}

impl<T> ApiResponse<T> {
    pub fn new(status: ApiStatus, body: T) -> Self {
        Self { status, body }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait StoryApiPort: Send + Sync {
    // Accounts: both return the user carrying its freshly issued token
    async fn authenticate(&self, username: &Username, password: &str) -> Result<User, ApiError>;

    async fn create_account(
        &self,
        username: &Username,
        password: &str,
        display_name: &DisplayName,
    ) -> Result<User, ApiError>;

    /// Fetch the full user record. `Ok(None)` when the account no longer exists.
    async fn fetch_user(
        &self,
        token: &LoginToken,
        username: &Username,
    ) -> Result<Option<User>, ApiError>;

    // Stories
    async fn list_stories(&self) -> Result<Vec<Story>, ApiError>;

    async fn create_story(
        &self,
        token: &LoginToken,
        story: &NewStory,
    ) -> Result<ApiResponse<Story>, ApiError>;

    async fn delete_story(
        &self,
        token: &LoginToken,
        story_id: StoryId,
    ) -> Result<ApiStatus, ApiError>;

    // Favorites
    async fn favorite(
        &self,
        token: &LoginToken,
        username: &Username,
        story_id: StoryId,
    ) -> Result<ApiStatus, ApiError>;

    async fn unfavorite(
        &self,
        token: &LoginToken,
        username: &Username,
        story_id: StoryId,
    ) -> Result<ApiStatus, ApiError>;
}
