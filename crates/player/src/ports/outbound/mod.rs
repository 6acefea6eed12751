//! Outbound ports - Interfaces for external services
//!
//! These ports define the contracts that infrastructure adapters must implement,
//! allowing application services to interact with the story API, durable
//! storage and the renderer without depending on concrete implementations.

pub mod api_port;
pub mod platform;
pub mod renderer_port;

pub use api_port::{ApiError, ApiResponse, ApiStatus, StoryApiPort};
pub use platform::{storage_keys, StorageProvider};
pub use renderer_port::StoryRenderer;

#[cfg(test)]
pub use api_port::MockStoryApiPort;
