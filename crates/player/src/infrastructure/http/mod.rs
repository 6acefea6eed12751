//! HTTP adapter for the story API.

mod client;
mod wire;

pub use client::HttpStoryApi;
