#[cfg(not(target_arch = "wasm32"))]
pub mod http;
pub mod platform;
pub mod rendering;

pub mod testing;

#[cfg(not(target_arch = "wasm32"))]
pub use http::HttpStoryApi;
pub use rendering::{HtmlStoryRenderer, TextStoryRenderer};
