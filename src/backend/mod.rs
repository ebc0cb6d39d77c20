//! Story backend client module for HTTP communication

mod client;
mod error;
mod traits;
mod types;

pub use client::{HttpStoryBackend, DEFAULT_BACKEND_URL};
pub use error::BackendError;
pub use traits::StoryBackend;
pub use types::*;

#[cfg(test)]
pub use traits::MockStoryBackend;
