//! Typed access to the quiz backend's REST API.

mod cache;
pub mod client;
pub mod types;
pub mod wire;

pub use client::ApiClient;
