//! Client-side data layer for a quiz-management platform.
//!
//! Instructors manage question banks, groups and quizzes; students join
//! quizzes via a code and submit answers; both read results. This crate
//! provides the typed REST client and the caching layer between a UI and
//! that backend:
//!
//! - [`api::ApiClient`] — transport adapter, one method per endpoint
//! - [`cache`] — per-resource cache with TTL freshness, in-flight
//!   de-duplication and optimistic delete with rollback
//! - [`view`] — pure pagination/filter/sort projection for list views
//! - [`QuizClient`] — the cached facade a UI talks to
//!
//! The crate is UI-agnostic; the `quizdeck` binary is a thin headless CLI
//! over the same layer.

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod view;

pub use client::QuizClient;
pub use error::ApiError;
