//! A terminal podcast player written in Rust.
//!
//! podcastr fetches the latest episodes from a REST backend, lists them on a
//! homepage with a per-episode detail view, and plays them through an external
//! audio player. Every view shares a single [`context::PlayerContext`] that
//! owns the playback queue and the play/loop/shuffle flags.
//!
//! # Features
//!
//! - Latest and all episodes on one homepage
//! - Play the whole queue from any episode, or a single episode
//! - Next/previous navigation, loop and shuffle
//! - Automatic advance when an episode finishes
//!
//! # Usage
//!
//! ```bash
//! # Against a local json-server backend
//! cargo run -- --api-url http://localhost:3333
//! ```

pub mod api;
pub mod audio;
pub mod catalog;
pub mod config;
pub mod context;
pub mod error;
pub mod format;
pub mod player;
pub mod tui;
pub mod types;
