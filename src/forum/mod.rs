//! Forum REST API collaborator
//!
//! Thin typed pass-throughs to a Discourse-style forum. No algorithmic
//! logic lives here; the discovery subsystem is in `crate::discovery`.

pub mod client;
pub mod types;

pub use client::ForumClient;
