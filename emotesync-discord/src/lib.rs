//! Discord REST (API v10) implementation of the remote collaborators.
//!
//! [`DiscordClient`] implements both
//! [`RemoteEmoteStore`](emotesync_sync::RemoteEmoteStore) and
//! [`Notifier`](emotesync_sync::Notifier) over blocking HTTP.

pub mod api;
pub mod client;
pub mod error;
pub mod image;

pub use client::DiscordClient;
