//! Core logic for remotify
//!
//! Holds the Spotify Web API client used by the proxy routes.

pub mod spotify;
