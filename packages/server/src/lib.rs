//! Real-time presence relay.
//!
//! Clients connect over WebSocket, join the shared room, and publish partial
//! updates of their own state. The relay keeps the authoritative registry of
//! participants and fans every join, update and departure out to the others.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod app;
pub mod config;
