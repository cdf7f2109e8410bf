//! Channel Talk Callback Server
//!
//! Receives signed webhooks and interactive snippet requests from Channel
//! Talk, verifies them, and routes them to business hooks.

pub mod api;
pub mod boot;
pub mod callbacks;
pub mod config;
pub mod hooks;
pub mod snippet;
