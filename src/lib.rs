//! Courseware RTM - Real-time messaging fanout for the courseware platform
//!
//! Pushes change notifications for authored activities, learner progress
//! and competency documents to every subscribed WebSocket client except the
//! one that caused the change, and carries the diff-sync handshake over a
//! per-client channel.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
