//! Shared domain types for the roomee messaging service.
//!
//! This crate contains the types used across the messaging subsystem:
//! chat messages, room keys, realtime events, and their error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod error;
pub mod event;
pub mod message;
pub mod room;
