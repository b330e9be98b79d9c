//! Business logic and repository trait definitions for the roomee
//! messaging service.
//!
//! This crate defines the "port" (the `MessageRepository` trait) that the
//! infrastructure layer implements, the `MessageService` that validates and
//! orchestrates persistence, and the in-memory realtime layer: the session
//! registry and the chat broker. It depends only on `roomee-types` -- never
//! on `roomee-infra` or any database/IO crate.

pub mod message;
pub mod realtime;

#[cfg(test)]
pub(crate) mod testutil;
