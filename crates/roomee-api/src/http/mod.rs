//! HTTP and WebSocket layer for the roomee chat service.
//!
//! Axum-based: a pull-query endpoint over the message log, the realtime
//! WebSocket channel, and a liveness probe, with CORS and request tracing.

pub mod error;
pub mod handlers;
pub mod router;
