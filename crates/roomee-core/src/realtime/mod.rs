//! In-memory realtime layer: session registry and chat broker.
//!
//! The registry owns the live connection -> (identity, room) mapping; the
//! broker dispatches inbound client events, persists sends, and fans the
//! results out to room members.

pub mod broker;
pub mod registry;

pub use broker::ChatBroker;
pub use registry::{ConnectionId, SessionRegistry};
