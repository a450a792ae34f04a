//! Core traits for zonesync
//!
//! This module defines the abstract interfaces at the engine's boundaries.
//!
//! - [`RemoteClient`]: Talk to a provider's record API
//! - [`ZoneSink`]: Receive populated records

pub mod remote_client;
pub mod zone_sink;

pub use remote_client::{RemoteClient, RemoteClientFactory};
pub use zone_sink::ZoneSink;
