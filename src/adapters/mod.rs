//! Adapter implementations for the [`ImageGenerator`](crate::ports::ImageGenerator) port.
//!
//! - `live/` - Real API implementations
//! - `local` - Demo and placeholder generators that never touch the network

pub mod live;
pub mod local;
