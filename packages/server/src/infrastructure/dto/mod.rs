//! Data transfer objects for the transport boundary.

pub mod http;
pub mod websocket;
