//! Irori chat server library.
//!
//! Room-scoped real-time messaging: clients join named rooms over
//! WebSocket, exchange short text messages, and see presence and typing
//! updates. Each room keeps a bounded in-memory history that late joiners
//! receive as backlog.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
