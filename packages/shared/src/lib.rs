//! Shared utilities for the Irori chat server: logging setup and
//! time/clock helpers used by every binary.

pub mod logger;
pub mod time;
