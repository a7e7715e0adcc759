//! Infrastructure layer: concrete implementations of the domain seams and
//! the transport-boundary DTOs.

pub mod dto;
pub mod message_pusher;
pub mod repository;
