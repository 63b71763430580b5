//! # Domain Layer

pub mod config;
pub mod errors;
pub mod message;
pub mod quorum;

pub use config::{CoordinatorConfig, DEFAULT_ACTION_TYPE};
pub use errors::CoordinatorError;
pub use message::{message_hash, request_id};
pub use quorum::VoteTally;
