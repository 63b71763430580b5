//! # Domain Layer

pub mod entities;
pub mod errors;
pub mod keys;

pub use entities::{MintReceipt, PreparedMint, TokenMetadata};
pub use errors::TokenError;
