//! # Ports Layer
//!
//! - **Inbound (Driving)**: API that the request coordinator uses

pub mod inbound;
