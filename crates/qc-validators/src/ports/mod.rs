//! # Ports Layer
//!
//! - **Outbound (Driven)**: the validator-state oracle and membership listeners

pub mod outbound;
