//! Domain layer for the message throttler
//!
//! - config: pool sizes and validation
//! - budget: closed accounting of both byte pools
//! - errors: acquire/release and configuration failures

mod budget;
mod config;
mod errors;

pub use budget::*;
pub use config::*;
pub use errors::*;
