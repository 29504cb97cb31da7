//! Domain layer for the validator set
//!
//! - validator: stored records and their public projection
//! - set: O(1)-mutation validator set
//! - canonical: deterministic signer ordering

mod canonical;
mod errors;
mod set;
mod validator;

pub use canonical::*;
pub use errors::*;
pub use set::*;
pub use validator::*;
