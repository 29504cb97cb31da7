//! Cross-crate flows.

pub mod staking_churn;
pub mod trust_flows;
