//! Quorum fraction and the exact weight check

use serde::{Deserialize, Serialize};

use super::errors::{WarpError, WarpResult};

/// Minimum fraction of total stake that must sign.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuorumConfig {
    pub quorum_num: u64,
    pub quorum_den: u64,
}

impl Default for QuorumConfig {
    fn default() -> Self {
        Self {
            quorum_num: 67,
            quorum_den: 100,
        }
    }
}

impl QuorumConfig {
    pub fn new(quorum_num: u64, quorum_den: u64) -> WarpResult<Self> {
        let config = Self {
            quorum_num,
            quorum_den,
        };
        config.validate()?;
        Ok(config)
    }

    /// A usable fraction lies in `(0, 1]`.
    pub fn validate(&self) -> WarpResult<()> {
        if self.quorum_den == 0 || self.quorum_num == 0 || self.quorum_num > self.quorum_den {
            return Err(WarpError::InvalidQuorum {
                num: self.quorum_num,
                den: self.quorum_den,
            });
        }
        Ok(())
    }

    pub fn verify_weight(&self, sig_weight: u64, total_weight: u64) -> WarpResult<()> {
        verify_weight(sig_weight, total_weight, self.quorum_num, self.quorum_den)
    }
}

/// Accept iff `sig_weight * quorum_den >= total_weight * quorum_num`.
///
/// Both products are taken in 128 bits, so no input overflows.
pub fn verify_weight(
    sig_weight: u64,
    total_weight: u64,
    quorum_num: u64,
    quorum_den: u64,
) -> WarpResult<()> {
    let scaled_sig = u128::from(sig_weight) * u128::from(quorum_den);
    let scaled_total = u128::from(total_weight) * u128::from(quorum_num);
    if scaled_total > scaled_sig {
        return Err(WarpError::InsufficientWeight {
            sig_weight,
            total_weight,
            quorum_num,
            quorum_den,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_is_inclusive() {
        // 2/3 of 99 is exactly 66
        assert!(verify_weight(66, 99, 2, 3).is_ok());
        assert!(matches!(
            verify_weight(65, 99, 2, 3),
            Err(WarpError::InsufficientWeight { sig_weight: 65, .. })
        ));
    }

    #[test]
    fn test_no_overflow_at_extremes() {
        assert!(verify_weight(u64::MAX, u64::MAX, u64::MAX, u64::MAX).is_ok());
        assert!(verify_weight(u64::MAX - 1, u64::MAX, u64::MAX, u64::MAX).is_err());
        assert!(verify_weight(0, 0, 1, 1).is_ok());
    }

    #[test]
    fn test_invalid_fractions() {
        assert!(QuorumConfig::new(0, 1).is_err());
        assert!(QuorumConfig::new(1, 0).is_err());
        assert!(QuorumConfig::new(4, 3).is_err());
        assert!(QuorumConfig::new(1, 1).is_ok());
        assert!(QuorumConfig::default().validate().is_ok());
    }

    #[test]
    fn test_json_field_names() {
        let config: QuorumConfig =
            serde_json::from_str(r#"{"quorumNum": 2, "quorumDen": 3}"#).unwrap();
        assert_eq!(config, QuorumConfig::new(2, 3).unwrap());
    }
}
