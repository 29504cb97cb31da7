//! # Sybil Flood
//!
//! An attacker spins up many identities with no stake and floods the node.
//! Only the at-large pool may be drained; every validator keeps its share.

#[cfg(test)]
mod tests {
    use qc_throttling::{vdr_allowance, AdmissionState};

    use crate::fixtures::{node, Subnet};

    #[test]
    fn test_sybils_cannot_touch_validator_pool() {
        let subnet = Subnet::with_weights(&[25, 25, 50]);
        let throttler = &subnet.scope.throttler;
        let config = throttler.config();

        let mut granted = 0u64;
        for sybil in 1_000..2_000u16 {
            while throttler.try_acquire(node(sybil), 4_096) {
                granted += 4_096;
            }
        }

        assert!(granted <= config.at_large_alloc_size);
        assert_eq!(throttler.remaining_vdr_bytes(), config.vdr_alloc_size);

        // every validator can still use its full share
        for (i, weight) in [25u64, 25, 50].into_iter().enumerate() {
            let share = vdr_allowance(config.vdr_alloc_size, weight, 100);
            throttler.acquire(node(i as u16 + 1), share).unwrap();
        }
        assert_eq!(throttler.remaining_vdr_bytes(), 0);
    }

    #[test]
    fn test_single_sybil_capped_per_node() {
        let subnet = Subnet::with_weights(&[100]);
        let throttler = &subnet.scope.throttler;
        let cap = throttler.config().node_max_at_large_bytes;

        throttler.acquire(node(500), cap).unwrap();
        assert!(!throttler.try_acquire(node(500), 1));
        assert_eq!(
            throttler.admission_state(&node(500)),
            AdmissionState::Exhausted
        );
        // a second identity gets its own cap from what is left
        assert!(throttler.try_acquire(node(501), cap));
    }

    #[test]
    fn test_validator_bound_is_share_plus_cap() {
        let subnet = Subnet::with_weights(&[10, 90]);
        let throttler = &subnet.scope.throttler;
        let config = throttler.config();
        let bound = vdr_allowance(config.vdr_alloc_size, 10, 100) + config.node_max_at_large_bytes;

        let mut held = 0u64;
        while throttler.try_acquire(node(1), 1_000) {
            held += 1_000;
        }
        assert!(held <= bound);
        assert_eq!(throttler.usage(&node(1)).total(), held);
    }

    #[test]
    fn test_oversized_requests_from_fresh_identities_leave_no_state() {
        let subnet = Subnet::with_weights(&[100]);
        let throttler = &subnet.scope.throttler;
        let cap = throttler.config().node_max_at_large_bytes;

        for sybil in 1_000..u16::MAX {
            assert!(!throttler.try_acquire(node(sybil), cap + 1));
        }
        assert_eq!(throttler.active_nodes(), 0);
        assert_eq!(throttler.exhausted_nodes(), 0);
        assert_eq!(
            throttler.remaining_at_large_bytes(),
            throttler.config().at_large_alloc_size
        );
    }
}
