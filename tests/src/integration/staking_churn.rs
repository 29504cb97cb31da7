//! # Staking Churn
//!
//! Connection handlers acquire and release while the staking layer keeps
//! changing weights. Accounting must stay closed throughout.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::{Rng, SeedableRng};

    use crate::fixtures::{node, Subnet};

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_accounting_closed_under_churn() {
        let subnet = Arc::new(Subnet::with_weights(&[10, 20, 30, 40]));
        let config = subnet.scope.throttler.config();

        let mut handlers = Vec::new();
        for peer in 1..=8u16 {
            let subnet = Arc::clone(&subnet);
            handlers.push(tokio::spawn(async move {
                let mut rng = rand::rngs::StdRng::seed_from_u64(u64::from(peer));
                let mut held = Vec::new();
                for _ in 0..500 {
                    let size = rng.gen_range(1..50_000u64);
                    if subnet.scope.throttler.try_acquire(node(peer), size) {
                        held.push(size);
                    }
                    if held.len() > 3 {
                        let size = held.remove(0);
                        subnet.scope.throttler.release(node(peer), size).unwrap();
                    }
                    tokio::task::yield_now().await;
                }
                for size in held {
                    subnet.scope.throttler.release(node(peer), size).unwrap();
                }
            }));
        }

        let staking = {
            let subnet = Arc::clone(&subnet);
            tokio::spawn(async move {
                for round in 0..200u64 {
                    let id = node((round % 4) as u16 + 1);
                    subnet.scope.validators.set_weight(&id, round % 50 + 1).unwrap();
                    tokio::task::yield_now().await;
                }
            })
        };

        for handler in handlers {
            handler.await.unwrap();
        }
        staking.await.unwrap();

        let throttler = &subnet.scope.throttler;
        assert_eq!(throttler.remaining_vdr_bytes(), config.vdr_alloc_size);
        assert_eq!(
            throttler.remaining_at_large_bytes(),
            config.at_large_alloc_size
        );
        subnet.scope.validators.read().check_invariants().unwrap();
    }

    #[test]
    fn test_release_after_stake_drop_still_balances() {
        let subnet = Subnet::with_weights(&[50, 50]);
        let throttler = &subnet.scope.throttler;
        throttler.acquire(node(1), 400_000).unwrap();

        // stake shrinks below what is already held
        subnet.scope.validators.set_weight(&node(1), 1).unwrap();
        assert!(!throttler.try_acquire(node(1), 20_000));

        throttler.release(node(1), 400_000).unwrap();
        assert_eq!(throttler.remaining_vdr_bytes(), 1_000_000);
    }
}
