//! Seeded integer range generator
//!
//! Every random decision the simulation makes goes through here so a run can
//! be reproduced from its seed.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Bounded integer source backed by a seeded PCG32
#[derive(Debug, Clone)]
pub struct RandomRange {
    seed: u64,
    rng: Pcg32,
}

impl RandomRange {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Seed this generator was created with
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform value in `[min, max]`, inclusive on both ends.
    ///
    /// Panics if `min > max`.
    pub fn next_in_range(&mut self, min: i32, max: i32) -> i32 {
        assert!(min <= max, "empty range [{min}, {max}]");
        self.rng.random_range(min..=max)
    }

    /// Uniform value in `[min, max]` that is never zero.
    ///
    /// Resamples until a non-zero value comes up. Panics if the range holds no
    /// non-zero value (`[0, 0]`), which would otherwise never terminate.
    pub fn next_non_zero_in_range(&mut self, min: i32, max: i32) -> i32 {
        assert!(
            min != 0 || max != 0,
            "range [{min}, {max}] has no non-zero value"
        );
        loop {
            let value = self.next_in_range(min, max);
            if value != 0 {
                return value;
            }
        }
    }

    /// Uniform index into a pool of `len` items, `None` for an empty pool
    pub fn pick(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(self.rng.random_range(0..len))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_range_stays_inside_and_hits_endpoints() {
        let mut rng = RandomRange::new(7);
        let (mut saw_min, mut saw_max) = (false, false);
        for _ in 0..10_000 {
            let v = rng.next_in_range(-3, 4);
            assert!((-3..=4).contains(&v));
            saw_min |= v == -3;
            saw_max |= v == 4;
        }
        assert!(saw_min && saw_max);
    }

    #[test]
    fn test_single_value_range() {
        let mut rng = RandomRange::new(1);
        for _ in 0..100 {
            assert_eq!(rng.next_in_range(16, 16), 16);
        }
    }

    #[test]
    fn test_non_zero_never_zero() {
        let mut rng = RandomRange::new(42);
        for _ in 0..10_000 {
            let v = rng.next_non_zero_in_range(-1, 1);
            assert!(v == -1 || v == 1);
        }
    }

    #[test]
    #[should_panic(expected = "no non-zero value")]
    fn test_non_zero_rejects_zero_only_range() {
        RandomRange::new(0).next_non_zero_in_range(0, 0);
    }

    #[test]
    fn test_pick_empty_pool() {
        let mut rng = RandomRange::new(3);
        assert_eq!(rng.pick(0), None);
    }

    #[test]
    fn test_pick_covers_pool() {
        let mut rng = RandomRange::new(11);
        let mut seen = [0u32; 3];
        for _ in 0..1_000 {
            let i = rng.pick(3).unwrap();
            seen[i] += 1;
        }
        assert!(seen.iter().all(|&n| n > 0));
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = RandomRange::new(99);
        let mut b = RandomRange::new(99);
        for _ in 0..50 {
            assert_eq!(a.next_in_range(-10, 10), b.next_in_range(-10, 10));
        }
    }

    proptest! {
        #[test]
        fn prop_in_range(seed in any::<u64>(), min in -1000i32..1000, span in 0i32..1000) {
            let mut rng = RandomRange::new(seed);
            let max = min + span;
            for _ in 0..64 {
                let v = rng.next_in_range(min, max);
                prop_assert!(v >= min && v <= max);
            }
        }

        #[test]
        fn prop_non_zero(seed in any::<u64>(), k in 1i32..50) {
            let mut rng = RandomRange::new(seed);
            for _ in 0..64 {
                let v = rng.next_non_zero_in_range(-k, k);
                prop_assert!(v != 0 && v.abs() <= k);
            }
        }
    }
}
