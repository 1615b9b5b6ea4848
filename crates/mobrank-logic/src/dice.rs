//! Random-source seam.
//!
//! Every random decision in the game goes through [`Roll`]. Any
//! [`rand::Rng`] is a `Roll`, so production code passes the host's RNG and
//! tests pass a seeded `StdRng` or a scripted source.

use rand::Rng;

/// Source of the two kinds of draw the rules need.
pub trait Roll {
    /// `true` with probability `p`. `p >= 1.0` always succeeds; `p <= 0.0`
    /// and NaN always fail.
    fn chance(&mut self, p: f64) -> bool;

    /// Uniform integer in `[min, max]`. Bounds given in the wrong order are
    /// swapped.
    fn between(&mut self, min: i64, max: i64) -> i64;
}

impl<R: Rng + ?Sized> Roll for R {
    fn chance(&mut self, p: f64) -> bool {
        if p >= 1.0 {
            true
        } else if p > 0.0 {
            self.gen_bool(p)
        } else {
            false
        }
    }

    fn between(&mut self, min: i64, max: i64) -> i64 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        self.gen_range(lo..=hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn certain_and_impossible() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            assert!(rng.chance(1.0));
            assert!(rng.chance(1.35));
            assert!(!rng.chance(0.0));
            assert!(!rng.chance(-0.2));
            assert!(!rng.chance(f64::NAN));
        }
    }

    #[test]
    fn between_is_inclusive() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut saw_min = false;
        let mut saw_max = false;
        for _ in 0..2_000 {
            let v = rng.between(1, 4);
            assert!((1..=4).contains(&v));
            saw_min |= v == 1;
            saw_max |= v == 4;
        }
        assert!(saw_min && saw_max);
    }

    #[test]
    fn between_single_value_and_swapped() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(rng.between(5, 5), 5);
        let v = rng.between(10, 2);
        assert!((2..=10).contains(&v));
    }

    #[test]
    fn seeded_is_reproducible() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            assert_eq!(a.chance(0.5), b.chance(0.5));
            assert_eq!(a.between(0, 1000), b.between(0, 1000));
        }
    }
}
