/// Source of uniform randomness for launches and bursts.
///
/// Only `unit` is required; every other draw is derived from it so a scripted
/// source in tests controls the whole simulation.
pub trait RandomSource {
    /// Uniform value in `[0, 1)`.
    fn unit(&mut self) -> f32;

    /// Uniform value in `[min, max)`.
    fn range(&mut self, min: f32, max: f32) -> f32 {
        self.unit() * (max - min) + min
    }

    /// Uniform integer in `[min, max)`. Returns `min` for an empty range.
    fn range_usize(&mut self, min: usize, max: usize) -> usize {
        if max <= min {
            return min;
        }
        let span = max - min;
        let offset = (self.unit() * span as f32) as usize;
        min + offset.min(span - 1)
    }

    /// Bernoulli trial that succeeds with `probability`.
    fn chance(&mut self, probability: f32) -> bool {
        self.unit() < probability
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        items.get(self.range_usize(0, items.len()))
    }
}

impl RandomSource for fastrand::Rng {
    fn unit(&mut self) -> f32 {
        self.f32()
    }
}

/// Replays a fixed sequence of unit values, cycling when exhausted.
#[cfg(test)]
pub(crate) struct Scripted {
    values: Vec<f32>,
    cursor: usize,
}

#[cfg(test)]
impl Scripted {
    pub(crate) fn new(values: &[f32]) -> Self {
        assert!(!values.is_empty());
        Self {
            values: values.to_vec(),
            cursor: 0,
        }
    }
}

#[cfg(test)]
impl RandomSource for Scripted {
    fn unit(&mut self) -> f32 {
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn range_usize_excludes_max() {
        let mut rng = Scripted::new(&[0.0, 0.999_999]);
        assert_eq!(rng.range_usize(16, 64), 16);
        assert_eq!(rng.range_usize(16, 64), 63);
    }

    #[test]
    fn empty_ranges_collapse_to_min() {
        let mut rng = Scripted::new(&[0.5]);
        assert_eq!(rng.range_usize(3, 3), 3);
        assert!(rng.pick::<u8>(&[]).is_none());
    }

    #[test]
    fn chance_is_strict() {
        let mut rng = Scripted::new(&[0.4, 0.39]);
        assert!(!rng.chance(0.4));
        assert!(rng.chance(0.4));
    }

    proptest! {
        #[test]
        fn seeded_draws_stay_in_range(seed in any::<u64>(), min in 0usize..100, len in 1usize..100) {
            let mut rng = fastrand::Rng::with_seed(seed);
            for _ in 0..64 {
                let n = rng.range_usize(min, min + len);
                prop_assert!(n >= min && n < min + len);

                let x = rng.range(-2.0, 6.0);
                prop_assert!((-2.0..6.0).contains(&x));
            }
        }
    }
}
