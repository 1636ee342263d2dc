/// Seeded 32-bit generator (mulberry32 mixing).
///
/// Every marker, split point and paragraph length is drawn from one of these,
/// so the arithmetic has to stay bit-for-bit identical to other builds of the
/// engine: wrapping 32-bit adds and multiplies only.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    state: u32,
}

impl SeededRandom {
    const INCREMENT: u32 = 0x6d2b_79f5;

    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Next value in `[0, 1)`.
    pub fn next(&mut self) -> f64 {
        self.state = self.state.wrapping_add(Self::INCREMENT);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        f64::from(t ^ (t >> 14)) / 4_294_967_296.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_reference_sequence() {
        let mut rng = SeededRandom::new(1);
        assert!((rng.next() - 0.6270739405881613).abs() < 1e-15);
        assert!((rng.next() - 0.002735721180215478).abs() < 1e-15);
        assert!((rng.next() - 0.5274470399599522).abs() < 1e-15);

        let mut rng = SeededRandom::new(42);
        assert!((rng.next() - 0.6011037519201636).abs() < 1e-15);
    }

    #[test]
    fn same_seed_same_stream() {
        let mut a = SeededRandom::new(7);
        let mut b = SeededRandom::new(7);
        for _ in 0..1000 {
            let x = a.next();
            assert_eq!(x, b.next());
            assert!((0.0..1.0).contains(&x));
        }
    }
}
