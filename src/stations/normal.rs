//! Normal variates in the legacy NumPy style.
//!
//! Doubles carry 53 bits built from two 32-bit draws, and normals come from
//! the polar Box-Muller method with rejection. Each accepted pair yields two
//! variates; the second is cached and returned by the next call.

use rand::RngCore;

pub struct LegacyNormal<R: RngCore> {
    rng: R,
    cached: Option<f64>,
}

impl<R: RngCore> LegacyNormal<R> {
    pub fn new(rng: R) -> Self {
        Self { rng, cached: None }
    }

    /// Uniform double in `[0, 1)`.
    pub fn next_double(&mut self) -> f64 {
        let a = self.rng.next_u32() >> 5;
        let b = self.rng.next_u32() >> 6;
        (f64::from(a) * 67_108_864.0 + f64::from(b)) / 9_007_199_254_740_992.0
    }

    /// Standard normal variate.
    pub fn next_gauss(&mut self) -> f64 {
        if let Some(value) = self.cached.take() {
            return value;
        }

        let (x1, x2, r2) = loop {
            let x1 = 2.0 * self.next_double() - 1.0;
            let x2 = 2.0 * self.next_double() - 1.0;
            let r2 = x1 * x1 + x2 * x2;
            if r2 < 1.0 && r2 != 0.0 {
                break (x1, x2, r2);
            }
        };

        let f = (-2.0 * r2.ln() / r2).sqrt();
        self.cached = Some(f * x1);
        f * x2
    }

    /// Normal variate with the given mean and standard deviation.
    pub fn sample(&mut self, mean: f64, std_dev: f64) -> f64 {
        mean + std_dev * self.next_gauss()
    }
}
