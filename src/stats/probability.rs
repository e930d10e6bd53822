//! One-tailed probability models for the over-representation test
//!
//! Both models answer the same question: how likely is it to observe
//! `k` or more successes in a sample of `sample_size` items, drawn from a
//! population of `population` items of which `population_successes` are
//! successes.
//!
//! # Examples
//!
//! ```
//! use goenrich::stats::{Binomial, Hypergeometric, ProbabilityModel};
//!
//! // 3 out of 4 sampled genes are annotated, 10 out of 100 in the population
//! let exact = Hypergeometric.p_value(3, 100, 10, 4).unwrap();
//! let approx = Binomial.p_value(3, 100, 10, 4).unwrap();
//! assert!(exact < 0.01);
//! assert!(approx < 0.01);
//!
//! // observing nothing is always possible
//! assert_eq!(Hypergeometric.p_value(0, 100, 10, 4).unwrap(), 1.0);
//! ```

use statrs::distribution::{self, DiscreteCDF};

use crate::{f64_from_u64, GoError, GoResult};

/// A one-tailed test for over-representation
pub trait ProbabilityModel {
    /// Returns the probability to observe `k` or more successes
    ///
    /// - `k`: successes in the sample
    /// - `population`: size of the population
    /// - `population_successes`: successes in the population
    /// - `sample_size`: size of the sample
    ///
    /// The result is always within `[0, 1]`. `k == 0` yields `1.0`.
    ///
    /// # Errors
    ///
    /// [`GoError::InvalidParameters`] if the parameters do not describe
    /// a valid distribution
    fn p_value(
        &self,
        k: u64,
        population: u64,
        population_successes: u64,
        sample_size: u64,
    ) -> GoResult<f64>;
}

/// Approximates the sampling with replacement
///
/// The success rate is `population_successes / population`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Binomial;

impl ProbabilityModel for Binomial {
    fn p_value(
        &self,
        k: u64,
        population: u64,
        population_successes: u64,
        sample_size: u64,
    ) -> GoResult<f64> {
        check_population(population, population_successes)?;
        if k == 0 {
            return Ok(1.0);
        }
        if k > sample_size || population_successes == 0 {
            return Ok(0.0);
        }
        let rate = f64_from_u64(population_successes)? / f64_from_u64(population)?;
        let binom = distribution::Binomial::new(rate, sample_size)
            .map_err(|err| GoError::InvalidParameters(err.to_string()))?;
        // sf(x) is P(X > x), so we subtract 1 to include k
        Ok(clamp(binom.sf(k - 1)))
    }
}

/// The exact test, sampling without replacement
#[derive(Debug, Default, Clone, Copy)]
pub struct Hypergeometric;

impl ProbabilityModel for Hypergeometric {
    fn p_value(
        &self,
        k: u64,
        population: u64,
        population_successes: u64,
        sample_size: u64,
    ) -> GoResult<f64> {
        check_population(population, population_successes)?;
        if sample_size > population {
            return Err(GoError::InvalidParameters(format!(
                "sample of {sample_size} is larger than the population of {population}"
            )));
        }
        if k == 0 {
            return Ok(1.0);
        }
        if k > sample_size || k > population_successes {
            return Ok(0.0);
        }
        let hyper = distribution::Hypergeometric::new(population, population_successes, sample_size)
            .map_err(|err| GoError::InvalidParameters(err.to_string()))?;
        // sf(x) is P(X > x), so we subtract 1 to include k
        Ok(clamp(hyper.sf(k - 1)))
    }
}

fn check_population(population: u64, population_successes: u64) -> GoResult<()> {
    if population_successes > population {
        Err(GoError::InvalidParameters(format!(
            "{population_successes} successes in a population of {population}"
        )))
    } else {
        Ok(())
    }
}

fn clamp(p: f64) -> f64 {
    p.clamp(0.0, 1.0)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn zero_successes_in_sample() {
        assert_eq!(Binomial.p_value(0, 10, 3, 4).unwrap(), 1.0);
        assert_eq!(Hypergeometric.p_value(0, 10, 3, 4).unwrap(), 1.0);
        assert_eq!(Binomial.p_value(0, 0, 0, 0).unwrap(), 1.0);
    }

    #[test]
    fn all_population_is_success() {
        let p = Hypergeometric.p_value(3, 10, 10, 3).unwrap();
        assert!((p - 1.0).abs() < 1e-9);
        let p = Binomial.p_value(3, 10, 10, 3).unwrap();
        assert!((p - 1.0).abs() < 1e-9);
    }

    #[test]
    fn known_hypergeometric_value() {
        // P(X >= 2) drawing 2 from 4 with 2 successes = 1 / C(4,2)
        let p = Hypergeometric.p_value(2, 4, 2, 2).unwrap();
        assert!((p - 1.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn known_binomial_value() {
        // P(X >= 2) with n = 2 and p = 0.5
        let p = Binomial.p_value(2, 4, 2, 2).unwrap();
        assert!((p - 0.25).abs() < 1e-9);
    }

    #[test]
    fn impossible_observations() {
        assert_eq!(Hypergeometric.p_value(3, 10, 2, 5).unwrap(), 0.0);
        assert_eq!(Hypergeometric.p_value(6, 10, 8, 5).unwrap(), 0.0);
        assert_eq!(Binomial.p_value(6, 10, 8, 5).unwrap(), 0.0);
        assert_eq!(Binomial.p_value(1, 10, 0, 5).unwrap(), 0.0);
    }

    #[test]
    fn invalid_parameters() {
        assert!(matches!(
            Hypergeometric.p_value(1, 10, 11, 5),
            Err(GoError::InvalidParameters(_))
        ));
        assert!(matches!(
            Hypergeometric.p_value(1, 10, 5, 11),
            Err(GoError::InvalidParameters(_))
        ));
        assert!(matches!(
            Binomial.p_value(1, 10, 11, 5),
            Err(GoError::InvalidParameters(_))
        ));
    }

    #[test]
    fn monotonic_in_k() {
        let models: [&dyn ProbabilityModel; 2] = [&Binomial, &Hypergeometric];
        for model in models {
            let mut last = 1.0;
            for k in 0..=20 {
                let p = model.p_value(k, 200, 40, 20).unwrap();
                assert!((0.0..=1.0).contains(&p));
                assert!(p <= last + 1e-12, "p({k}) = {p} > {last}");
                last = p;
            }
        }
    }
}
