//! Random sampling for key material, encryption randomness and tests.
//!
//! Every sampler draws from a fresh cryptographically secure generator
//! (`StdRng` seeded from the operating system); a generator that cannot
//! be constructed surfaces as [`Error::SamplingFailure`] rather than a
//! panic.

use num_bigint::{BigInt, RandBigInt};
use num_complex::Complex64;
use num_traits::Zero;
use rand::rngs::{OsRng, StdRng};
use rand::{Rng, SeedableRng};

use crate::error::{Error, Result};

/// Constructs a cryptographically secure generator seeded from the OS.
pub(crate) fn crypto_rng() -> Result<StdRng> {
	StdRng::from_rng(OsRng).map_err(|_| Error::SamplingFailure)
}

/// Samples `num` integers uniformly from `[min, max)`.
pub fn sample_uniform(min: &BigInt, max: &BigInt, num: usize) -> Result<Vec<BigInt>> {
	if min >= max {
		return Err(Error::InvalidParameter("empty uniform sampling range"));
	}
	let mut rng = crypto_rng()?;
	Ok((0..num).map(|_| rng.gen_bigint_range(min, max)).collect())
}

/// Samples `num` values from the centered discrete triangle distribution:
/// -1, 0, 1 with probabilities 1/4, 1/2, 1/4.
pub fn sample_triangle(num: usize) -> Result<Vec<BigInt>> {
	let mut rng = crypto_rng()?;
	Ok((0..num)
		.map(|_| match rng.gen_range(0u8..4) {
			0 => BigInt::from(-1),
			1 => BigInt::from(1),
			_ => BigInt::zero(),
		})
		.collect())
}

/// Samples a ternary vector with exactly `weight` nonzero entries, each
/// -1 or 1 with equal probability.
pub fn sample_hamming_weight_vector(length: usize, weight: usize) -> Result<Vec<BigInt>> {
	if weight > length {
		return Err(Error::InvalidParameter(
			"hamming weight exceeds vector length",
		));
	}
	let mut rng = crypto_rng()?;
	let mut samples = vec![BigInt::zero(); length];
	let mut placed = 0;
	while placed < weight {
		let index = rng.gen_range(0..length);
		if samples[index].is_zero() {
			samples[index] = if rng.gen::<bool>() {
				BigInt::from(1)
			} else {
				BigInt::from(-1)
			};
			placed += 1;
		}
	}
	Ok(samples)
}

/// Samples a vector of complex numbers uniform on the unit square.
pub fn sample_random_complex_vector(length: usize) -> Result<Vec<Complex64>> {
	let mut rng = crypto_rng()?;
	Ok((0..length)
		.map(|_| Complex64::new(rng.gen::<f64>(), rng.gen::<f64>()))
		.collect())
}

/// Samples a vector of reals uniform on the unit interval.
pub fn sample_random_real_vector(length: usize) -> Result<Vec<f64>> {
	let mut rng = crypto_rng()?;
	Ok((0..length).map(|_| rng.gen::<f64>()).collect())
}

#[cfg(test)]
mod tests {
	use super::*;
	use num_traits::Signed;

	#[test]
	fn uniform_samples_stay_in_range() {
		let min = BigInt::from(-5);
		let max = BigInt::from(17);
		for value in sample_uniform(&min, &max, 500).unwrap() {
			assert!(value >= min && value < max);
		}
	}

	#[test]
	fn uniform_rejects_an_empty_range() {
		let bound = BigInt::from(4);
		assert!(sample_uniform(&bound, &bound, 1).is_err());
	}

	#[test]
	fn triangle_samples_are_ternary() {
		let samples = sample_triangle(1000).unwrap();
		assert_eq!(samples.len(), 1000);
		assert!(samples.iter().all(|s| s.abs() <= BigInt::from(1)));
		// with 1000 draws, all three values appear with overwhelming probability
		assert!(samples.iter().any(|s| s == &BigInt::from(-1)));
		assert!(samples.iter().any(|s| s == &BigInt::from(1)));
		assert!(samples.iter().any(|s| s.is_zero()));
	}

	#[test]
	fn hamming_weight_vector_has_exact_weight() {
		let samples = sample_hamming_weight_vector(256, 64).unwrap();
		let nonzero = samples.iter().filter(|s| !s.is_zero()).count();
		assert_eq!(nonzero, 64);
		assert!(samples.iter().all(|s| s.abs() <= BigInt::from(1)));
	}

	#[test]
	fn hamming_weight_cannot_exceed_length() {
		assert!(sample_hamming_weight_vector(4, 5).is_err());
	}

	#[test]
	fn complex_samples_lie_in_the_unit_square() {
		for value in sample_random_complex_vector(100).unwrap() {
			assert!((0.0..1.0).contains(&value.re));
			assert!((0.0..1.0).contains(&value.im));
		}
	}
}
