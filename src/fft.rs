//! Complex fast Fourier transform and the CKKS canonical embedding.

use num_complex::Complex64;
use num_traits::Zero;

use crate::bits::bit_reverse_vec;
use crate::error::{Error, Result};

/// Precomputed context for complex FFTs of length up to `fft_length`.
///
/// The root tables hold `e^(2*pi*i*k/N)` for the configured length N;
/// transforms of any shorter power-of-two length stride through the same
/// tables, so one context built at the largest size serves every
/// transform a caller needs.
///
/// The context also precomputes the rotation group `5^j mod N` used by
/// the canonical embedding of `Z[x]/(x^d + 1)` into `C^(d/2)`: the
/// embedding evaluates at the odd powers `zeta^(5^j)` of the primitive
/// N-th root zeta, with N = 2d. Powers of five are the same subgroup the
/// ciphertext rotation `m(x) -> m(x^(5^r))` walks, so slot rotations are
/// cyclic shifts of the embedded vector.
#[derive(Debug, Clone)]
pub struct FftContext {
	fft_length: usize,
	roots_of_unity: Vec<Complex64>,
	roots_of_unity_inv: Vec<Complex64>,
	rot_group: Vec<usize>,
}

impl FftContext {
	/// Creates a context for transforms of length up to `fft_length`,
	/// which must be a power of two of at least 4.
	pub fn new(fft_length: usize) -> Result<Self> {
		if fft_length < 4 || !fft_length.is_power_of_two() {
			return Err(Error::InvalidParameter(
				"FFT length must be a power of two of at least 4",
			));
		}
		let angle = 2.0 * std::f64::consts::PI / fft_length as f64;
		let roots_of_unity: Vec<Complex64> = (0..fft_length)
			.map(|k| Complex64::cis(angle * k as f64))
			.collect();
		let roots_of_unity_inv: Vec<Complex64> =
			roots_of_unity.iter().map(|r| r.conj()).collect();

		let num_slots = fft_length / 4;
		let mut rot_group = Vec::with_capacity(num_slots);
		let mut power = 1usize;
		for _ in 0..num_slots {
			rot_group.push(power);
			power = power * 5 % fft_length;
		}

		Ok(Self {
			fft_length,
			roots_of_unity,
			roots_of_unity_inv,
			rot_group,
		})
	}

	/// The configured maximum transform length.
	pub fn fft_length(&self) -> usize {
		self.fft_length
	}

	fn check_length(&self, len: usize) -> Result<()> {
		if len == 0 || !len.is_power_of_two() || len > self.fft_length {
			return Err(Error::InvalidSize {
				expected: self.fft_length,
				actual: len,
			});
		}
		Ok(())
	}

	/// Radix-2 Cooley-Tukey butterflies over a bit-reversed copy of the
	/// input, with twiddles strided out of the precomputed tables.
	fn transform(&self, values: &[Complex64], inverse: bool) -> Result<Vec<Complex64>> {
		self.check_length(values.len())?;
		let n = values.len();
		let table = if inverse {
			&self.roots_of_unity_inv
		} else {
			&self.roots_of_unity
		};
		let mut a = bit_reverse_vec(values);
		let mut len = 2;
		while len <= n {
			let half = len / 2;
			let step = self.fft_length / len;
			for start in (0..n).step_by(len) {
				for i in 0..half {
					let w = table[i * step];
					let u = a[start + i];
					let v = a[start + i + half] * w;
					a[start + i] = u + v;
					a[start + i + half] = u - v;
				}
			}
			len <<= 1;
		}
		Ok(a)
	}

	/// Forward FFT: evaluates at every N-th root of unity, so entry `k`
	/// of the result is the input polynomial at `e^(2*pi*i*k/n)`.
	pub fn fft_fwd(&self, values: &[Complex64]) -> Result<Vec<Complex64>> {
		self.transform(values, false)
	}

	/// Inverse FFT, scaled by `1/n`; `fft_inv(fft_fwd(a)) == a` up to
	/// floating-point error.
	pub fn fft_inv(&self, values: &[Complex64]) -> Result<Vec<Complex64>> {
		let n = values.len();
		let mut result = self.transform(values, true)?;
		let scale = 1.0 / n as f64;
		for value in &mut result {
			*value *= scale;
		}
		Ok(result)
	}

	/// Canonical embedding: evaluates the packed polynomial `values`
	/// (length N/4) at the rotation-group points `zeta^(5^j)`.
	pub fn embedding(&self, values: &[Complex64]) -> Result<Vec<Complex64>> {
		let num_slots = self.fft_length / 4;
		if values.len() != num_slots {
			return Err(Error::InvalidSize {
				expected: num_slots,
				actual: values.len(),
			});
		}
		let mut padded = values.to_vec();
		padded.resize(self.fft_length, Complex64::zero());
		let spectrum = self.fft_fwd(&padded)?;
		Ok(self.rot_group.iter().map(|&k| spectrum[k]).collect())
	}

	/// Inverse of [`embedding`](Self::embedding): recovers the packed
	/// polynomial whose rotation-group evaluations are `values`.
	pub fn embedding_inv(&self, values: &[Complex64]) -> Result<Vec<Complex64>> {
		let num_slots = self.fft_length / 4;
		if values.len() != num_slots {
			return Err(Error::InvalidSize {
				expected: num_slots,
				actual: values.len(),
			});
		}
		let mut scattered = vec![Complex64::zero(); self.fft_length];
		for (j, value) in values.iter().enumerate() {
			scattered[self.rot_group[j]] = *value;
		}
		let coeffs = self.fft_inv(&scattered)?;
		// the orthogonality constant is N/4, not N
		Ok(coeffs[..num_slots].iter().map(|c| c * 4.0).collect())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn assert_close(a: Complex64, b: Complex64) {
		assert!(
			(a - b).norm() < 1e-9,
			"expected {b}, found {a} (difference {})",
			(a - b).norm()
		);
	}

	#[test]
	fn rejects_non_power_of_two_lengths() {
		assert!(FftContext::new(6).is_err());
		assert!(FftContext::new(2).is_err());
		let fft = FftContext::new(16).unwrap();
		assert!(fft.fft_fwd(&vec![Complex64::zero(); 3]).is_err());
		assert!(fft.fft_fwd(&vec![Complex64::zero(); 32]).is_err());
	}

	#[test]
	fn forward_matches_direct_evaluation() {
		let fft = FftContext::new(8).unwrap();
		let values: Vec<Complex64> = [1.0, 2.0, 3.0, 4.0, 0.0, 0.0, 0.0, 0.0]
			.iter()
			.map(|&x| Complex64::new(x, 0.0))
			.collect();
		let spectrum = fft.fft_fwd(&values).unwrap();
		for (k, &actual) in spectrum.iter().enumerate() {
			let mut expected = Complex64::zero();
			for (n, &value) in values.iter().enumerate() {
				let angle = 2.0 * std::f64::consts::PI * (k * n) as f64 / 8.0;
				expected += value * Complex64::cis(angle);
			}
			assert_close(actual, expected);
		}
	}

	#[test]
	fn forward_then_inverse_is_the_identity() {
		let fft = FftContext::new(64).unwrap();
		let values: Vec<Complex64> = (0..64)
			.map(|i| Complex64::new(i as f64 - 31.5, (i * i) as f64 / 64.0))
			.collect();
		let roundtrip = fft.fft_inv(&fft.fft_fwd(&values).unwrap()).unwrap();
		for (a, b) in roundtrip.iter().zip(&values) {
			assert_close(*a, *b);
		}
	}

	#[test]
	fn shorter_transforms_stride_the_shared_tables() {
		let big = FftContext::new(64).unwrap();
		let small = FftContext::new(8).unwrap();
		let values: Vec<Complex64> = (0..8)
			.map(|i| Complex64::new(i as f64, -(i as f64)))
			.collect();
		let from_big = big.fft_fwd(&values).unwrap();
		let from_small = small.fft_fwd(&values).unwrap();
		for (a, b) in from_big.iter().zip(&from_small) {
			assert_close(*a, *b);
		}
	}

	#[test]
	fn embedding_inverts_embedding_inv() {
		let fft = FftContext::new(128).unwrap();
		let values: Vec<Complex64> = (0..32)
			.map(|i| Complex64::new(i as f64 / 7.0 - 2.0, (31 - i) as f64 / 11.0))
			.collect();
		let preimage = fft.embedding_inv(&values).unwrap();
		let roundtrip = fft.embedding(&preimage).unwrap();
		for (a, b) in roundtrip.iter().zip(&values) {
			assert_close(*a, *b);
		}
	}

	#[test]
	fn embedding_points_are_roots_of_the_ring_polynomial() {
		// every evaluation point zeta^(5^j) satisfies x^(N/2) = -1
		let fft = FftContext::new(16).unwrap();
		let mut coeffs = vec![Complex64::zero(); 4];
		coeffs[0] = Complex64::new(1.0, 0.0);
		// constant polynomial embeds to the all-ones vector
		for slot in fft.embedding(&coeffs).unwrap() {
			assert_close(slot, Complex64::new(1.0, 0.0));
		}
	}
}
