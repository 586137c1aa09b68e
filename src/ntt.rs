//! Negacyclic number-theoretic transform over a 64-bit prime.

use serde::{Deserialize, Serialize};

use crate::bits::bit_reverse_vec;
use crate::error::{Error, Result};
use crate::number_theory::{mod_exp, mod_inv, root_of_unity};

/// Adds two residues modulo `modulus` (both operands already reduced).
pub(crate) fn add_mod(a: u64, b: u64, modulus: u64) -> u64 {
	let sum = a + b;
	if sum >= modulus {
		sum - modulus
	} else {
		sum
	}
}

/// Subtracts two residues modulo `modulus` (both operands already reduced).
pub(crate) fn sub_mod(a: u64, b: u64, modulus: u64) -> u64 {
	if a >= b {
		a - b
	} else {
		a + modulus - b
	}
}

/// Multiplies two residues modulo `modulus` through a `u128` product.
pub(crate) fn mul_mod(a: u64, b: u64, modulus: u64) -> u64 {
	(a as u128 * b as u128 % modulus as u128) as u64
}

/// Precomputed context for the negacyclic NTT over `Z_q[x]/(x^d + 1)`.
///
/// Construction finds psi, a primitive 2d-th root of unity modulo the
/// prime `q` (so `psi^d = -1`), and sets `omega = psi^2`. The forward
/// transform premultiplies coefficient `i` by `psi^i` and runs a radix-2
/// Cooley-Tukey NTT with `omega` twiddles; the inverse runs the NTT with
/// `omega^-1` twiddles and postmultiplies by `d^-1 * psi^-i`. Pointwise
/// products in the transform domain therefore correspond to negacyclic
/// convolution, with no zero-padding.
///
/// The context is immutable after construction and safe to share across
/// threads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NttContext {
	degree: usize,
	modulus: u64,
	psi_powers: Vec<u64>,
	psi_inv_powers: Vec<u64>,
	omega_powers: Vec<u64>,
	omega_inv_powers: Vec<u64>,
	degree_inv: u64,
}

/// Successive powers `base^0 .. base^(count-1)` modulo `modulus`.
fn power_table(base: u64, count: usize, modulus: u64) -> Vec<u64> {
	let mut powers = Vec::with_capacity(count);
	let mut value = 1u64;
	for _ in 0..count {
		powers.push(value);
		value = mul_mod(value, base, modulus);
	}
	powers
}

impl NttContext {
	/// Creates a context for ring degree `degree` and prime `modulus`.
	///
	/// `degree` must be a power of two and `modulus` a prime congruent to
	/// 1 modulo `2 * degree` and below 2^62; anything else is an
	/// [`Error::InvalidParameter`].
	pub fn new(degree: usize, modulus: u64) -> Result<Self> {
		if degree == 0 || !degree.is_power_of_two() {
			return Err(Error::InvalidParameter(
				"ring degree must be a power of two",
			));
		}
		if modulus >= 1 << 62 {
			return Err(Error::InvalidParameter("NTT modulus must be below 2^62"));
		}
		let order = 2 * degree as u64;
		let psi = root_of_unity(order, modulus)?;
		let psi_inv = mod_inv(psi, modulus);
		let omega = mod_exp(psi, 2, modulus);
		let omega_inv = mod_inv(omega, modulus);

		Ok(Self {
			degree,
			modulus,
			psi_powers: power_table(psi, degree, modulus),
			psi_inv_powers: power_table(psi_inv, degree, modulus),
			omega_powers: power_table(omega, degree, modulus),
			omega_inv_powers: power_table(omega_inv, degree, modulus),
			degree_inv: mod_inv(degree as u64, modulus),
		})
	}

	/// The ring degree d.
	pub fn degree(&self) -> usize {
		self.degree
	}

	/// The prime modulus q.
	pub fn modulus(&self) -> u64 {
		self.modulus
	}

	/// Iterative radix-2 Cooley-Tukey NTT: bit-reverse the input, then
	/// butterfly up to natural order with twiddles from `twiddles`.
	fn transform(&self, values: &[u64], twiddles: &[u64]) -> Vec<u64> {
		let n = values.len();
		let mut a = bit_reverse_vec(values);
		let mut len = 2;
		while len <= n {
			let half = len / 2;
			let step = n / len;
			for start in (0..n).step_by(len) {
				for i in 0..half {
					let w = twiddles[i * step];
					let u = a[start + i];
					let v = mul_mod(a[start + i + half], w, self.modulus);
					a[start + i] = add_mod(u, v, self.modulus);
					a[start + i + half] = sub_mod(u, v, self.modulus);
				}
			}
			len <<= 1;
		}
		a
	}

	fn check_length(&self, len: usize) -> Result<()> {
		if len != self.degree {
			return Err(Error::InvalidSize {
				expected: self.degree,
				actual: len,
			});
		}
		Ok(())
	}

	/// Forward negacyclic transform of `coeffs` (already reduced mod q).
	pub fn ftt_fwd(&self, coeffs: &[u64]) -> Result<Vec<u64>> {
		self.check_length(coeffs.len())?;
		let scaled: Vec<u64> = coeffs
			.iter()
			.zip(&self.psi_powers)
			.map(|(&c, &p)| mul_mod(c, p, self.modulus))
			.collect();
		Ok(self.transform(&scaled, &self.omega_powers))
	}

	/// Inverse negacyclic transform; `ftt_inv(ftt_fwd(a)) == a`.
	pub fn ftt_inv(&self, values: &[u64]) -> Result<Vec<u64>> {
		self.check_length(values.len())?;
		let transformed = self.transform(values, &self.omega_inv_powers);
		Ok(transformed
			.iter()
			.zip(&self.psi_inv_powers)
			.map(|(&v, &p)| mul_mod(mul_mod(v, self.degree_inv, self.modulus), p, self.modulus))
			.collect())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn psi_tables_satisfy_the_negacyclic_sign() {
		let ntt = NttContext::new(8, 97).unwrap();
		let psi = ntt.psi_powers[1];
		// psi^d = -1, psi^2d = 1
		assert_eq!(mod_exp(psi, 8, 97), 96);
		assert_eq!(mod_exp(psi, 16, 97), 1);
	}

	#[test]
	fn rejects_a_modulus_without_the_right_root() {
		// 19 - 1 is not divisible by 2 * 8
		assert!(NttContext::new(8, 19).is_err());
		assert!(NttContext::new(6, 97).is_err());
	}

	#[test]
	fn forward_then_inverse_is_the_identity() {
		let ntt = NttContext::new(8, 97).unwrap();
		let coeffs = vec![0, 1, 4, 5, 59, 3, 2, 96];
		let transformed = ntt.ftt_fwd(&coeffs).unwrap();
		assert_eq!(ntt.ftt_inv(&transformed).unwrap(), coeffs);
	}

	#[test]
	fn pointwise_products_are_negacyclic_convolutions() {
		let ntt = NttContext::new(4, 73).unwrap();
		let a = ntt.ftt_fwd(&[0, 1, 4, 5]).unwrap();
		let b = ntt.ftt_fwd(&[1, 2, 4, 3]).unwrap();
		let product: Vec<u64> = a
			.iter()
			.zip(&b)
			.map(|(&x, &y)| mul_mod(x, y, 73))
			.collect();
		// (x + 4x^2 + 5x^3)(1 + 2x + 4x^2 + 3x^3) mod (x^4 + 1, 73)
		assert_eq!(ntt.ftt_inv(&product).unwrap(), vec![44, 42, 64, 17]);
	}

	#[test]
	fn transform_length_is_checked() {
		let ntt = NttContext::new(8, 97).unwrap();
		assert_eq!(
			ntt.ftt_fwd(&[1, 2, 3]),
			Err(Error::InvalidSize {
				expected: 8,
				actual: 3
			})
		);
	}
}
