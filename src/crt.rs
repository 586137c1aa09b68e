//! Residue number system over a tower of NTT-friendly primes.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::ntt::NttContext;
use crate::number_theory::{is_prime, mod_inv};

/// Miller-Rabin rounds used when generating the RNS primes.
const MILLER_RABIN_TRIALS: usize = 200;

/// A CRT/RNS context: a tower of distinct primes `p_0 .. p_(L-1)`, each
/// congruent to 1 modulo `2 * degree`, with one NTT context per prime.
///
/// Multiplication under a multi-hundred-bit modulus cannot run through a
/// single NTT; instead each operand is reduced to its residues, the
/// per-prime products run through the per-prime NTTs, and the results
/// recombine through [`reconstruct`](Self::reconstruct) into the unique
/// representative modulo `Q = p_0 * .. * p_(L-1)`. Q must exceed the
/// largest magnitude the caller will store; the CKKS parameter layer
/// sizes the tower accordingly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrtContext {
	primes: Vec<u64>,
	ntts: Vec<NttContext>,
	modulus: BigInt,
	// (Q / p_i) * ((Q / p_i)^-1 mod p_i), ready to weight residue i
	reconstruction_weights: Vec<BigInt>,
}

impl CrtContext {
	/// Generates `num_primes` primes of `prime_size` bits for ring degree
	/// `degree` and precomputes the per-prime NTTs and CRT coefficients.
	///
	/// Candidates of the form `k * 2 * degree + 1` are scanned upward
	/// from `2^prime_size` and Miller-Rabin tested.
	pub fn new(num_primes: usize, prime_size: u32, degree: usize) -> Result<Self> {
		if num_primes == 0 {
			return Err(Error::InvalidParameter("at least one RNS prime required"));
		}
		if degree == 0 || !degree.is_power_of_two() {
			return Err(Error::InvalidParameter(
				"ring degree must be a power of two",
			));
		}
		if prime_size < 2 || prime_size > 61 || (1u64 << prime_size) < 2 * degree as u64 {
			return Err(Error::InvalidParameter("unusable RNS prime size"));
		}

		let step = 2 * degree as u64;
		let mut primes = Vec::with_capacity(num_primes);
		let mut candidate = (1u64 << prime_size) + 1;
		while primes.len() < num_primes {
			if is_prime(candidate, MILLER_RABIN_TRIALS)? {
				primes.push(candidate);
			}
			candidate = candidate
				.checked_add(step)
				.ok_or(Error::InvalidParameter("ran out of RNS prime candidates"))?;
		}
		debug!(
			num_primes,
			prime_size,
			degree,
			last_prime = primes[num_primes - 1],
			"generated NTT-friendly RNS primes"
		);

		let ntts = primes
			.iter()
			.map(|&p| NttContext::new(degree, p))
			.collect::<Result<Vec<_>>>()?;

		let modulus: BigInt = primes.iter().map(|&p| BigInt::from(p)).product();
		let mut reconstruction_weights = Vec::with_capacity(num_primes);
		for &p in &primes {
			let quotient = &modulus / p;
			let quotient_mod_p = (&quotient % p)
				.to_u64()
				.ok_or(Error::InvalidParameter("residue out of range"))?;
			let inverse = mod_inv(quotient_mod_p, p);
			reconstruction_weights.push(quotient * inverse);
		}

		Ok(Self {
			primes,
			ntts,
			modulus,
			reconstruction_weights,
		})
	}

	/// The RNS primes, in generation order.
	pub fn primes(&self) -> &[u64] {
		&self.primes
	}

	/// The per-prime NTT contexts, aligned with [`primes`](Self::primes).
	pub fn ntts(&self) -> &[NttContext] {
		&self.ntts
	}

	/// The composed modulus `Q`.
	pub fn modulus(&self) -> &BigInt {
		&self.modulus
	}

	/// Recombines one residue per prime into the unique integer in
	/// `[0, Q)` congruent to every residue.
	pub fn reconstruct(&self, residues: &[u64]) -> Result<BigInt> {
		if residues.len() != self.primes.len() {
			return Err(Error::InvalidSize {
				expected: self.primes.len(),
				actual: residues.len(),
			});
		}
		let mut value = BigInt::zero();
		for (&residue, weight) in residues.iter().zip(&self.reconstruction_weights) {
			value += weight * residue;
		}
		Ok(value.mod_floor(&self.modulus))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use num_integer::Integer;

	#[test]
	fn generates_distinct_ntt_friendly_primes() {
		let crt = CrtContext::new(4, 20, 8).unwrap();
		assert_eq!(crt.primes().len(), 4);
		for window in crt.primes().windows(2) {
			assert!(window[0] < window[1]);
		}
		for &p in crt.primes() {
			assert!(p > 1 << 20);
			assert_eq!(p % 16, 1);
			assert!(is_prime(p, 50).unwrap());
		}
	}

	#[test]
	fn reconstruct_inverts_residue_decomposition() {
		let crt = CrtContext::new(3, 20, 8).unwrap();
		let value = BigInt::from(0x123456789abcdefu64);
		let residues: Vec<u64> = crt
			.primes()
			.iter()
			.map(|&p| (&value % p).to_u64().unwrap())
			.collect();
		assert_eq!(
			crt.reconstruct(&residues).unwrap(),
			value.mod_floor(crt.modulus())
		);
	}

	#[test]
	fn reconstruct_checks_the_residue_count() {
		let crt = CrtContext::new(3, 20, 8).unwrap();
		assert!(crt.reconstruct(&[1, 2]).is_err());
	}

	#[test]
	fn modulus_is_the_product_of_the_primes() {
		let crt = CrtContext::new(3, 20, 8).unwrap();
		let product: BigInt = crt.primes().iter().map(|&p| BigInt::from(p)).product();
		assert_eq!(crt.modulus(), &product);
	}
}
