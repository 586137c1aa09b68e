use std::fmt;

use num_bigint::BigInt;
use num_traits::{One, ToPrimitive};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Parameters of the BFV scheme: ring degree d, plaintext modulus p,
/// ciphertext modulus q, and the derived scaling factor `delta = q / p`
/// that lifts messages into the ciphertext space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BfvParameters {
	poly_degree: usize,
	plain_modulus: BigInt,
	ciph_modulus: BigInt,
	scaling_factor: f64,
}

impl BfvParameters {
	/// The ring degree d.
	pub fn poly_degree(&self) -> usize {
		self.poly_degree
	}

	/// The plaintext modulus p.
	pub fn plain_modulus(&self) -> &BigInt {
		&self.plain_modulus
	}

	/// The ciphertext modulus q.
	pub fn ciph_modulus(&self) -> &BigInt {
		&self.ciph_modulus
	}

	/// The scaling factor `q / p` as a real number.
	pub fn scaling_factor(&self) -> f64 {
		self.scaling_factor
	}
}

impl fmt::Display for BfvParameters {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "Encryption parameters")?;
		writeln!(f, "\tpolynomial degree: {}", self.poly_degree)?;
		writeln!(f, "\tplaintext modulus: {}", self.plain_modulus)?;
		write!(
			f,
			"\tciphertext modulus size: {} bits",
			self.ciph_modulus.bits()
		)
	}
}

/// Builder for [`BfvParameters`]. All three inputs are required; the
/// scaling factor is derived.
pub struct BfvParametersBuilder {
	poly_degree: Option<usize>,
	plain_modulus: Option<BigInt>,
	ciph_modulus: Option<BigInt>,
}

impl BfvParametersBuilder {
	/// Creates a builder with nothing set.
	pub fn new() -> Self {
		Self {
			poly_degree: None,
			plain_modulus: None,
			ciph_modulus: None,
		}
	}

	/// Sets the ring degree d, which must be a power of two.
	pub fn set_poly_degree(mut self, degree: usize) -> Self {
		self.poly_degree = Some(degree);
		self
	}

	/// Sets the plaintext modulus p.
	pub fn set_plain_modulus(mut self, modulus: impl Into<BigInt>) -> Self {
		self.plain_modulus = Some(modulus.into());
		self
	}

	/// Sets the ciphertext modulus q.
	pub fn set_ciph_modulus(mut self, modulus: impl Into<BigInt>) -> Self {
		self.ciph_modulus = Some(modulus.into());
		self
	}

	/// Validates the choices and returns the parameters.
	pub fn build(self) -> Result<BfvParameters> {
		let poly_degree = self
			.poly_degree
			.ok_or(Error::InvalidParameter("polynomial degree not set"))?;
		if poly_degree == 0 || !poly_degree.is_power_of_two() {
			return Err(Error::InvalidParameter(
				"polynomial degree must be a power of two",
			));
		}
		let plain_modulus = self
			.plain_modulus
			.ok_or(Error::InvalidParameter("plaintext modulus not set"))?;
		let ciph_modulus = self
			.ciph_modulus
			.ok_or(Error::InvalidParameter("ciphertext modulus not set"))?;
		if plain_modulus <= BigInt::one() || ciph_modulus <= plain_modulus {
			return Err(Error::InvalidParameter(
				"ciphertext modulus must exceed the plaintext modulus",
			));
		}
		let scaling_factor = ciph_modulus
			.to_f64()
			.zip(plain_modulus.to_f64())
			.map(|(q, p)| q / p)
			.filter(|delta| delta.is_finite())
			.ok_or(Error::InvalidParameter(
				"moduli too large for the scaling factor",
			))?;
		Ok(BfvParameters {
			poly_degree,
			plain_modulus,
			ciph_modulus,
			scaling_factor,
		})
	}
}

impl Default for BfvParametersBuilder {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn can_build_params() {
		let params = BfvParametersBuilder::new()
			.set_poly_degree(2048)
			.set_plain_modulus(256u64)
			.set_ciph_modulus(0x3fffffff000001u64)
			.build()
			.unwrap();
		assert_eq!(params.poly_degree(), 2048);
		assert_eq!(params.plain_modulus(), &BigInt::from(256));
		assert_eq!(params.scaling_factor().floor(), 70368744112128.0);
	}

	#[test]
	fn rejects_incomplete_or_invalid_choices() {
		assert!(BfvParametersBuilder::new().build().is_err());
		assert!(BfvParametersBuilder::new()
			.set_poly_degree(48)
			.set_plain_modulus(256u64)
			.set_ciph_modulus(0x3fffffff000001u64)
			.build()
			.is_err());
		// plaintext modulus must be smaller than the ciphertext modulus
		assert!(BfvParametersBuilder::new()
			.set_poly_degree(16)
			.set_plain_modulus(512u64)
			.set_ciph_modulus(256u64)
			.build()
			.is_err());
	}
}
