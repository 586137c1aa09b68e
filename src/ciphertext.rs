use std::fmt;

use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

use crate::polynomial::Polynomial;

/// An encryption of a plaintext: the polynomial pair `(c0, c1)` with
/// `c0 + c1 * s` decrypting to the (noisy, scaled) message.
///
/// CKKS ciphertexts additionally carry the scaling factor and the
/// modulus they currently live under, because both change over the life
/// of a ciphertext; BFV ciphertexts leave them unset and rely on the
/// scheme parameters. Operations that need the metadata fail with
/// [`MissingMetadata`](crate::Error::MissingMetadata) when it is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ciphertext {
	c0: Polynomial,
	c1: Polynomial,
	scaling_factor: Option<f64>,
	modulus: Option<BigInt>,
}

impl Ciphertext {
	/// A ciphertext with no attached metadata (the BFV form).
	pub fn new(c0: Polynomial, c1: Polynomial) -> Self {
		Self {
			c0,
			c1,
			scaling_factor: None,
			modulus: None,
		}
	}

	/// A ciphertext carrying its scaling factor and modulus (the CKKS
	/// form; the scaling factor is passed through from the plaintext and
	/// may be absent).
	pub fn with_metadata(
		c0: Polynomial,
		c1: Polynomial,
		scaling_factor: Option<f64>,
		modulus: BigInt,
	) -> Self {
		Self {
			c0,
			c1,
			scaling_factor,
			modulus: Some(modulus),
		}
	}

	/// The first ciphertext polynomial.
	pub fn c0(&self) -> &Polynomial {
		&self.c0
	}

	/// The second ciphertext polynomial.
	pub fn c1(&self) -> &Polynomial {
		&self.c1
	}

	/// The scaling factor, if attached.
	pub fn scaling_factor(&self) -> Option<f64> {
		self.scaling_factor
	}

	/// The modulus the ciphertext currently lives under, if attached.
	pub fn modulus(&self) -> Option<&BigInt> {
		self.modulus.as_ref()
	}
}

impl fmt::Display for Ciphertext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "C0: {}\nC1: {}", self.c0, self.c1)
	}
}
