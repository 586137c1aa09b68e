use std::fmt;

use serde::{Deserialize, Serialize};

use crate::polynomial::Polynomial;

/// An unencrypted ring element, optionally carrying the scaling factor
/// it was encoded with.
///
/// BFV plaintexts hold raw message polynomials and no scaling factor;
/// CKKS plaintexts always carry the scale the encoder applied, and
/// decryption propagates it so the decoder can divide it back out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plaintext {
	poly: Polynomial,
	scaling_factor: Option<f64>,
}

impl Plaintext {
	/// Wraps a message polynomial with no scaling factor.
	pub fn new(poly: Polynomial) -> Self {
		Self {
			poly,
			scaling_factor: None,
		}
	}

	/// Wraps a message polynomial encoded at the given scaling factor.
	pub fn with_scaling_factor(poly: Polynomial, scaling_factor: f64) -> Self {
		Self {
			poly,
			scaling_factor: Some(scaling_factor),
		}
	}

	/// The message polynomial.
	pub fn poly(&self) -> &Polynomial {
		&self.poly
	}

	/// The scaling factor, if one was attached.
	pub fn scaling_factor(&self) -> Option<f64> {
		self.scaling_factor
	}
}

impl fmt::Display for Plaintext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.poly)
	}
}
