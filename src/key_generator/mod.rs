//! Key material and the per-scheme key generators.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::polynomial::Polynomial;

mod bfv;
mod ckks;

pub use bfv::{BfvKeyGenerator, RelinearizationKey};
pub use ckks::{CkksKeyGenerator, RotationKey, SwitchingKey};

/// The secret key: a ternary polynomial s.
///
/// BFV samples every coefficient from the centered triangle
/// distribution; CKKS samples a vector of fixed Hamming weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecretKey {
	s: Polynomial,
}

impl SecretKey {
	/// Wraps a sampled secret polynomial.
	pub fn new(s: Polynomial) -> Self {
		Self { s }
	}

	/// The secret polynomial.
	pub fn poly(&self) -> &Polynomial {
		&self.s
	}
}

impl fmt::Display for SecretKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.s)
	}
}

/// The public key: a pair `(p0, p1)` with `p0 + p1 * s` equal to a small
/// error, so that encrypting with it hides the message under the
/// ring-LWE assumption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicKey {
	p0: Polynomial,
	p1: Polynomial,
}

impl PublicKey {
	/// Wraps a generated key pair.
	pub fn new(p0: Polynomial, p1: Polynomial) -> Self {
		Self { p0, p1 }
	}

	/// The first key polynomial, `-(a * s + e)`.
	pub fn p0(&self) -> &Polynomial {
		&self.p0
	}

	/// The second key polynomial, the uniform `a`.
	pub fn p1(&self) -> &Polynomial {
		&self.p1
	}
}

impl fmt::Display for PublicKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "P0: {}\nP1: {}", self.p0, self.p1)
	}
}
