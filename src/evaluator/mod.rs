//! Homomorphic operations on ciphertexts.

use crate::error::Result;

mod bfv;
mod ckks;

pub use bfv::BfvEvaluator;
pub use ckks::CkksEvaluator;

/// An interface for the homomorphic operations both schemes share.
pub trait Evaluator {
	/// The ciphertext type operated on.
	type Ciphertext;

	/// The key used to relinearize a freshly multiplied ciphertext.
	type RelinKey;

	/// Homomorphically adds two ciphertexts.
	fn add(&self, a: &Self::Ciphertext, b: &Self::Ciphertext) -> Result<Self::Ciphertext>;

	/// Homomorphically multiplies two ciphertexts and relinearizes the
	/// three-term product back to two terms.
	fn multiply(
		&self,
		a: &Self::Ciphertext,
		b: &Self::Ciphertext,
		relin_key: &Self::RelinKey,
	) -> Result<Self::Ciphertext>;
}
