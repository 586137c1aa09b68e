use std::sync::Arc;

use num_bigint::BigInt;

use crate::ciphertext::Ciphertext;
use crate::crt::CrtContext;
use crate::error::{Error, Result};
use crate::evaluator::Evaluator;
use crate::key_generator::SwitchingKey;
use crate::parameters::CkksParameters;
use crate::plaintext::Plaintext;
use crate::polynomial::Polynomial;

/// Homomorphic operations for CKKS.
///
/// All arithmetic runs under the modulus the operand ciphertexts carry,
/// through the shared RNS tower. Multiplication leaves the result at the
/// product of the operand scaling factors; relinearization uses the
/// special-modulus technique, lifting the `sw * t2` products to `q * P`
/// and flooring the factor P back out.
pub struct CkksEvaluator {
	big_modulus: BigInt,
	crt: Arc<CrtContext>,
}

impl CkksEvaluator {
	/// Creates an evaluator for the given parameters.
	pub fn new(params: &CkksParameters) -> Self {
		Self {
			big_modulus: params.big_modulus().clone(),
			crt: params.crt_context().clone(),
		}
	}

	/// The shared modulus of two operand ciphertexts.
	///
	/// Fails with [`Error::MissingMetadata`] when either operand lacks
	/// one and [`Error::ModulusMismatch`] when they differ.
	fn matching_modulus(a: &Ciphertext, b: &Ciphertext) -> Result<BigInt> {
		let qa = a.modulus().ok_or(Error::MissingMetadata("modulus"))?;
		let qb = b.modulus().ok_or(Error::MissingMetadata("modulus"))?;
		if qa != qb {
			return Err(Error::ModulusMismatch);
		}
		Ok(qa.clone())
	}

	/// Adds a plaintext into a ciphertext; both must carry the same
	/// scaling factor.
	pub fn add_plain(&self, ciphertext: &Ciphertext, plaintext: &Plaintext) -> Result<Ciphertext> {
		if ciphertext.scaling_factor() != plaintext.scaling_factor() {
			return Err(Error::ModulusMismatch);
		}
		let q = ciphertext
			.modulus()
			.ok_or(Error::MissingMetadata("modulus"))?;
		let c0 = ciphertext
			.c0()
			.add(plaintext.poly(), Some(q))?
			.mod_small(q);
		Ok(Ciphertext::with_metadata(
			c0,
			ciphertext.c1().clone(),
			ciphertext.scaling_factor(),
			q.clone(),
		))
	}

	/// Applies one switching key to the third product term and folds the
	/// result into the first two: `ci' = floor(sw_i * t2 / P) + ti`.
	fn relinearize(
		&self,
		relin_key: &SwitchingKey,
		t0: Polynomial,
		t1: Polynomial,
		t2: &Polynomial,
		scaling_factor: f64,
		modulus: &BigInt,
	) -> Result<Ciphertext> {
		let p = &self.big_modulus;
		let lifted_modulus = modulus * p;
		let c0 = relin_key
			.sw0()
			.multiply_crt(t2, &self.crt)?
			.mod_small(&lifted_modulus)
			.scalar_integer_divide(p, None)
			.add(&t0, Some(modulus))?
			.mod_small(modulus);
		let c1 = relin_key
			.sw1()
			.multiply_crt(t2, &self.crt)?
			.mod_small(&lifted_modulus)
			.scalar_integer_divide(p, None)
			.add(&t1, Some(modulus))?
			.mod_small(modulus);
		Ok(Ciphertext::with_metadata(
			c0,
			c1,
			Some(scaling_factor),
			modulus.clone(),
		))
	}
}

impl Evaluator for CkksEvaluator {
	type Ciphertext = Ciphertext;
	type RelinKey = SwitchingKey;

	/// Componentwise addition; the operands must share both modulus and
	/// scaling factor.
	fn add(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
		let q = Self::matching_modulus(a, b)?;
		if a.scaling_factor() != b.scaling_factor() {
			return Err(Error::ModulusMismatch);
		}
		let c0 = a.c0().add(b.c0(), Some(&q))?.mod_small(&q);
		let c1 = a.c1().add(b.c1(), Some(&q))?.mod_small(&q);
		Ok(Ciphertext::with_metadata(c0, c1, a.scaling_factor(), q))
	}

	/// The three-term product under the shared modulus, relinearized;
	/// the result's scaling factor is the product of the operands'.
	fn multiply(
		&self,
		a: &Ciphertext,
		b: &Ciphertext,
		relin_key: &SwitchingKey,
	) -> Result<Ciphertext> {
		let q = Self::matching_modulus(a, b)?;
		let scaling_factor = a
			.scaling_factor()
			.zip(b.scaling_factor())
			.map(|(x, y)| x * y)
			.ok_or(Error::MissingMetadata("scaling factor"))?;

		let t0 = a.c0().multiply_crt(b.c0(), &self.crt)?.mod_small(&q);
		let t1 = a
			.c0()
			.multiply_crt(b.c1(), &self.crt)?
			.add(&a.c1().multiply_crt(b.c0(), &self.crt)?, Some(&q))?
			.mod_small(&q);
		let t2 = a.c1().multiply_crt(b.c1(), &self.crt)?.mod_small(&q);

		self.relinearize(relin_key, t0, t1, &t2, scaling_factor, &q)
	}
}
