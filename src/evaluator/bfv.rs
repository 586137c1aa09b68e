use num_bigint::BigInt;

use crate::ciphertext::Ciphertext;
use crate::error::Result;
use crate::evaluator::Evaluator;
use crate::fft::FftContext;
use crate::key_generator::RelinearizationKey;
use crate::parameters::BfvParameters;
use crate::polynomial::Polynomial;

/// Homomorphic operations for BFV.
///
/// Multiplication computes the three-term product `(t0, t1, t2)` with
/// FFT multiplications in the integer domain, scales each term down by
/// the scaling factor, and relinearizes back to two terms with the
/// base-T decomposition key. The FFT rounding error lands in the noise
/// the divide-by-delta step already absorbs.
pub struct BfvEvaluator {
	ciph_modulus: BigInt,
	scaling_factor: f64,
	fft: FftContext,
}

impl BfvEvaluator {
	/// Creates an evaluator for the given parameters.
	pub fn new(params: &BfvParameters) -> Result<Self> {
		Ok(Self {
			ciph_modulus: params.ciph_modulus().clone(),
			scaling_factor: params.scaling_factor(),
			fft: FftContext::new(8 * params.poly_degree())?,
		})
	}

	/// Divides a product term by the scaling factor, rounds, and reduces
	/// into the ciphertext modulus.
	fn scale_down(&self, poly: Polynomial) -> Result<Polynomial> {
		Ok(poly
			.to_float()?
			.scalar_multiply(1.0 / self.scaling_factor)
			.round()?
			.modulo(&self.ciph_modulus))
	}

	/// Folds the third product term back into the first two using the
	/// relinearization key: decompose `t2` into base-T digits and
	/// accumulate each digit against its level key.
	fn relinearize(
		&self,
		relin_key: &RelinearizationKey,
		t0: Polynomial,
		t1: Polynomial,
		t2: Polynomial,
	) -> Result<Ciphertext> {
		let q = &self.ciph_modulus;
		let digits = t2.base_decompose(relin_key.base(), relin_key.keys().len());
		let mut c0 = t0;
		let mut c1 = t1;
		for ((k0, k1), digit) in relin_key.keys().iter().zip(&digits) {
			c0 = c0.add(&k0.multiply(digit, Some(q))?, Some(q))?;
			c1 = c1.add(&k1.multiply(digit, Some(q))?, Some(q))?;
		}
		Ok(Ciphertext::new(c0, c1))
	}
}

impl Evaluator for BfvEvaluator {
	type Ciphertext = Ciphertext;
	type RelinKey = RelinearizationKey;

	fn add(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
		let q = &self.ciph_modulus;
		Ok(Ciphertext::new(
			a.c0().add(b.c0(), Some(q))?,
			a.c1().add(b.c1(), Some(q))?,
		))
	}

	fn multiply(
		&self,
		a: &Ciphertext,
		b: &Ciphertext,
		relin_key: &RelinearizationKey,
	) -> Result<Ciphertext> {
		let t0 = self.scale_down(a.c0().multiply_fft(b.c0(), &self.fft)?)?;
		let t1 = self.scale_down(
			a.c0()
				.multiply_fft(b.c1(), &self.fft)?
				.add(&a.c1().multiply_fft(b.c0(), &self.fft)?, None)?,
		)?;
		let t2 = self.scale_down(a.c1().multiply_fft(b.c1(), &self.fft)?)?;
		self.relinearize(relin_key, t0, t1, t2)
	}
}
