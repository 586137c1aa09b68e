//! Elements of the quotient ring `Z[x]/(x^d + 1)`.

use std::fmt;

use num_bigint::BigInt;
use num_complex::Complex64;
use num_integer::Integer;
use num_traits::{FromPrimitive, One, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};

use crate::crt::CrtContext;
use crate::error::{Error, Result};
use crate::fft::FftContext;
use crate::ntt::{mul_mod, NttContext};
use crate::number_theory::mod_exp;

/// A polynomial in the ring `R_q = Z_q[x]/(x^d + 1)`.
///
/// The degree `d` is fixed at construction and always equals the length
/// of the coefficient vector. Reduction by `x^d + 1` is implicit: index
/// `d + k` wraps to index `k` with a sign flip (negacyclic).
///
/// Values are immutable; every operation reads its operands and returns
/// a fresh polynomial owned by the caller.
///
/// Coefficients are exact integers by default. The transient real form
/// `Polynomial<f64>` exists for the scale-and-round steps of decryption
/// and evaluator multiplication; [`to_float`](Polynomial::to_float),
/// [`round`](Polynomial::round) and [`floor`](Polynomial::floor) are the
/// only crossings between the two kinds. Complex values appear solely
/// inside the FFT multiplication path and never escape it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polynomial<C = BigInt> {
	degree: usize,
	coeffs: Vec<C>,
}

impl<C> Polynomial<C> {
	/// Creates a polynomial of the given degree.
	///
	/// Fails with [`Error::InvalidSize`] unless `coeffs` has exactly
	/// `degree` entries; the degree must be at least 1.
	pub fn new(degree: usize, coeffs: Vec<C>) -> Result<Self> {
		if degree == 0 {
			return Err(Error::InvalidParameter("ring degree must be positive"));
		}
		if coeffs.len() != degree {
			return Err(Error::InvalidSize {
				expected: degree,
				actual: coeffs.len(),
			});
		}
		Ok(Self { degree, coeffs })
	}

	/// The ring degree d.
	pub fn degree(&self) -> usize {
		self.degree
	}

	/// The coefficients, constant term first.
	pub fn coeffs(&self) -> &[C] {
		&self.coeffs
	}

	fn from_vec(coeffs: Vec<C>) -> Self {
		Self {
			degree: coeffs.len(),
			coeffs,
		}
	}

	fn check_same_degree(&self, other: &Self) -> Result<()> {
		if self.degree != other.degree {
			return Err(Error::InvalidSize {
				expected: self.degree,
				actual: other.degree,
			});
		}
		Ok(())
	}
}

impl Polynomial<BigInt> {
	/// Coefficient-wise sum; with a modulus, reduced into `[0, q)`.
	pub fn add(&self, other: &Self, modulus: Option<&BigInt>) -> Result<Self> {
		self.check_same_degree(other)?;
		let result = Self::from_vec(
			self.coeffs
				.iter()
				.zip(&other.coeffs)
				.map(|(a, b)| a + b)
				.collect(),
		);
		Ok(result.maybe_modulo(modulus))
	}

	/// Coefficient-wise difference; with a modulus, reduced into `[0, q)`.
	pub fn subtract(&self, other: &Self, modulus: Option<&BigInt>) -> Result<Self> {
		self.check_same_degree(other)?;
		let result = Self::from_vec(
			self.coeffs
				.iter()
				.zip(&other.coeffs)
				.map(|(a, b)| a - b)
				.collect(),
		);
		Ok(result.maybe_modulo(modulus))
	}

	/// Negacyclic product by schoolbook convolution, exact in `O(d^2)`
	/// coefficient multiplications.
	///
	/// The result degree is the smaller operand degree; only that many
	/// leading coefficients of each operand participate. With a modulus,
	/// the result is reduced into `[0, q)`.
	pub fn multiply(&self, other: &Self, modulus: Option<&BigInt>) -> Result<Self> {
		let deg = self.degree.min(other.degree);
		let mut coeffs = vec![BigInt::zero(); deg];
		for idx in 0..2 * deg - 1 {
			let lo = idx.saturating_sub(deg - 1);
			let hi = idx.min(deg - 1);
			let mut sum = BigInt::zero();
			for i in lo..=hi {
				sum += &self.coeffs[i] * &other.coeffs[idx - i];
			}
			// x^(deg + k) = -x^k in the quotient ring
			if idx < deg {
				coeffs[idx] += sum;
			} else {
				coeffs[idx % deg] -= sum;
			}
		}
		Ok(Self::from_vec(coeffs).maybe_modulo(modulus))
	}

	/// Negacyclic product through the context's NTT, reduced modulo the
	/// context's prime. Both operands must match the context degree.
	pub fn multiply_ntt(&self, other: &Self, ntt: &NttContext) -> Result<Self> {
		self.check_same_degree(other)?;
		let modulus = ntt.modulus();
		let a = ntt.ftt_fwd(&self.residues(modulus)?)?;
		let b = ntt.ftt_fwd(&other.residues(modulus)?)?;
		let pointwise: Vec<u64> = a
			.iter()
			.zip(&b)
			.map(|(&x, &y)| mul_mod(x, y, modulus))
			.collect();
		let coeffs = ntt
			.ftt_inv(&pointwise)?
			.into_iter()
			.map(BigInt::from)
			.collect();
		Ok(Self::from_vec(coeffs))
	}

	/// Negacyclic product under the RNS tower: one NTT product per
	/// prime, then per-coefficient CRT reconstruction, rebalanced into
	/// `(-Q/2, Q/2]`.
	///
	/// Exact as long as the true product magnitude stays below `Q/2`,
	/// which the caller guarantees by sizing the context.
	pub fn multiply_crt(&self, other: &Self, crt: &CrtContext) -> Result<Self> {
		self.check_same_degree(other)?;
		let mut residue_products = Vec::with_capacity(crt.ntts().len());
		for ntt in crt.ntts() {
			let modulus = ntt.modulus();
			let a = ntt.ftt_fwd(&self.residues(modulus)?)?;
			let b = ntt.ftt_fwd(&other.residues(modulus)?)?;
			let pointwise: Vec<u64> = a
				.iter()
				.zip(&b)
				.map(|(&x, &y)| mul_mod(x, y, modulus))
				.collect();
			residue_products.push(ntt.ftt_inv(&pointwise)?);
		}
		let mut coeffs = Vec::with_capacity(self.degree);
		for i in 0..self.degree {
			let residues: Vec<u64> = residue_products.iter().map(|r| r[i]).collect();
			coeffs.push(crt.reconstruct(&residues)?);
		}
		Ok(Self::from_vec(coeffs).mod_small(crt.modulus()))
	}

	/// Negacyclic product through the complex FFT, rounded to the
	/// nearest integers.
	///
	/// Operands are zero-padded to `2d` and transformed with twiddles
	/// strided out of the context table (conventionally built at `8d`),
	/// multiplied pointwise, inverse-transformed, and folded back to
	/// length d with the negacyclic sign. The rounding error is absorbed
	/// by the noise margin of the callers (BFV evaluator products).
	pub fn multiply_fft(&self, other: &Self, fft: &FftContext) -> Result<Self> {
		self.check_same_degree(other)?;
		let deg = self.degree;
		let a = fft.fft_fwd(&self.to_complex(2 * deg)?)?;
		let b = fft.fft_fwd(&other.to_complex(2 * deg)?)?;
		let pointwise: Vec<Complex64> = a.iter().zip(&b).map(|(x, y)| x * y).collect();
		let conv = fft.fft_inv(&pointwise)?;
		let mut coeffs = vec![0f64; deg];
		for idx in 0..2 * deg - 1 {
			if idx < deg {
				coeffs[idx] += conv[idx].re;
			} else {
				coeffs[idx % deg] -= conv[idx].re;
			}
		}
		Polynomial::<f64>::from_vec(coeffs).round()
	}

	/// Multiplies every coefficient by `scalar`; with a modulus, reduced
	/// into `[0, q)`.
	pub fn scalar_multiply(&self, scalar: &BigInt, modulus: Option<&BigInt>) -> Self {
		Self::from_vec(self.coeffs.iter().map(|c| c * scalar).collect()).maybe_modulo(modulus)
	}

	/// Floor-divides every coefficient by `scalar` (toward negative
	/// infinity); with a modulus, reduced into `[0, q)`. `scalar` must be
	/// nonzero.
	pub fn scalar_integer_divide(&self, scalar: &BigInt, modulus: Option<&BigInt>) -> Self {
		Self::from_vec(self.coeffs.iter().map(|c| c.div_floor(scalar)).collect())
			.maybe_modulo(modulus)
	}

	/// Reduces every coefficient into `[0, q)`.
	pub fn modulo(&self, modulus: &BigInt) -> Self {
		Self::from_vec(self.coeffs.iter().map(|c| c.mod_floor(modulus)).collect())
	}

	fn maybe_modulo(self, modulus: Option<&BigInt>) -> Self {
		match modulus {
			Some(q) => self.modulo(q),
			None => self,
		}
	}

	/// Reduces every coefficient into the balanced range
	/// `(-floor(q/2), floor(q/2)]`.
	///
	/// This is the canonical representation wherever signed magnitudes
	/// matter: after every CKKS ciphertext-modulus operation and before
	/// any floor division.
	pub fn mod_small(&self, modulus: &BigInt) -> Self {
		let half = modulus / 2;
		Self::from_vec(
			self.coeffs
				.iter()
				.map(|c| {
					let r = c.mod_floor(modulus);
					if r > half {
						r - modulus
					} else {
						r
					}
				})
				.collect(),
		)
	}

	/// The Galois automorphism `m(x) -> m(x^k)` with `k = 5^rotation`.
	///
	/// Five generates the odd-index subgroup of `Z/2dZ` walked by the
	/// canonical embedding's evaluation points, so this rotates
	/// slot-encoded vectors by `rotation` positions.
	pub fn rotate(&self, rotation: usize) -> Self {
		let two_degree = 2 * self.degree as u64;
		let k = mod_exp(5, rotation as u64, two_degree);
		let mut coeffs = vec![BigInt::zero(); self.degree];
		for (i, c) in self.coeffs.iter().enumerate() {
			let index = (i as u64 * k % two_degree) as usize;
			if index < self.degree {
				coeffs[index] = c.clone();
			} else {
				coeffs[index - self.degree] = -c;
			}
		}
		Self::from_vec(coeffs)
	}

	/// The automorphism `m(x) -> m(x^-1)`, conjugating every slot.
	pub fn conjugate(&self) -> Self {
		let mut coeffs = vec![BigInt::zero(); self.degree];
		coeffs[0] = self.coeffs[0].clone();
		for i in 1..self.degree {
			coeffs[i] = -&self.coeffs[self.degree - i];
		}
		Self::from_vec(coeffs)
	}

	/// Splits the polynomial into `num_levels` base-`base` digits:
	/// `D_i = floor(P / base^i) mod base`, so that
	/// `P = sum_i D_i * base^i`.
	pub fn base_decompose(&self, base: &BigInt, num_levels: usize) -> Vec<Self> {
		let mut current = self.clone();
		let mut levels = Vec::with_capacity(num_levels);
		for _ in 0..num_levels {
			levels.push(current.modulo(base));
			current = current.scalar_integer_divide(base, None);
		}
		levels
	}

	/// Converts to the transient real representation.
	pub fn to_float(&self) -> Result<Polynomial<f64>> {
		let coeffs = self
			.coeffs
			.iter()
			.map(|c| {
				c.to_f64()
					.ok_or(Error::InvalidParameter("coefficient exceeds the f64 range"))
			})
			.collect::<Result<Vec<_>>>()?;
		Ok(Polynomial::from_vec(coeffs))
	}

	pub(crate) fn residues(&self, modulus: u64) -> Result<Vec<u64>> {
		let m = BigInt::from(modulus);
		self.coeffs
			.iter()
			.map(|c| {
				c.mod_floor(&m)
					.to_u64()
					.ok_or(Error::InvalidParameter("residue out of range"))
			})
			.collect()
	}

	fn to_complex(&self, length: usize) -> Result<Vec<Complex64>> {
		let mut values = Vec::with_capacity(length);
		for c in &self.coeffs {
			let re = c
				.to_f64()
				.ok_or(Error::InvalidParameter("coefficient exceeds the f64 range"))?;
			values.push(Complex64::new(re, 0.0));
		}
		values.resize(length, Complex64::zero());
		Ok(values)
	}
}

impl Polynomial<f64> {
	/// Multiplies every coefficient by the real `scalar`.
	pub fn scalar_multiply(&self, scalar: f64) -> Self {
		Self::from_vec(self.coeffs.iter().map(|c| c * scalar).collect())
	}

	/// Rounds every coefficient to the nearest integer (ties away from
	/// zero; callers must not depend on the tie direction).
	pub fn round(&self) -> Result<Polynomial<BigInt>> {
		let coeffs = self
			.coeffs
			.iter()
			.map(|c| {
				BigInt::from_f64(c.round())
					.ok_or(Error::InvalidParameter("coefficient is not a finite number"))
			})
			.collect::<Result<Vec<_>>>()?;
		Ok(Polynomial::from_vec(coeffs))
	}

	/// Truncates every coefficient toward negative infinity.
	pub fn floor(&self) -> Result<Polynomial<BigInt>> {
		let coeffs = self
			.coeffs
			.iter()
			.map(|c| {
				BigInt::from_f64(c.floor())
					.ok_or(Error::InvalidParameter("coefficient is not a finite number"))
			})
			.collect::<Result<Vec<_>>>()?;
		Ok(Polynomial::from_vec(coeffs))
	}
}

impl<C> fmt::Display for Polynomial<C>
where
	C: Zero + One + PartialEq + fmt::Display,
{
	/// Highest-degree term first, zero terms skipped, unit coefficients
	/// elided on non-constant terms: `59x^4 + 5x^3 + 4x^2 + x`.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut first = true;
		for i in (0..self.degree).rev() {
			let c = &self.coeffs[i];
			if c.is_zero() {
				continue;
			}
			if !first {
				write!(f, " + ")?;
			}
			first = false;
			if i == 0 || !c.is_one() {
				write!(f, "{c}")?;
			}
			if i != 0 {
				write!(f, "x")?;
			}
			if i > 1 {
				write!(f, "^{i}")?;
			}
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn poly(coeffs: &[i64]) -> Polynomial {
		Polynomial::new(coeffs.len(), coeffs.iter().map(|&c| BigInt::from(c)).collect()).unwrap()
	}

	fn float_poly(coeffs: &[f64]) -> Polynomial<f64> {
		Polynomial::new(coeffs.len(), coeffs.to_vec()).unwrap()
	}

	fn big(value: i64) -> BigInt {
		BigInt::from(value)
	}

	#[test]
	fn construction_checks_the_coefficient_count() {
		assert_eq!(
			Polynomial::new(5, vec![BigInt::zero(); 4]),
			Err(Error::InvalidSize {
				expected: 5,
				actual: 4
			})
		);
		assert!(Polynomial::new(0, Vec::<BigInt>::new()).is_err());
	}

	#[test]
	fn adds_coefficient_wise_modulo_q() {
		let a = poly(&[0, 1, 4, 5, 59]);
		let b = poly(&[1, 2, 4, 3, 2]);
		let q = big(60);
		let sum = a.add(&b, Some(&q)).unwrap();
		assert_eq!(sum, poly(&[1, 3, 8, 8, 1]));
		// addition commutes
		assert_eq!(sum, b.add(&a, Some(&q)).unwrap());
	}

	#[test]
	fn subtracts_coefficient_wise_modulo_q() {
		let a = poly(&[0, 1, 4, 5, 59]);
		let b = poly(&[1, 2, 4, 3, 2]);
		let diff = a.subtract(&b, Some(&big(60))).unwrap();
		assert_eq!(diff, poly(&[59, 59, 0, 2, 57]));
	}

	#[test]
	fn add_rejects_mismatched_degrees() {
		let a = poly(&[1, 2, 3]);
		let b = poly(&[1, 2]);
		assert_eq!(
			a.add(&b, None),
			Err(Error::InvalidSize {
				expected: 3,
				actual: 2
			})
		);
	}

	#[test]
	fn multiplies_negacyclically_modulo_q() {
		let a = poly(&[0, 1, 4, 5]);
		let b = poly(&[1, 2, 4, 3]);
		let q = big(73);
		let product = a.multiply(&b, Some(&q)).unwrap();
		assert_eq!(product, poly(&[44, 42, 64, 17]));
		assert_eq!(product, b.multiply(&a, Some(&q)).unwrap());
	}

	#[test]
	fn multiply_truncates_to_the_smaller_degree() {
		let a = poly(&[1, 2, 3, 4, 5]);
		let b = poly(&[1, 0, 0]);
		let product = a.multiply(&b, None).unwrap();
		assert_eq!(product, poly(&[1, 2, 3]));
	}

	#[test]
	fn ntt_multiply_matches_schoolbook() {
		let ntt = NttContext::new(8, 97).unwrap();
		let a = poly(&[0, 1, 4, 5, 59, 3, 2, 96]);
		let b = poly(&[1, 2, 4, 3, 2, 7, 0, 11]);
		let expected = a.multiply(&b, Some(&big(97))).unwrap();
		assert_eq!(a.multiply_ntt(&b, &ntt).unwrap(), expected);
	}

	#[test]
	fn crt_multiply_matches_schoolbook_rebalanced() {
		let crt = CrtContext::new(3, 20, 8).unwrap();
		let a = poly(&[0, 1, -4, 5, 59, 3, -2, 96]);
		let b = poly(&[1, 2, 4, -3, 2, 7, 0, 11]);
		let expected = a.multiply(&b, None).unwrap().mod_small(crt.modulus());
		assert_eq!(a.multiply_crt(&b, &crt).unwrap(), expected);
	}

	#[test]
	fn fft_multiply_matches_schoolbook() {
		let fft = FftContext::new(8 * 8).unwrap();
		let a = poly(&[0, 1, -4, 5, 59, 3, -2, 96]);
		let b = poly(&[1, 2, 4, -3, 2, 7, 0, 11]);
		let expected = a.multiply(&b, None).unwrap();
		assert_eq!(a.multiply_fft(&b, &fft).unwrap(), expected);
	}

	#[test]
	fn modulo_is_idempotent_and_mod_small_is_balanced() {
		let q = big(60);
		let a = poly(&[-61, -1, 0, 29, 30, 31, 59, 60, 121]);
		let reduced = a.modulo(&q);
		assert_eq!(reduced.modulo(&q), reduced);
		let balanced = a.mod_small(&q);
		for c in balanced.coeffs() {
			assert!(c * 2 > -&q);
			assert!(c * 2 <= q);
		}
		assert_eq!(balanced, poly(&[-1, -1, 0, 29, 30, -29, -1, 0, 1]));
	}

	#[test]
	fn scalar_ops_apply_coefficient_wise() {
		let a = poly(&[0, 1, 4, 5, 59]);
		assert_eq!(
			a.scalar_multiply(&big(3), Some(&big(60))),
			poly(&[0, 3, 12, 15, 57])
		);
		// floor division rounds toward negative infinity
		let b = poly(&[5, 7, -3, -8, 1]);
		assert_eq!(
			b.scalar_integer_divide(&big(2), None),
			poly(&[2, 3, -2, -4, 0])
		);
	}

	#[test]
	fn rotates_through_the_galois_automorphism() {
		let a = poly(&[0, 1, 4, 59]);
		assert_eq!(a.rotate(3), poly(&[0, -1, 4, -59]));
		assert_eq!(a.rotate(0), a);
	}

	#[test]
	fn conjugation_is_an_involution() {
		let a = poly(&[3, 1, -4, 59]);
		assert_eq!(a.conjugate(), poly(&[3, -59, 4, -1]));
		assert_eq!(a.conjugate().conjugate(), a);
	}

	#[test]
	fn rounds_to_the_nearest_integer() {
		let a = float_poly(&[0.51, -3.2, 54.666, 39.01, 0.0]);
		assert_eq!(a.round().unwrap(), poly(&[1, -3, 55, 39, 0]));
	}

	#[test]
	fn floors_toward_negative_infinity() {
		let a = float_poly(&[0.51, -3.2, 54.666, -0.01, 2.0]);
		assert_eq!(a.floor().unwrap(), poly(&[0, -4, 54, -1, 2]));
	}

	#[test]
	fn decomposes_into_base_digits() {
		// T = ceil(sqrt(60)) = 8, L = floor(log_8(60)) + 1 = 2
		let a = poly(&[0, 1, 4, 5, 59]);
		let digits = a.base_decompose(&big(8), 2);
		assert_eq!(digits.len(), 2);
		assert_eq!(digits[0], poly(&[0, 1, 4, 5, 3]));
		assert_eq!(digits[1], poly(&[0, 0, 0, 0, 7]));
		// recomposition: D_0 + 8 * D_1
		let recomposed = digits[0]
			.add(&digits[1].scalar_multiply(&big(8), None), None)
			.unwrap();
		assert_eq!(recomposed, a);
	}

	#[test]
	fn pretty_prints_highest_degree_first() {
		assert_eq!(poly(&[0, 1, 4, 5, 59]).to_string(), "59x^4 + 5x^3 + 4x^2 + x");
		assert_eq!(
			poly(&[1, 2, 4, 3, 2]).to_string(),
			"2x^4 + 3x^3 + 4x^2 + 2x + 1"
		);
		assert_eq!(poly(&[0, 0, 0]).to_string(), "");
		assert_eq!(poly(&[7]).to_string(), "7");
	}
}
