use num_bigint::BigInt;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::key_generator::{PublicKey, SecretKey};
use crate::parameters::CkksParameters;
use crate::polynomial::Polynomial;
use crate::sampling::{sample_hamming_weight_vector, sample_triangle, sample_uniform};

/// A CKKS key-switching key, generated at the squared special modulus
/// `P^2` for a target polynomial t: `sw0 + sw1 * s` equals `P * t` plus
/// a small error.
///
/// Multiplying a ciphertext term by the key and flooring away the factor
/// P moves that term from key t to key s while only adding noise of
/// roughly the error's magnitude (the special-modulus technique).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchingKey {
	sw0: Polynomial,
	sw1: Polynomial,
}

impl SwitchingKey {
	/// The first key polynomial, `-(a * s) + e + P * t`.
	pub fn sw0(&self) -> &Polynomial {
		&self.sw0
	}

	/// The second key polynomial, the uniform `a`.
	pub fn sw1(&self) -> &Polynomial {
		&self.sw1
	}
}

/// A switching key for the rotated secret `s(x^(5^r))`, enabling slot
/// rotation by r positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationKey {
	rotation: usize,
	key: SwitchingKey,
}

impl RotationKey {
	/// The rotation step r.
	pub fn rotation(&self) -> usize {
		self.rotation
	}

	/// The switching key for the rotated secret.
	pub fn key(&self) -> &SwitchingKey {
		&self.key
	}
}

/// Generates the CKKS secret, public and switching keys.
pub struct CkksKeyGenerator {
	poly_degree: usize,
	big_modulus: BigInt,
	secret_key: SecretKey,
	public_key: PublicKey,
	relin_key: SwitchingKey,
}

impl CkksKeyGenerator {
	/// Samples a fresh key set for the given parameters.
	///
	/// The secret key has exactly `params.hamming_weight()` nonzero
	/// ternary coefficients; the public key lives at the special modulus
	/// P, and the relinearization key is the switching key for `s^2`.
	pub fn new(params: &CkksParameters) -> Result<Self> {
		let degree = params.poly_degree();
		let p = params.big_modulus();

		let secret = Polynomial::new(
			degree,
			sample_hamming_weight_vector(degree, params.hamming_weight())?,
		)?;

		let pk_coeff = Polynomial::new(degree, sample_uniform(&BigInt::zero(), p, degree)?)?;
		let pk_error = Polynomial::new(degree, sample_triangle(degree)?)?;
		// p0 = -a * s + e, p1 = a
		let p0 = pk_coeff
			.multiply(&secret, Some(p))?
			.scalar_multiply(&BigInt::from(-1), Some(p))
			.add(&pk_error, Some(p))?;
		let public_key = PublicKey::new(p0, pk_coeff);

		let sk_squared = secret.multiply(&secret, Some(p))?;
		let relin_key = generate_switching_key(degree, p, &secret, &sk_squared)?;
		debug!(
			degree,
			hamming_weight = params.hamming_weight(),
			"generated CKKS key material"
		);

		Ok(Self {
			poly_degree: degree,
			big_modulus: p.clone(),
			secret_key: SecretKey::new(secret),
			public_key,
			relin_key,
		})
	}

	/// The switching key that moves a term from key `target` to key s.
	pub fn switching_key(&self, target: &Polynomial) -> Result<SwitchingKey> {
		generate_switching_key(
			self.poly_degree,
			&self.big_modulus,
			self.secret_key.poly(),
			target,
		)
	}

	/// The rotation key for slot rotation by `rotation` positions.
	pub fn rotation_key(&self, rotation: usize) -> Result<RotationKey> {
		let rotated = self.secret_key.poly().rotate(rotation);
		Ok(RotationKey {
			rotation,
			key: self.switching_key(&rotated)?,
		})
	}

	/// The conjugation key, switching from `s(x^-1)` back to s.
	pub fn conjugation_key(&self) -> Result<SwitchingKey> {
		let conjugated = self.secret_key.poly().conjugate();
		self.switching_key(&conjugated)
	}

	/// The sampled secret key.
	pub fn secret_key(&self) -> &SecretKey {
		&self.secret_key
	}

	/// The public encryption key (at the special modulus P).
	pub fn public_key(&self) -> &PublicKey {
		&self.public_key
	}

	/// The relinearization key: the switching key for `s^2`.
	pub fn relin_key(&self) -> &SwitchingKey {
		&self.relin_key
	}
}

fn generate_switching_key(
	degree: usize,
	big_modulus: &BigInt,
	secret: &Polynomial,
	target: &Polynomial,
) -> Result<SwitchingKey> {
	let mod_squared = big_modulus * big_modulus;
	let swk_coeff = Polynomial::new(degree, sample_uniform(&BigInt::zero(), &mod_squared, degree)?)?;
	let swk_error = Polynomial::new(degree, sample_triangle(degree)?)?;
	// sw0 = -(a * s) + e + P * t at modulus P^2
	let sw0 = swk_coeff
		.multiply(secret, Some(&mod_squared))?
		.scalar_multiply(&BigInt::from(-1), Some(&mod_squared))
		.add(&swk_error, Some(&mod_squared))?
		.add(
			&target.scalar_multiply(big_modulus, Some(&mod_squared)),
			Some(&mod_squared),
		)?;
	Ok(SwitchingKey {
		sw0,
		sw1: swk_coeff,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::parameters::{CkksParameters, CkksParametersBuilder};
	use num_traits::{One, Signed};

	fn test_params() -> CkksParameters {
		CkksParametersBuilder::new()
			.set_poly_degree(16)
			.set_ciph_modulus(BigInt::one() << 100)
			.set_big_modulus(BigInt::one() << 100)
			.set_scaling_factor((1u64 << 30) as f64)
			.set_prime_size(30)
			.build()
			.unwrap()
	}

	#[test]
	fn secret_key_has_the_parameter_hamming_weight() {
		let params = test_params();
		let keygen = CkksKeyGenerator::new(&params).unwrap();
		let nonzero = keygen
			.secret_key()
			.poly()
			.coeffs()
			.iter()
			.filter(|c| !c.is_zero())
			.count();
		assert_eq!(nonzero, params.hamming_weight());
	}

	#[test]
	fn public_key_cancels_to_a_small_error() {
		let params = test_params();
		let keygen = CkksKeyGenerator::new(&params).unwrap();
		let p = params.big_modulus();
		let s = keygen.secret_key().poly();
		// p0 + p1 * s = e
		let residue = keygen
			.public_key()
			.p0()
			.add(&keygen.public_key().p1().multiply(s, Some(p)).unwrap(), Some(p))
			.unwrap()
			.mod_small(p);
		for c in residue.coeffs() {
			assert!(c.abs() <= BigInt::one());
		}
	}

	#[test]
	fn relin_key_encrypts_the_scaled_squared_secret() {
		let params = test_params();
		let keygen = CkksKeyGenerator::new(&params).unwrap();
		let p = params.big_modulus();
		let p_squared = p * p;
		let s = keygen.secret_key().poly();
		let sk_squared = s.multiply(s, Some(p)).unwrap();
		// sw0 + sw1 * s - P * s^2 = e
		let residue = keygen
			.relin_key()
			.sw0()
			.add(
				&keygen.relin_key().sw1().multiply(s, Some(&p_squared)).unwrap(),
				Some(&p_squared),
			)
			.unwrap()
			.subtract(&sk_squared.scalar_multiply(p, Some(&p_squared)), Some(&p_squared))
			.unwrap()
			.mod_small(&p_squared);
		for c in residue.coeffs() {
			assert!(c.abs() <= BigInt::one());
		}
	}

	#[test]
	fn rotation_key_carries_its_step() {
		let params = test_params();
		let keygen = CkksKeyGenerator::new(&params).unwrap();
		let rot_key = keygen.rotation_key(3).unwrap();
		assert_eq!(rot_key.rotation(), 3);

		let p_squared = params.big_modulus() * params.big_modulus();
		let s = keygen.secret_key().poly();
		let rotated = s.rotate(3);
		// sw0 + sw1 * s - P * s(x^(5^3)) = e
		let residue = rot_key
			.key()
			.sw0()
			.add(
				&rot_key.key().sw1().multiply(s, Some(&p_squared)).unwrap(),
				Some(&p_squared),
			)
			.unwrap()
			.subtract(
				&rotated.scalar_multiply(params.big_modulus(), Some(&p_squared)),
				Some(&p_squared),
			)
			.unwrap()
			.mod_small(&p_squared);
		for c in residue.coeffs() {
			assert!(c.abs() <= BigInt::one());
		}
	}
}
