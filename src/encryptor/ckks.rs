use std::sync::Arc;

use num_bigint::BigInt;

use crate::ciphertext::Ciphertext;
use crate::crt::CrtContext;
use crate::error::{Error, Result};
use crate::key_generator::{PublicKey, SecretKey};
use crate::parameters::CkksParameters;
use crate::plaintext::Plaintext;
use crate::polynomial::Polynomial;
use crate::sampling::sample_triangle;

/// Encrypts CKKS plaintexts under a public key, or symmetrically under
/// the secret key when one is supplied.
///
/// Fresh ciphertexts are rebalanced into the signed representation and
/// carry the plaintext's scaling factor together with the modulus they
/// were produced under; every later operation reads both from the
/// ciphertext rather than from the parameters.
pub struct CkksEncryptor {
	poly_degree: usize,
	coeff_modulus: BigInt,
	crt: Arc<CrtContext>,
	public_key: PublicKey,
	secret_key: Option<SecretKey>,
}

impl CkksEncryptor {
	/// Creates a public-key encryptor.
	pub fn new(params: &CkksParameters, public_key: PublicKey) -> Self {
		Self {
			poly_degree: params.poly_degree(),
			coeff_modulus: params.ciph_modulus().clone(),
			crt: params.crt_context().clone(),
			public_key,
			secret_key: None,
		}
	}

	/// Creates an encryptor that can also encrypt symmetrically.
	pub fn with_secret_key(
		params: &CkksParameters,
		public_key: PublicKey,
		secret_key: SecretKey,
	) -> Self {
		Self {
			secret_key: Some(secret_key),
			..Self::new(params, public_key)
		}
	}

	/// Encrypts one plaintext under the public key:
	/// `c0 = p0 * r + e1 + m`, `c1 = p1 * r + e2` modulo q.
	pub fn encrypt(&self, plaintext: &Plaintext) -> Result<Ciphertext> {
		let q = &self.coeff_modulus;
		let random_vec = Polynomial::new(self.poly_degree, sample_triangle(self.poly_degree)?)?;
		let error1 = Polynomial::new(self.poly_degree, sample_triangle(self.poly_degree)?)?;
		let error2 = Polynomial::new(self.poly_degree, sample_triangle(self.poly_degree)?)?;

		let c0 = self
			.public_key
			.p0()
			.multiply_crt(&random_vec, &self.crt)?
			.add(&error1, Some(q))?
			.add(plaintext.poly(), Some(q))?
			.mod_small(q);
		let c1 = self
			.public_key
			.p1()
			.multiply_crt(&random_vec, &self.crt)?
			.add(&error2, Some(q))?
			.mod_small(q);

		Ok(Ciphertext::with_metadata(
			c0,
			c1,
			plaintext.scaling_factor(),
			q.clone(),
		))
	}

	/// Encrypts one plaintext under the secret key:
	/// `c0 = s * r + e + m`, `c1 = -r` modulo q.
	///
	/// Fails with [`Error::InvalidParameter`] when the encryptor was
	/// built without a secret key.
	pub fn encrypt_with_secret_key(&self, plaintext: &Plaintext) -> Result<Ciphertext> {
		let secret_key = self
			.secret_key
			.as_ref()
			.ok_or(Error::InvalidParameter("encryptor holds no secret key"))?;
		let q = &self.coeff_modulus;
		let random_vec = Polynomial::new(self.poly_degree, sample_triangle(self.poly_degree)?)?;
		let error = Polynomial::new(self.poly_degree, sample_triangle(self.poly_degree)?)?;

		let c0 = secret_key
			.poly()
			.multiply_crt(&random_vec, &self.crt)?
			.add(&error, Some(q))?
			.add(plaintext.poly(), Some(q))?
			.mod_small(q);
		let c1 = random_vec
			.scalar_multiply(&BigInt::from(-1), Some(q))
			.mod_small(q);

		Ok(Ciphertext::with_metadata(
			c0,
			c1,
			plaintext.scaling_factor(),
			q.clone(),
		))
	}

	/// Raises the modulus fresh encryptions are produced under. A
	/// bootstrapping adjunct: re-encryption at a higher level starts
	/// here.
	pub fn raise_modulus(&mut self, new_modulus: BigInt) {
		self.coeff_modulus = new_modulus;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::decryptor::CkksDecryptor;
	use crate::encoder::{CkksEncoder, Encoder};
	use crate::key_generator::CkksKeyGenerator;
	use crate::parameters::{CkksParameters, CkksParametersBuilder};
	use num_complex::Complex64;
	use num_traits::One;

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

	fn test_message() -> Vec<Complex64> {
		(0..8)
			.map(|i| Complex64::new(i as f64 / 4.0 - 1.0, (i * i) as f64 / 64.0))
			.collect()
	}

	#[test]
	fn public_key_encryption_roundtrips_through_decryption() {
		let params = test_params();
		let keygen = CkksKeyGenerator::new(&params).unwrap();
		let encoder = CkksEncoder::new(&params).unwrap();
		let encryptor = CkksEncryptor::new(&params, keygen.public_key().clone());
		let decryptor = CkksDecryptor::new(&params, keygen.secret_key().clone());

		let message = test_message();
		let ciphertext = encryptor.encrypt(&encoder.encode(&message).unwrap()).unwrap();
		assert_eq!(ciphertext.modulus(), Some(params.ciph_modulus()));
		let decoded = encoder
			.decode(&decryptor.decrypt(&ciphertext, None).unwrap())
			.unwrap();
		for (a, b) in decoded.iter().zip(&message) {
			assert!((a.re - b.re).abs() < 1e-5);
			assert!((a.im - b.im).abs() < 1e-5);
		}
	}

	#[test]
	fn secret_key_encryption_roundtrips_through_decryption() {
		let params = test_params();
		let keygen = CkksKeyGenerator::new(&params).unwrap();
		let encoder = CkksEncoder::new(&params).unwrap();
		let encryptor = CkksEncryptor::with_secret_key(
			&params,
			keygen.public_key().clone(),
			keygen.secret_key().clone(),
		);
		let decryptor = CkksDecryptor::new(&params, keygen.secret_key().clone());

		let message = test_message();
		let ciphertext = encryptor
			.encrypt_with_secret_key(&encoder.encode(&message).unwrap())
			.unwrap();
		let decoded = encoder
			.decode(&decryptor.decrypt(&ciphertext, None).unwrap())
			.unwrap();
		for (a, b) in decoded.iter().zip(&message) {
			assert!((a.re - b.re).abs() < 1e-5);
			assert!((a.im - b.im).abs() < 1e-5);
		}
	}

	#[test]
	fn secret_key_encryption_requires_the_key() {
		let params = test_params();
		let keygen = CkksKeyGenerator::new(&params).unwrap();
		let encoder = CkksEncoder::new(&params).unwrap();
		let encryptor = CkksEncryptor::new(&params, keygen.public_key().clone());
		let plaintext = encoder.encode(&test_message()).unwrap();
		assert_eq!(
			encryptor.encrypt_with_secret_key(&plaintext),
			Err(Error::InvalidParameter("encryptor holds no secret key"))
		);
	}
}
