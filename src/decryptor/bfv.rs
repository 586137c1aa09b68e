use num_bigint::BigInt;

use crate::ciphertext::Ciphertext;
use crate::error::Result;
use crate::key_generator::SecretKey;
use crate::parameters::BfvParameters;
use crate::plaintext::Plaintext;
use crate::polynomial::Polynomial;

/// Decrypts BFV ciphertexts with the secret key.
pub struct BfvDecryptor {
	ciph_modulus: BigInt,
	plain_modulus: BigInt,
	scaling_factor: f64,
	secret_key: SecretKey,
}

impl BfvDecryptor {
	/// Creates a decryptor for the given parameters and secret key.
	pub fn new(params: &BfvParameters, secret_key: SecretKey) -> Self {
		Self {
			ciph_modulus: params.ciph_modulus().clone(),
			plain_modulus: params.plain_modulus().clone(),
			scaling_factor: params.scaling_factor(),
			secret_key,
		}
	}

	/// Decrypts a ciphertext: `m = round((c0 + c1 * s) / delta) mod p`.
	///
	/// A three-term ciphertext fresh out of a multiplication can be
	/// decrypted before relinearization by passing its third polynomial
	/// as `c2`; the `c2 * s^2` term is then included.
	pub fn decrypt(&self, ciphertext: &Ciphertext, c2: Option<&Polynomial>) -> Result<Plaintext> {
		let q = &self.ciph_modulus;
		let s = self.secret_key.poly();
		let mut message = ciphertext
			.c1()
			.multiply(s, Some(q))?
			.add(ciphertext.c0(), Some(q))?;
		if let Some(c2) = c2 {
			let sk_squared = s.multiply(s, Some(q))?;
			message = message.add(&c2.multiply(&sk_squared, Some(q))?, Some(q))?;
		}

		let message = message
			.to_float()?
			.scalar_multiply(1.0 / self.scaling_factor)
			.round()?
			.modulo(&self.plain_modulus);
		Ok(Plaintext::new(message))
	}
}
