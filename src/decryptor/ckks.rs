use std::sync::Arc;

use crate::ciphertext::Ciphertext;
use crate::crt::CrtContext;
use crate::error::{Error, Result};
use crate::key_generator::SecretKey;
use crate::parameters::CkksParameters;
use crate::plaintext::Plaintext;
use crate::polynomial::Polynomial;

/// Decrypts CKKS ciphertexts with the secret key.
pub struct CkksDecryptor {
	crt: Arc<CrtContext>,
	secret_key: SecretKey,
}

impl CkksDecryptor {
	/// Creates a decryptor for the given parameters and secret key.
	pub fn new(params: &CkksParameters, secret_key: SecretKey) -> Self {
		Self {
			crt: params.crt_context().clone(),
			secret_key,
		}
	}

	/// Decrypts a ciphertext: `m = c0 + c1 * s` under the ciphertext's
	/// own modulus, rebalanced into the signed representation. The
	/// result carries the ciphertext's scaling factor for the decoder.
	///
	/// Fails with [`Error::MissingMetadata`] unless the ciphertext
	/// carries both its modulus and its scaling factor. A three-term
	/// ciphertext can be decrypted before relinearization by passing its
	/// third polynomial as `c2`.
	pub fn decrypt(&self, ciphertext: &Ciphertext, c2: Option<&Polynomial>) -> Result<Plaintext> {
		let q = ciphertext
			.modulus()
			.ok_or(Error::MissingMetadata("modulus"))?;
		let scaling_factor = ciphertext
			.scaling_factor()
			.ok_or(Error::MissingMetadata("scaling factor"))?;

		let s = self.secret_key.poly();
		let mut message = ciphertext
			.c1()
			.multiply_crt(s, &self.crt)?
			.add(ciphertext.c0(), Some(q))?;
		if let Some(c2) = c2 {
			let sk_squared = s.multiply(s, Some(q))?;
			message = message.add(&c2.multiply_crt(&sk_squared, &self.crt)?, Some(q))?;
		}

		Ok(Plaintext::with_scaling_factor(
			message.mod_small(q),
			scaling_factor,
		))
	}
}
