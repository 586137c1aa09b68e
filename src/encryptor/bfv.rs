use num_bigint::BigInt;
use num_integer::Integer;

use crate::ciphertext::Ciphertext;
use crate::error::Result;
use crate::key_generator::PublicKey;
use crate::parameters::BfvParameters;
use crate::plaintext::Plaintext;
use crate::polynomial::Polynomial;
use crate::sampling::sample_triangle;

/// Encrypts BFV plaintexts under a public key.
///
/// A message polynomial m becomes
/// `c0 = p0 * r + e1 + floor(delta) * m` and `c1 = p1 * r + e2` modulo
/// q, for a fresh ternary r and triangle errors e1, e2. The scaled
/// message sits far above the noise, which is what decryption's
/// divide-and-round step relies on.
pub struct BfvEncryptor {
	poly_degree: usize,
	ciph_modulus: BigInt,
	scaling_factor: BigInt,
	public_key: PublicKey,
}

impl BfvEncryptor {
	/// Creates an encryptor for the given parameters and public key.
	pub fn new(params: &BfvParameters, public_key: PublicKey) -> Self {
		Self {
			poly_degree: params.poly_degree(),
			ciph_modulus: params.ciph_modulus().clone(),
			scaling_factor: params.ciph_modulus().div_floor(params.plain_modulus()),
			public_key,
		}
	}

	/// Encrypts one plaintext.
	pub fn encrypt(&self, message: &Plaintext) -> Result<Ciphertext> {
		let q = &self.ciph_modulus;
		let scaled_message = message.poly().scalar_multiply(&self.scaling_factor, Some(q));
		let random_vec = Polynomial::new(self.poly_degree, sample_triangle(self.poly_degree)?)?;
		let error1 = Polynomial::new(self.poly_degree, sample_triangle(self.poly_degree)?)?;
		let error2 = Polynomial::new(self.poly_degree, sample_triangle(self.poly_degree)?)?;

		let c0 = self
			.public_key
			.p0()
			.multiply(&random_vec, Some(q))?
			.add(&error1, Some(q))?
			.add(&scaled_message, Some(q))?;
		let c1 = self
			.public_key
			.p1()
			.multiply(&random_vec, Some(q))?
			.add(&error2, Some(q))?;

		Ok(Ciphertext::new(c0, c1))
	}
}
