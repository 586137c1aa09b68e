use num_bigint::BigInt;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::key_generator::{PublicKey, SecretKey};
use crate::parameters::BfvParameters;
use crate::polynomial::Polynomial;
use crate::sampling::{sample_triangle, sample_uniform};

/// The BFV relinearization key: base-T digit keys.
///
/// For `T = ceil(sqrt(q))` and `L = floor(log_T(q)) + 1`, level i holds
/// a pair `(k0_i, k1_i)` with `k0_i + k1_i * s` equal to
/// `-s^2 * T^i` plus a small error. Decomposing the third ciphertext
/// term into base-T digits before applying the keys keeps the digit
/// magnitudes below T, which is what tames the noise growth of
/// relinearization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelinearizationKey {
	base: BigInt,
	keys: Vec<(Polynomial, Polynomial)>,
}

impl RelinearizationKey {
	/// The decomposition base T.
	pub fn base(&self) -> &BigInt {
		&self.base
	}

	/// The per-level key pairs, lowest digit first.
	pub fn keys(&self) -> &[(Polynomial, Polynomial)] {
		&self.keys
	}
}

/// Generates the BFV secret, public and relinearization keys.
pub struct BfvKeyGenerator {
	secret_key: SecretKey,
	public_key: PublicKey,
	relin_key: RelinearizationKey,
}

impl BfvKeyGenerator {
	/// Samples a fresh key set for the given parameters.
	pub fn new(params: &BfvParameters) -> Result<Self> {
		let degree = params.poly_degree();
		let q = params.ciph_modulus();

		let secret = Polynomial::new(degree, sample_triangle(degree)?)?;

		let pk_coeff = Polynomial::new(degree, sample_uniform(&BigInt::zero(), q, degree)?)?;
		let pk_error = Polynomial::new(degree, sample_triangle(degree)?)?;
		// p0 = -(a * s + e), p1 = a
		let p0 = pk_coeff
			.multiply(&secret, Some(q))?
			.add(&pk_error, Some(q))?
			.scalar_multiply(&BigInt::from(-1), Some(q));
		let public_key = PublicKey::new(p0, pk_coeff);

		let relin_key = Self::generate_relin_key(params, &secret)?;
		debug!(
			degree,
			levels = relin_key.keys.len(),
			"generated BFV key material"
		);

		Ok(Self {
			secret_key: SecretKey::new(secret),
			public_key,
			relin_key,
		})
	}

	/// Base-T decomposition keys: level i encrypts `-s^2 * T^i`.
	fn generate_relin_key(params: &BfvParameters, secret: &Polynomial) -> Result<RelinearizationKey> {
		let degree = params.poly_degree();
		let q = params.ciph_modulus();
		let base = ceil_sqrt(q);

		// number of base-T digits of q
		let mut num_levels = 1usize;
		let mut bound = base.clone();
		while &bound <= q {
			bound *= &base;
			num_levels += 1;
		}

		let sk_squared = secret.multiply(secret, Some(q))?;
		let mut keys = Vec::with_capacity(num_levels);
		let mut power = BigInt::one();
		for _ in 0..num_levels {
			let k1 = Polynomial::new(degree, sample_uniform(&BigInt::zero(), q, degree)?)?;
			let error = Polynomial::new(degree, sample_triangle(degree)?)?;
			// k0 = -(s * k1 + e) + s^2 * T^i
			let k0 = secret
				.multiply(&k1, Some(q))?
				.add(&error, Some(q))?
				.scalar_multiply(&BigInt::from(-1), None)
				.add(&sk_squared.scalar_multiply(&power, None), Some(q))?;
			keys.push((k0, k1));
			power = power * &base % q;
		}

		Ok(RelinearizationKey { base, keys })
	}

	/// The sampled secret key.
	pub fn secret_key(&self) -> &SecretKey {
		&self.secret_key
	}

	/// The public encryption key.
	pub fn public_key(&self) -> &PublicKey {
		&self.public_key
	}

	/// The relinearization key for the evaluator.
	pub fn relin_key(&self) -> &RelinearizationKey {
		&self.relin_key
	}
}

/// `ceil(sqrt(value))` for a nonnegative integer.
fn ceil_sqrt(value: &BigInt) -> BigInt {
	let root = value.sqrt();
	if &root * &root == *value {
		root
	} else {
		root + 1
	}
}
