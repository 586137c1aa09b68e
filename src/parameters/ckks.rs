use std::fmt;
use std::sync::Arc;

use num_bigint::BigInt;
use num_traits::One;
use tracing::debug;

use crate::crt::CrtContext;
use crate::error::{Error, Result};

/// Default bit size of the RNS primes.
const DEFAULT_PRIME_SIZE: u32 = 59;

/// Default number of Taylor iterations for the (external) approximation
/// pipelines built on top of this core.
const DEFAULT_TAYLOR_ITERATIONS: usize = 6;

/// Parameters of the CKKS scheme.
///
/// Alongside the ring degree d, ciphertext modulus q and scaling factor,
/// CKKS carries a "big modulus" P: the special modulus the key-switching
/// keys live under. Relinearization lifts intermediate products to `q*P`
/// and divides by P afterwards, which is what keeps the switching noise
/// small.
///
/// The RNS tower is sized by the estimate
/// `1 + floor(1 + log2(d) + 4*log2(P)/prime_size)` primes. That is a
/// sizing heuristic with headroom for the `q*P`-sized intermediates, not
/// an invariant; the tower just has to exceed every magnitude the
/// evaluator stores.
#[derive(Debug, Clone)]
pub struct CkksParameters {
	poly_degree: usize,
	ciph_modulus: BigInt,
	big_modulus: BigInt,
	scaling_factor: f64,
	taylor_iterations: usize,
	hamming_weight: usize,
	crt_context: Arc<CrtContext>,
}

impl CkksParameters {
	/// The ring degree d.
	pub fn poly_degree(&self) -> usize {
		self.poly_degree
	}

	/// The ciphertext modulus q fresh encryptions live under.
	pub fn ciph_modulus(&self) -> &BigInt {
		&self.ciph_modulus
	}

	/// The special modulus P used by the key-switching keys.
	pub fn big_modulus(&self) -> &BigInt {
		&self.big_modulus
	}

	/// The scaling factor applied by the encoder.
	pub fn scaling_factor(&self) -> f64 {
		self.scaling_factor
	}

	/// The number of Taylor iterations advertised to approximation
	/// pipelines.
	pub fn taylor_iterations(&self) -> usize {
		self.taylor_iterations
	}

	/// The Hamming weight of the secret key, fixed at `d / 4`.
	pub fn hamming_weight(&self) -> usize {
		self.hamming_weight
	}

	/// The shared RNS context sized for this parameter set.
	pub fn crt_context(&self) -> &Arc<CrtContext> {
		&self.crt_context
	}
}

impl fmt::Display for CkksParameters {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "Encryption parameters")?;
		writeln!(f, "\tpolynomial degree: {}", self.poly_degree)?;
		writeln!(
			f,
			"\tciphertext modulus size: {} bits",
			self.ciph_modulus.bits()
		)?;
		writeln!(
			f,
			"\tbig ciphertext modulus size: {} bits",
			self.big_modulus.bits()
		)?;
		writeln!(
			f,
			"\tscaling factor size: {} bits",
			self.scaling_factor.log2() as u64
		)?;
		write!(f, "\tnumber of Taylor iterations: {}", self.taylor_iterations)
	}
}

/// Builder for [`CkksParameters`].
pub struct CkksParametersBuilder {
	poly_degree: Option<usize>,
	ciph_modulus: Option<BigInt>,
	big_modulus: Option<BigInt>,
	scaling_factor: Option<f64>,
	taylor_iterations: usize,
	prime_size: u32,
}

impl CkksParametersBuilder {
	/// Creates a builder with the degree, moduli and scaling factor
	/// unset and the defaults for everything else.
	pub fn new() -> Self {
		Self {
			poly_degree: None,
			ciph_modulus: None,
			big_modulus: None,
			scaling_factor: None,
			taylor_iterations: DEFAULT_TAYLOR_ITERATIONS,
			prime_size: DEFAULT_PRIME_SIZE,
		}
	}

	/// Sets the ring degree d, a power of two of at least 4.
	pub fn set_poly_degree(mut self, degree: usize) -> Self {
		self.poly_degree = Some(degree);
		self
	}

	/// Sets the ciphertext modulus q.
	pub fn set_ciph_modulus(mut self, modulus: impl Into<BigInt>) -> Self {
		self.ciph_modulus = Some(modulus.into());
		self
	}

	/// Sets the special modulus P.
	pub fn set_big_modulus(mut self, modulus: impl Into<BigInt>) -> Self {
		self.big_modulus = Some(modulus.into());
		self
	}

	/// Sets the encoder scaling factor.
	pub fn set_scaling_factor(mut self, scaling_factor: f64) -> Self {
		self.scaling_factor = Some(scaling_factor);
		self
	}

	/// Overrides the number of Taylor iterations.
	pub fn set_taylor_iterations(mut self, iterations: usize) -> Self {
		self.taylor_iterations = iterations;
		self
	}

	/// Overrides the RNS prime bit size (default 59).
	pub fn set_prime_size(mut self, prime_size: u32) -> Self {
		self.prime_size = prime_size;
		self
	}

	/// Validates the choices, generates the RNS tower, and returns the
	/// parameters.
	pub fn build(self) -> Result<CkksParameters> {
		let poly_degree = self
			.poly_degree
			.ok_or(Error::InvalidParameter("polynomial degree not set"))?;
		if poly_degree < 4 || !poly_degree.is_power_of_two() {
			return Err(Error::InvalidParameter(
				"polynomial degree must be a power of two of at least 4",
			));
		}
		let ciph_modulus = self
			.ciph_modulus
			.ok_or(Error::InvalidParameter("ciphertext modulus not set"))?;
		let big_modulus = self
			.big_modulus
			.ok_or(Error::InvalidParameter("big modulus not set"))?;
		if ciph_modulus <= BigInt::one() || big_modulus < ciph_modulus {
			return Err(Error::InvalidParameter(
				"big modulus must be at least the ciphertext modulus",
			));
		}
		let scaling_factor = self
			.scaling_factor
			.ok_or(Error::InvalidParameter("scaling factor not set"))?;
		if !scaling_factor.is_finite() || scaling_factor < 1.0 {
			return Err(Error::InvalidParameter("scaling factor must be at least 1"));
		}

		// sizing estimate: enough primes to hold the q*P-sized products
		let big_modulus_bits = (big_modulus.bits() - 1) as f64;
		let num_primes = 1 + (1.0
			+ (poly_degree as f64).log2()
			+ 4.0 * big_modulus_bits / self.prime_size as f64) as usize;
		debug!(num_primes, prime_size = self.prime_size, "sizing RNS tower");
		let crt_context = Arc::new(CrtContext::new(num_primes, self.prime_size, poly_degree)?);

		Ok(CkksParameters {
			poly_degree,
			ciph_modulus,
			big_modulus,
			scaling_factor,
			taylor_iterations: self.taylor_iterations,
			hamming_weight: poly_degree / 4,
			crt_context,
		})
	}
}

impl Default for CkksParametersBuilder {
	fn default() -> Self {
		Self::new()
	}
}
