use num_bigint::BigInt;
use num_traits::ToPrimitive;

use crate::encoder::{Encoder, SlotCount};
use crate::error::{Error, Result};
use crate::ntt::NttContext;
use crate::parameters::BfvParameters;
use crate::plaintext::Plaintext;
use crate::polynomial::Polynomial;

/// Batching encoder for BFV.
///
/// When the plaintext modulus is an NTT-friendly prime for the ring
/// degree, the ring `R_p` splits into d independent slots: the encoder
/// stores a vector of d integers as the polynomial whose negacyclic NTT
/// evaluations are exactly those integers. Homomorphic addition and
/// multiplication then act slot-wise on the vector, which is what makes
/// SIMD-style batched computation possible in an exact scheme.
///
/// Construction fails with [`Error::InvalidParameter`] when the plain
/// modulus does not admit the required root of unity.
pub struct BatchEncoder {
	degree: usize,
	plain_modulus: u64,
	ntt: NttContext,
}

impl BatchEncoder {
	/// Creates an encoder for the given parameters.
	pub fn new(params: &BfvParameters) -> Result<Self> {
		let plain_modulus = params
			.plain_modulus()
			.to_u64()
			.ok_or(Error::InvalidParameter(
				"plain modulus too large for batching",
			))?;
		Ok(Self {
			degree: params.poly_degree(),
			plain_modulus,
			ntt: NttContext::new(params.poly_degree(), plain_modulus)?,
		})
	}
}

impl SlotCount for BatchEncoder {
	fn slot_count(&self) -> usize {
		self.degree
	}
}

impl Encoder<BigInt> for BatchEncoder {
	type Encoded = Plaintext;

	/// Inverse NTT of the slot values at the plain modulus.
	fn encode(&self, data: &[BigInt]) -> Result<Plaintext> {
		if data.len() != self.degree {
			return Err(Error::InvalidSize {
				expected: self.degree,
				actual: data.len(),
			});
		}
		let modulus = BigInt::from(self.plain_modulus);
		let residues = data
			.iter()
			.map(|value| {
				num_integer::Integer::mod_floor(value, &modulus)
					.to_u64()
					.ok_or(Error::InvalidParameter("residue out of range"))
			})
			.collect::<Result<Vec<_>>>()?;
		let coeffs = self.ntt.ftt_inv(&residues)?;
		Ok(Plaintext::new(Polynomial::new(
			self.degree,
			coeffs.into_iter().map(BigInt::from).collect(),
		)?))
	}

	/// Forward NTT of the plaintext, reduced modulo the plain modulus.
	fn decode(&self, encoded: &Plaintext) -> Result<Vec<BigInt>> {
		let residues = encoded.poly().residues(self.plain_modulus)?;
		let slots = self.ntt.ftt_fwd(&residues)?;
		Ok(slots.into_iter().map(BigInt::from).collect())
	}
}
