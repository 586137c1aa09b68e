use num_bigint::BigInt;
use num_complex::Complex64;
use num_traits::{FromPrimitive, ToPrimitive, Zero};

use crate::encoder::{Encoder, SlotCount};
use crate::error::{Error, Result};
use crate::fft::FftContext;
use crate::parameters::CkksParameters;
use crate::plaintext::Plaintext;
use crate::polynomial::Polynomial;

/// Canonical-embedding encoder for CKKS.
///
/// A vector of `d / 2` complex values is pulled back through the inverse
/// canonical embedding into a packed complex polynomial, scaled by the
/// scaling factor, and split into real and imaginary coefficient halves
/// of a degree-d integer polynomial. Ring arithmetic then acts slot-wise
/// on the embedded vector, approximately: the scaling factor fixes how
/// many bits of precision survive the rounding.
///
/// The encoder carries the parameter scaling factor as its default;
/// decoding always uses the scaling factor the plaintext itself carries,
/// which grows as ciphertexts are multiplied.
pub struct CkksEncoder {
	degree: usize,
	num_slots: usize,
	scaling_factor: f64,
	fft: FftContext,
}

impl CkksEncoder {
	/// Creates an encoder for the given parameters.
	pub fn new(params: &CkksParameters) -> Result<Self> {
		let degree = params.poly_degree();
		Ok(Self {
			degree,
			num_slots: degree / 2,
			scaling_factor: params.scaling_factor(),
			fft: FftContext::new(2 * degree)?,
		})
	}

	/// Encodes at an explicit scaling factor instead of the parameter
	/// default.
	pub fn encode_with_scaling_factor(
		&self,
		data: &[Complex64],
		scaling_factor: f64,
	) -> Result<Plaintext> {
		if data.len() != self.num_slots {
			return Err(Error::InvalidSize {
				expected: self.num_slots,
				actual: data.len(),
			});
		}
		let to_scale = self.fft.embedding_inv(data)?;
		let mut coeffs = vec![BigInt::zero(); self.degree];
		for (i, value) in to_scale.iter().enumerate() {
			coeffs[i] = round_scaled(value.re, scaling_factor)?;
			coeffs[i + self.num_slots] = round_scaled(value.im, scaling_factor)?;
		}
		Ok(Plaintext::with_scaling_factor(
			Polynomial::new(self.degree, coeffs)?,
			scaling_factor,
		))
	}
}

fn round_scaled(value: f64, scaling_factor: f64) -> Result<BigInt> {
	BigInt::from_f64((value * scaling_factor).round())
		.ok_or(Error::InvalidParameter("encoded value is not finite"))
}

impl SlotCount for CkksEncoder {
	fn slot_count(&self) -> usize {
		self.num_slots
	}
}

impl Encoder<Complex64> for CkksEncoder {
	type Encoded = Plaintext;

	fn encode(&self, data: &[Complex64]) -> Result<Plaintext> {
		self.encode_with_scaling_factor(data, self.scaling_factor)
	}

	/// Pairs the coefficient halves back into complex values, divides
	/// out the plaintext's scaling factor, and applies the embedding.
	fn decode(&self, encoded: &Plaintext) -> Result<Vec<Complex64>> {
		let scaling_factor = encoded
			.scaling_factor()
			.ok_or(Error::MissingMetadata("scaling factor"))?;
		if encoded.poly().degree() != self.degree {
			return Err(Error::InvalidSize {
				expected: self.degree,
				actual: encoded.poly().degree(),
			});
		}
		let coeffs = encoded.poly().coeffs();
		let mut packed = Vec::with_capacity(self.num_slots);
		for i in 0..self.num_slots {
			let re = coeffs[i]
				.to_f64()
				.ok_or(Error::InvalidParameter("coefficient exceeds the f64 range"))?;
			let im = coeffs[i + self.num_slots]
				.to_f64()
				.ok_or(Error::InvalidParameter("coefficient exceeds the f64 range"))?;
			packed.push(Complex64::new(re / scaling_factor, im / scaling_factor));
		}
		self.fft.embedding(&packed)
	}
}
