//! Encoding between message vectors and plaintext polynomials.

use crate::error::Result;

mod bfv;
mod ckks;

pub use bfv::BatchEncoder;
pub use ckks::CkksEncoder;

/// A type with a fixed number of message slots.
pub trait SlotCount {
	/// The number of values one plaintext holds.
	fn slot_count(&self) -> usize;
}

/// An interface for encoding and decoding message vectors.
pub trait Encoder<T>: SlotCount {
	/// The encoded form.
	type Encoded;

	/// Encodes a vector of exactly [`slot_count`](SlotCount::slot_count)
	/// values into a plaintext.
	fn encode(&self, data: &[T]) -> Result<Self::Encoded>;

	/// Decodes a plaintext back into its vector of values.
	fn decode(&self, encoded: &Self::Encoded) -> Result<Vec<T>>;
}
