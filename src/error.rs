/// A type representing all errors that can occur in the cryptographic core.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	/// A coefficient vector does not match the stated ring degree, or two
	/// operands have incompatible degrees.
	#[error("invalid size: expected {expected} coefficients, found {actual}")]
	InvalidSize {
		/// The length the operation required.
		expected: usize,
		/// The length it was given.
		actual: usize,
	},

	/// Ciphertext operands do not share a modulus or scaling factor.
	#[error("ciphertext operands do not share a modulus or scaling factor")]
	ModulusMismatch,

	/// A ciphertext is missing metadata the operation requires.
	#[error("ciphertext is missing its {0}")]
	MissingMetadata(&'static str),

	/// A parameter does not satisfy the preconditions of the operation.
	#[error("invalid parameter: {0}")]
	InvalidParameter(&'static str),

	/// The cryptographically secure random number generator is unavailable.
	#[error("cryptographically secure randomness unavailable")]
	SamplingFailure,
}

/// The result type for operations in this crate.
pub type Result<T> = std::result::Result<T, Error>;
