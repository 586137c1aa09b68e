//! A pure-Rust cryptographic core for two lattice-based homomorphic
//! encryption schemes over the ring `Z[x]/(x^d + 1)`: BFV, with exact
//! arithmetic on batched integer vectors, and CKKS, with approximate
//! arithmetic on complex vectors through the canonical embedding.
//!
//! The ring engine underneath provides negacyclic polynomial arithmetic
//! with three fast multiplication strategies: a number-theoretic
//! transform over a single NTT-friendly prime, an RNS/CRT tower of such
//! primes for moduli of a thousand bits and more, and a complex FFT for
//! products in the plain integer domain. Schemes sit on top as thin
//! layers: key generation, encryption, decryption, homomorphic addition
//! and multiplication, relinearization, and the two encoders.
//!
//! # Example
//!
//! ```rust
//! use fhe_core::{
//!     BatchEncoder, BfvDecryptor, BfvEncryptor, BfvEvaluator, BfvKeyGenerator,
//!     BfvParametersBuilder, Encoder, Evaluator,
//! };
//! use num_bigint::BigInt;
//!
//! fn main() -> anyhow::Result<()> {
//!     let params = BfvParametersBuilder::new()
//!         .set_poly_degree(8)
//!         .set_plain_modulus(97u64)
//!         .set_ciph_modulus(0x3fffffff000001u64)
//!         .build()?;
//!
//!     let keygen = BfvKeyGenerator::new(&params)?;
//!     let encoder = BatchEncoder::new(&params)?;
//!     let encryptor = BfvEncryptor::new(&params, keygen.public_key().clone());
//!     let decryptor = BfvDecryptor::new(&params, keygen.secret_key().clone());
//!     let evaluator = BfvEvaluator::new(&params)?;
//!
//!     let values: Vec<BigInt> = (1..=8).map(BigInt::from).collect();
//!     let plaintext = encoder.encode(&values)?;
//!
//!     let ciphertext = encryptor.encrypt(&plaintext)?;
//!     let doubled = evaluator.add(&ciphertext, &ciphertext)?;
//!
//!     let decrypted = decryptor.decrypt(&doubled, None)?;
//!     let decoded = encoder.decode(&decrypted)?;
//!     assert_eq!(decoded[2], BigInt::from(6));
//!
//!     Ok(())
//! }
//! ```
//!
//! The crate implements the cryptographic core only. There is no
//! serialization format, no parameter search, no multi-party protocol
//! support, and no constant-time hardening.

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod bits;
mod ciphertext;
mod crt;
mod decryptor;
mod encoder;
mod encryptor;
mod error;
mod evaluator;
mod fft;
mod key_generator;
mod ntt;
mod number_theory;
mod parameters;
mod plaintext;
mod polynomial;
mod sampling;

pub use bits::{bit_reverse_vec, reverse_bits};
pub use ciphertext::Ciphertext;
pub use crt::CrtContext;
pub use decryptor::{BfvDecryptor, CkksDecryptor};
pub use encoder::{BatchEncoder, CkksEncoder, Encoder, SlotCount};
pub use encryptor::{BfvEncryptor, CkksEncryptor};
pub use error::{Error, Result};
pub use evaluator::{BfvEvaluator, CkksEvaluator, Evaluator};
pub use fft::FftContext;
pub use key_generator::{
	BfvKeyGenerator, CkksKeyGenerator, PublicKey, RelinearizationKey, RotationKey, SecretKey,
	SwitchingKey,
};
pub use ntt::NttContext;
pub use number_theory::{find_generator, is_prime, mod_exp, mod_inv, root_of_unity};
pub use parameters::{BfvParameters, BfvParametersBuilder, CkksParameters, CkksParametersBuilder};
pub use plaintext::Plaintext;
pub use polynomial::Polynomial;
pub use sampling::{
	sample_hamming_weight_vector, sample_random_complex_vector, sample_random_real_vector,
	sample_triangle, sample_uniform,
};
