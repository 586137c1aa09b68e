//! Scheme parameter objects.
//!
//! Parameters are immutable value objects created through builders.
//! Picking them well is a balance the library does not automate: the
//! ring degree and moduli determine both the noise margin available to
//! homomorphic operations and the security level, and the callers are
//! expected to bring vetted choices.

mod bfv;
mod ckks;

pub use bfv::{BfvParameters, BfvParametersBuilder};
pub use ckks::{CkksParameters, CkksParametersBuilder};
