//! Encryption of plaintexts into ciphertexts.

mod bfv;
mod ckks;

pub use bfv::BfvEncryptor;
pub use ckks::CkksEncryptor;
