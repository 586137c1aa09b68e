//! Decryption of ciphertexts back into plaintexts.

mod bfv;
mod ckks;

pub use bfv::BfvDecryptor;
pub use ckks::CkksDecryptor;
