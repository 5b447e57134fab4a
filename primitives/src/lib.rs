#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![cfg_attr(not(feature = "std"), no_std)]

#[allow(unused_imports)]
use std_shims::prelude::*;

use sha3::{Digest, Keccak256};

/// The Keccak-256 hash function, as used by the Monero protocol.
///
/// This is the pre-standardization Keccak with 10*1 padding (first pad byte 0x01), not
/// NIST's SHA3-256 (whose first pad byte is 0x06). Every hash within the Monero protocol is
/// this function.
pub fn keccak256(data: impl AsRef<[u8]>) -> [u8; 32] {
  Keccak256::digest(data.as_ref()).into()
}

/// An upper bound on some value.
///
/// A distinct type so the bound isn't mistakable for the value itself.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct UpperBound<T>(pub T);

#[cfg(test)]
mod tests {
  use super::keccak256;

  // Vectors for the legacy Keccak padding. SHA3-256 yields distinct digests for both inputs,
  // making these sensitive to any padding mixup.
  #[test]
  fn keccak256_vectors() {
    assert_eq!(
      hex::encode(keccak256([])),
      "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470",
    );
    assert_eq!(
      hex::encode(keccak256(b"abc")),
      "4e03657aea45a94fc7d47ba826c8d667c0d1e6e33a64a036ec44f58fa12d6c45",
    );
  }
}
