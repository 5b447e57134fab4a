//! Monero's block-oriented Base58.
//!
//! Unlike Bitcoin's Base58, which treats the entire payload as one big-endian integer, Monero
//! partitions the payload into 8-byte blocks. Each full block encodes to exactly 11 characters,
//! making the encoding fixed-width and O(n).

#[allow(unused_imports)]
use std_shims::prelude::*;
use std_shims::{vec::Vec, string::String};

use monero_kit_primitives::keccak256;

/// The Base58 alphabet, omitting the visually-ambiguous `0`, `O`, `I`, and `l`.
pub const ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

const FULL_BLOCK_SIZE: usize = 8;
const FULL_ENCODED_BLOCK_SIZE: usize = 11;
// The encoded length for a partial block of `n` bytes is `ENCODED_BLOCK_SIZES[n]`.
const ENCODED_BLOCK_SIZES: [usize; FULL_BLOCK_SIZE + 1] = [0, 2, 3, 5, 6, 7, 9, 10, 11];

/// The length of the checksum appended by [`encode_check`].
pub const CHECKSUM_LEN: usize = 4;

fn decode_char(c: u8) -> Option<u64> {
  // The alphabet is sorted, so a binary search suffices
  ALPHABET.binary_search(&c).ok().map(|pos| u64::try_from(pos).expect("alphabet exceeded 2^64"))
}

fn encode_block(block: &[u8], into: &mut String) {
  debug_assert!((1 ..= FULL_BLOCK_SIZE).contains(&block.len()));

  let mut num = 0u64;
  for byte in block {
    num = (num << 8) | u64::from(*byte);
  }

  let chars = ENCODED_BLOCK_SIZES[block.len()];
  let mut buf = [ALPHABET[0]; FULL_ENCODED_BLOCK_SIZE];
  for char in buf.iter_mut().take(chars).rev() {
    *char = ALPHABET[usize::try_from(num % 58).expect("58 exceeded usize::MAX")];
    num /= 58;
  }
  into.push_str(core::str::from_utf8(&buf[.. chars]).expect("alphabet wasn't ASCII"));
}

fn decode_block(block: &[u8]) -> Option<Vec<u8>> {
  let bytes = ENCODED_BLOCK_SIZES.iter().position(|len| *len == block.len())?;

  let mut num = 0u64;
  for c in block {
    num = num.checked_mul(58)?.checked_add(decode_char(*c)?)?;
  }

  // A partial block whose integer exceeds its byte width is non-canonical
  if (bytes < FULL_BLOCK_SIZE) && (num >> (bytes * 8)) != 0 {
    None?;
  }

  Some(num.to_be_bytes()[(FULL_BLOCK_SIZE - bytes) ..].to_vec())
}

/// Encode bytes to Base58.
pub fn encode(bytes: &[u8]) -> String {
  let mut res = String::with_capacity(bytes.len().div_ceil(FULL_BLOCK_SIZE) * 11);
  for block in bytes.chunks(FULL_BLOCK_SIZE) {
    encode_block(block, &mut res);
  }
  res
}

/// Decode bytes from Base58.
///
/// This returns `None` on characters outside the alphabet, on a trailing partial block of an
/// invalid length, and on blocks exceeding their byte width.
pub fn decode(encoded: &str) -> Option<Vec<u8>> {
  let encoded = encoded.as_bytes();
  let mut res = Vec::with_capacity((encoded.len() / FULL_ENCODED_BLOCK_SIZE) * FULL_BLOCK_SIZE);
  for block in encoded.chunks(FULL_ENCODED_BLOCK_SIZE) {
    res.extend(decode_block(block)?);
  }
  Some(res)
}

/// Encode bytes to Base58, appending the first four bytes of their Keccak-256 hash as a checksum.
pub fn encode_check(mut bytes: Vec<u8>) -> String {
  let checksum = keccak256(&bytes);
  bytes.extend(&checksum[.. CHECKSUM_LEN]);
  let res = encode(&bytes);
  bytes.truncate(bytes.len() - CHECKSUM_LEN);
  res
}

/// Decode Base58 bytes whose last four bytes are the leading bytes of their Keccak-256 hash.
///
/// This returns `None` if [`decode`] does, or if the checksum doesn't match.
pub fn decode_check(encoded: &str) -> Option<Vec<u8>> {
  let mut bytes = decode(encoded)?;
  if bytes.len() < CHECKSUM_LEN {
    None?;
  }

  let checksum_pos = bytes.len() - CHECKSUM_LEN;
  if keccak256(&bytes[.. checksum_pos])[.. CHECKSUM_LEN] != bytes[checksum_pos ..] {
    None?;
  }
  bytes.truncate(checksum_pos);
  Some(bytes)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn round_trip() {
    for len in 0 .. 64 {
      let bytes = (0 .. len).map(|i| u8::try_from(i).unwrap().wrapping_mul(37)).collect::<Vec<_>>();
      assert_eq!(decode(&encode(&bytes)).unwrap(), bytes);
      assert_eq!(decode_check(&encode_check(bytes.clone())).unwrap(), bytes);
    }
  }

  #[test]
  fn encoded_lengths() {
    // Each full 8-byte block is exactly 11 characters
    assert_eq!(encode(&[0xff; 8]).len(), 11);
    assert_eq!(encode(&[0xff; 16]).len(), 22);
    // The partial-block table
    for (bytes, chars) in [(1, 2), (2, 3), (3, 5), (4, 6), (5, 7), (6, 9), (7, 10)] {
      assert_eq!(encode(&vec![0xff; bytes]).len(), chars);
    }
  }

  #[test]
  fn rejections() {
    // Characters outside the alphabet
    assert!(decode("0").is_none());
    assert!(decode("O").is_none());
    assert!(decode("I").is_none());
    assert!(decode("l").is_none());
    // An invalid partial-block length (no partial block is 1 nor 4 characters)
    assert!(decode("1").is_none());
    assert!(decode("1111").is_none());
    // A partial block exceeding its byte width (2 chars must fit in 1 byte)
    assert!(decode("zz").is_none());
    // A full block exceeding 2^64
    assert!(decode("zzzzzzzzzzz").is_none());

    // Tampering with any character of a checked encoding fails the checksum
    let encoded = encode_check(b"so long and thanks for all the fish".to_vec());
    for i in 0 .. encoded.len() {
      let mut tampered = encoded.clone().into_bytes();
      tampered[i] = if tampered[i] == b'2' { b'3' } else { b'2' };
      let tampered = String::from_utf8(tampered).unwrap();
      assert!(decode_check(&tampered).is_none());
    }
  }
}
