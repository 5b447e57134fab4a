use std_shims::{
  vec::Vec,
  io::{self, Read, Write},
};

use subtle::{Choice, ConstantTimeEq};
use zeroize::{Zeroize, ZeroizeOnDrop};

use monero_kit_io::*;

use monero_kit_ed25519::{CompressedPoint, Point};

// Rings don't exceed a byte's range, and the wire encodes their length in one
const MAX_RING_LEN: usize = 255;

/// A ring of (output key, commitment) pairs, the signer's position within it, and the offset
/// encoding of the members' positions on the blockchain.
///
/// The first offset is the first member's absolute position; each further offset is the
/// distance from its predecessor. Rings are sorted ascending by position, so every offset past
/// the first is small.
#[derive(Clone, PartialEq, Eq, Debug, Zeroize, ZeroizeOnDrop)]
pub struct Decoys {
  offsets: Vec<u64>,
  signer_index: u8,
  ring: Vec<[Point; 2]>,
}

impl Decoys {
  /// Create a new `Decoys`, if the arguments are consistent with each other.
  pub fn new(offsets: Vec<u64>, signer_index: u8, ring: Vec<[Point; 2]>) -> Option<Decoys> {
    let consistent = (!ring.is_empty()) &&
      (ring.len() <= MAX_RING_LEN) &&
      (offsets.len() == ring.len()) &&
      (usize::from(signer_index) < ring.len());
    consistent.then(|| Decoys { offsets, signer_index, ring })
  }

  /// The amount of members within this ring.
  #[allow(clippy::len_without_is_empty)]
  pub fn len(&self) -> usize {
    self.ring.len()
  }

  /// The offset encoding of the ring members' positions.
  pub fn offsets(&self) -> &[u64] {
    &self.offsets
  }

  /// The absolute positions of the ring members on the blockchain.
  pub fn positions(&self) -> Vec<u64> {
    self
      .offsets
      .iter()
      .scan(0, |position, offset| {
        *position += offset;
        Some(*position)
      })
      .collect()
  }

  /// The position of the signer within the ring.
  pub fn signer_index(&self) -> u8 {
    self.signer_index
  }

  /// The ring itself.
  pub fn ring(&self) -> &[[Point; 2]] {
    &self.ring
  }

  /// The (output key, commitment) pair being signed for.
  pub fn signer_ring_members(&self) -> [Point; 2] {
    self.ring[usize::from(self.signer_index)]
  }

  /// Compare in constant time.
  ///
  /// The ring and its offsets are public once published, yet the signer's index never is.
  pub fn ct_eq(&self, other: &Self) -> Choice {
    if (self.offsets.len() != other.offsets.len()) || (self.ring.len() != other.ring.len()) {
      return Choice::from(0);
    }
    let mut eq = self.signer_index.ct_eq(&other.signer_index);
    eq &= self.offsets.as_slice().ct_eq(other.offsets.as_slice());
    for (ours, theirs) in self.ring.iter().zip(&other.ring) {
      eq &= ours[0].ct_eq(&theirs[0]) & ours[1].ct_eq(&theirs[1]);
    }
    eq
  }

  /// Write the `Decoys`.
  ///
  /// This layout is solely this library's, not a Monero protocol serialization, and may run in
  /// time variable to its value.
  pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
    write_list(|offset, w| write_varint(*offset, w), &self.offsets, w)?;
    write_byte(&self.signer_index, w)?;
    write_list(
      |member: &[Point; 2], w| {
        member[0].compress().write(w)?;
        member[1].compress().write(w)
      },
      &self.ring,
      w,
    )
  }

  /// Serialize the `Decoys` to a `Vec<u8>`.
  pub fn serialize(&self) -> Vec<u8> {
    let mut buf = Vec::with_capacity(2 + self.offsets.len() + (64 * self.ring.len()));
    self.write(&mut buf).expect("writing to a Vec cannot fail");
    buf
  }

  /// Read a `Decoys`.
  pub fn read<R: Read>(r: &mut R) -> io::Result<Decoys> {
    let read_member = |r: &mut R| {
      let key =
        CompressedPoint::read(r)?.decompress().ok_or_else(|| io::Error::other("invalid ring key"));
      let commitment = CompressedPoint::read(r)?
        .decompress()
        .ok_or_else(|| io::Error::other("invalid ring commitment"));
      Ok([key?, commitment?])
    };

    Decoys::new(
      read_list(read_varint, MAX_RING_LEN, r)?,
      read_byte(r)?,
      read_list(read_member, MAX_RING_LEN, r)?,
    )
    .ok_or_else(|| io::Error::other("inconsistent Decoys"))
  }
}
