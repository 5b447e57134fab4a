use std_shims::{sync::LazyLock, vec::Vec};

use curve25519_dalek::EdwardsPoint;

use monero_kit_io::write_varint;
use monero_kit_ed25519::{CompressedPoint, Point};

use crate::{COMMITMENT_BITS, MAX_COMMITMENTS};

/// The maximum amount of rows within an aggregated proof's vectors.
pub(crate) const MAX_MN: usize = MAX_COMMITMENTS * COMMITMENT_BITS;

pub(crate) struct Generators {
  pub(crate) G: Vec<EdwardsPoint>,
  pub(crate) H: Vec<EdwardsPoint>,
}

// The generators are a deterministic hash-to-point stream seeded by `H` and a domain tag, so
// no generator has a known discrete logarithm relative to any other.
pub(crate) static GENERATORS: LazyLock<Generators> = LazyLock::new(|| {
  let mut res =
    Generators { G: Vec::with_capacity(MAX_MN), H: Vec::with_capacity(MAX_MN) };

  const DST: &[u8] = b"bulletproof_plus";
  for i in 0 .. MAX_MN {
    let i = 2 * i;

    let mut even = CompressedPoint::H.to_bytes().to_vec();
    even.extend(DST);
    let mut odd = even.clone();

    write_varint(i, &mut even).expect("writing to a Vec cannot fail");
    write_varint(i + 1, &mut odd).expect("writing to a Vec cannot fail");
    res.H.push(Point::hash_to_point(monero_kit_primitives::keccak256(&even)).into());
    res.G.push(Point::hash_to_point(monero_kit_primitives::keccak256(&odd)).into());
  }

  res
});
