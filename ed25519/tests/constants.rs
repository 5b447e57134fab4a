use curve25519_dalek::{constants::ED25519_BASEPOINT_POINT, edwards::CompressedEdwardsY};

use monero_kit_primitives::keccak256;
use monero_kit_ed25519::{Scalar, CompressedPoint};

#[test]
fn inv_eight() {
  assert_eq!(Scalar::inv_eight().into(), curve25519_dalek::Scalar::from(8u8).invert());
  // 8 * 8^-1 == 1
  assert_eq!(
    Scalar::inv_eight().into() * curve25519_dalek::Scalar::from(8u8),
    Scalar::ONE.into(),
  );
}

#[test]
fn generators() {
  assert_eq!(
    CompressedPoint::G,
    CompressedPoint::from_bytes(ED25519_BASEPOINT_POINT.compress().to_bytes()),
  );

  // H is defined as `8 * decompress(keccak256(G))`
  let h = CompressedEdwardsY(keccak256(ED25519_BASEPOINT_POINT.compress().to_bytes()))
    .decompress()
    .expect("known on-curve point wasn't on-curve")
    .mul_by_cofactor();
  assert_eq!(CompressedPoint::H, CompressedPoint::from_bytes(h.compress().to_bytes()));
}
