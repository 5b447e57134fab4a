use monero_kit_ed25519::{Scalar, CompressedPoint, Point, Commitment};

// The group order `l`, little-endian.
#[rustfmt::skip]
const L: [u8; 32] = [
  0xed, 0xd3, 0xf5, 0x5c, 0x1a, 0x63, 0x12, 0x58, 0xd6, 0x9c, 0xf7, 0xa2, 0xde, 0xf9, 0xde, 0x14,
  0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x10,
];

#[test]
fn scalar_read_rejects_unreduced() {
  // `l` itself is the smallest unreduced encoding
  assert!(Scalar::read(&mut L.as_slice()).is_err());

  // `l - 1` is the largest reduced encoding
  let mut l_minus_one = L;
  l_minus_one[0] -= 1;
  let scalar = Scalar::read(&mut l_minus_one.as_slice()).unwrap();
  assert_eq!(scalar.to_bytes(), l_minus_one);

  assert!(Scalar::read(&mut [0xff; 32].as_slice()).is_err());

  // `reduce` accepts anything, reducing it
  assert_eq!(Scalar::reduce(L), Scalar::ZERO);
}

#[test]
fn decompress_rejects_non_canonical() {
  // -0, the identity with the sign bit set
  let mut negative_zero = CompressedPoint::IDENTITY.to_bytes();
  negative_zero[31] |= 1 << 7;
  assert!(CompressedPoint::from_bytes(negative_zero).decompress().is_none());

  // An unreduced y coordinate (y = p, which canonically encodes as y = 0)
  #[rustfmt::skip]
  let unreduced_y = [
    0xed, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x7f,
  ];
  assert!(CompressedPoint::from_bytes(unreduced_y).decompress().is_none());

  // The canonical encodings themselves are fine
  assert!(CompressedPoint::IDENTITY.decompress().is_some());
  assert!(CompressedPoint::G.decompress().is_some());
  assert!(CompressedPoint::H.decompress().is_some());
}

#[test]
fn hash_to_point_lies_in_prime_order_subgroup() {
  for preimage in [[0; 32], [1; 32], CompressedPoint::G.to_bytes(), CompressedPoint::H.to_bytes()]
  {
    let point = Point::hash_to_point(preimage);
    // The identity/torsion filter used for key images must accept any hashed point
    assert!(point.key_image().is_some());
    // Determinism
    assert_eq!(point, Point::hash_to_point(preimage));
  }
  assert!(Point::hash_to_point([0; 32]) != Point::hash_to_point([1; 32]));
}

#[test]
fn commitment() {
  // A commitment to 0 with a mask of 1 is `G` itself
  assert_eq!(Commitment::zero().calculate().compress(), CompressedPoint::G);

  // A commitment with a mask of 0 is `amount H`
  let five_h = Commitment::new(Scalar::ZERO, 5).calculate();
  let h = CompressedPoint::H.decompress().unwrap();
  assert_eq!(five_h.into(), h.into() + h.into() + h.into() + h.into() + h.into());

  // The opening round-trips through its serialization
  let opening = Commitment::new(Scalar::reduce([0x17; 32]), 123_456_789);
  let mut buf = vec![];
  opening.write(&mut buf).unwrap();
  let read = Commitment::read(&mut buf.as_slice()).unwrap();
  assert!(bool::from(subtle::ConstantTimeEq::ct_eq(&read, &opening)));
}
