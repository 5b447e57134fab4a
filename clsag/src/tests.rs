use rand_core::{RngCore, OsRng};

use zeroize::Zeroizing;

use curve25519_dalek::constants::ED25519_BASEPOINT_POINT;

use monero_kit_ed25519::{Scalar, Point, Commitment};

use crate::{Decoys, ClsagContext, ClsagError, Clsag};

const RING_LEN: usize = 16;
const AMOUNT: u64 = 1337;

fn random_point() -> Point {
  Point::from(Scalar::random(&mut OsRng).into() * ED25519_BASEPOINT_POINT)
}

// Build a ring with the signer at a random position, returning (secret, context).
fn setup() -> (Zeroizing<Scalar>, Commitment, ClsagContext) {
  let real = usize::try_from(OsRng.next_u64() % u64::try_from(RING_LEN).unwrap()).unwrap();

  let secret = Zeroizing::new(Scalar::random(&mut OsRng));
  let commitment = Commitment::new(Scalar::random(&mut OsRng), AMOUNT);

  let mut ring = Vec::with_capacity(RING_LEN);
  for i in 0 .. RING_LEN {
    if i == real {
      ring.push([
        Point::from(secret.into() * ED25519_BASEPOINT_POINT),
        commitment.calculate(),
      ]);
    } else {
      ring.push([random_point(), random_point()]);
    }
  }

  let offsets = (1 ..= u64::try_from(RING_LEN).unwrap()).collect::<Vec<_>>();
  let decoys = Decoys::new(offsets, u8::try_from(real).unwrap(), ring).unwrap();
  let context = ClsagContext::new(decoys, commitment.clone()).unwrap();
  (secret, commitment, context)
}

#[test]
fn completeness() {
  let (secret, _, context) = setup();
  let msg = {
    let mut msg = [0; 32];
    OsRng.fill_bytes(&mut msg);
    msg
  };

  let image = Point::from(
    secret.into() *
      Point::hash_to_point(context.decoys().signer_ring_members()[0].compress().to_bytes()).into(),
  );

  let sum_outputs = Scalar::random(&mut OsRng);
  let ring = context.decoys().ring().to_vec();
  let (clsag, pseudo_out) =
    Clsag::sign(&mut OsRng, vec![(secret, context)], sum_outputs, msg).unwrap().swap_remove(0);

  clsag.verify(&ring, &image.compress(), &pseudo_out, &msg).unwrap();

  // Round-trip the signature through its serialization
  let mut buf = vec![];
  clsag.write(&mut buf).unwrap();
  let read = Clsag::read(RING_LEN, &mut buf.as_slice()).unwrap();
  assert_eq!(read, clsag);
  read.verify(&ring, &image.compress(), &pseudo_out, &msg).unwrap();
}

#[test]
fn soundness() {
  let (secret, _, context) = setup();
  let msg = [0x42; 32];

  let image = Point::from(
    secret.into() *
      Point::hash_to_point(context.decoys().signer_ring_members()[0].compress().to_bytes()).into(),
  );

  let sum_outputs = Scalar::random(&mut OsRng);
  let ring = context.decoys().ring().to_vec();
  let (clsag, pseudo_out) =
    Clsag::sign(&mut OsRng, vec![(secret, context)], sum_outputs, msg).unwrap().swap_remove(0);

  // A single bit flipped within c1 fails
  {
    let mut tampered = clsag.clone();
    let mut c1 = tampered.c1.to_bytes();
    c1[0] ^= 1;
    tampered.c1 = Scalar::read(&mut c1.as_slice()).unwrap();
    assert_eq!(
      tampered.verify(&ring, &image.compress(), &pseudo_out, &msg),
      Err(ClsagError::InvalidC1),
    );
  }

  // Swapping any two responses fails
  for i in 0 .. RING_LEN {
    let mut tampered = clsag.clone();
    tampered.s.swap(i, (i + 1) % RING_LEN);
    if tampered.s == clsag.s {
      continue;
    }
    assert!(tampered.verify(&ring, &image.compress(), &pseudo_out, &msg).is_err());
  }

  // A differing message fails
  assert!(clsag.verify(&ring, &image.compress(), &pseudo_out, &[0x43; 32]).is_err());

  // A torsioned/identity key image fails
  assert_eq!(
    clsag.verify(
      &ring,
      &monero_kit_ed25519::CompressedPoint::IDENTITY,
      &pseudo_out,
      &msg,
    ),
    Err(ClsagError::InvalidImage),
  );
}

#[test]
fn key_image_determinism() {
  let secret = Zeroizing::new(Scalar::random(&mut OsRng));
  let key = Point::from(secret.into() * ED25519_BASEPOINT_POINT);

  let image = |point: Point| {
    Point::from(secret.into() * Point::hash_to_point(point.compress().to_bytes()).into())
  };

  // Two derivations for the same output agree
  assert_eq!(image(key), image(key));
  // Distinct outputs under the same key yield distinct images
  assert!(image(key) != image(random_point()));
}

#[test]
fn rejects_wrong_key() {
  let (_, _, context) = setup();
  let wrong = Zeroizing::new(Scalar::random(&mut OsRng));
  assert_eq!(
    Clsag::sign(&mut OsRng, vec![(wrong, context)], Scalar::random(&mut OsRng), [0; 32])
      .map(|_| ()),
    Err(ClsagError::InvalidKey),
  );
}
