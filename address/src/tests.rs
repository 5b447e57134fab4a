use rand_core::OsRng;

use monero_kit_ed25519::{Scalar, Point};

use crate::*;

fn random_point() -> Point {
  Point::from(Scalar::random(&mut OsRng).into() * curve25519_dalek::constants::ED25519_BASEPOINT_POINT)
}

#[test]
fn mainnet_standard_vector() {
  let addr = MoneroAddress::from_str(
    Network::Mainnet,
    "44AFFq5kSiGBoZ4NMDwYtN18obc8AemS33DBLWs3H7otXft3XjrpDtQGv7SqSsaBYBb98uNbr2VBBEt7f2wfn3RVGQBEP3A",
  )
  .unwrap();
  assert_eq!(addr.network(), Network::Mainnet);
  assert_eq!(addr.kind(), AddressType::Standard);
  assert!(!addr.is_subaddress());
  assert!(addr.payment_id().is_none());
  assert_eq!(
    addr.to_string(),
    "44AFFq5kSiGBoZ4NMDwYtN18obc8AemS33DBLWs3H7otXft3XjrpDtQGv7SqSsaBYBb98uNbr2VBBEt7f2wfn3RVGQBEP3A",
  );
}

#[test]
fn round_trips() {
  for network in [Network::Mainnet, Network::Stagenet, Network::Testnet] {
    for kind in [AddressType::Standard, AddressType::Integrated([0xab; 8]), AddressType::Subaddress]
    {
      let spend = random_point();
      let view = random_point();
      let addr = MoneroAddress::new(network, kind, spend, view);
      let encoded = addr.to_string();
      // Standard/subaddress encodings on mainnet are 95 characters, integrated 106
      if network == Network::Mainnet {
        assert_eq!(
          encoded.len(),
          if matches!(kind, AddressType::Integrated(_)) { 106 } else { 95 }
        );
      }
      let parsed = MoneroAddress::from_str(network, &encoded).unwrap();
      assert_eq!(parsed.network(), network);
      assert_eq!(parsed.kind(), kind);
      assert_eq!(parsed.spend(), spend);
      assert_eq!(parsed.view(), view);
    }
  }
}

#[test]
fn rejections() {
  let addr =
    MoneroAddress::new(Network::Mainnet, AddressType::Standard, random_point(), random_point());
  let encoded = addr.to_string();

  // Tampering a character fails the checksum (or the encoding, if it leaves the alphabet)
  let mut tampered = encoded.clone().into_bytes();
  tampered[20] = if tampered[20] == b'2' { b'3' } else { b'2' };
  let res = MoneroAddress::from_str(Network::Mainnet, core::str::from_utf8(&tampered).unwrap());
  assert!(matches!(
    res,
    Err(AddressError::InvalidChecksum | AddressError::InvalidEncoding | AddressError::InvalidLength)
  ));

  // The wrong network is rejected
  assert!(matches!(
    MoneroAddress::from_str(Network::Testnet, &encoded),
    Err(AddressError::DifferentNetwork { .. })
  ));
  // Yet accepted when explicitly unchecked
  assert!(MoneroAddress::from_str_with_unchecked_network(&encoded).is_ok());
}

#[test]
fn subaddress_index() {
  assert!(SubaddressIndex::new(0, 0).is_none());
  let index = SubaddressIndex::new(1, 2).unwrap();
  assert_eq!(index.account(), 1);
  assert_eq!(index.address(), 2);
}
