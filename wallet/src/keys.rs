use core::ops::Deref;
#[allow(unused_imports)]
use std_shims::prelude::*;

use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

#[cfg(feature = "compile-time-generators")]
use curve25519_dalek::constants::ED25519_BASEPOINT_TABLE;
#[cfg(not(feature = "compile-time-generators"))]
use curve25519_dalek::constants::ED25519_BASEPOINT_POINT as ED25519_BASEPOINT_TABLE;

use monero_kit::{primitives::keccak256, ed25519::{Scalar, Point}};

use crate::address::{Network, AddressType, SubaddressIndex, MoneroAddress};

/// An error when constructing a view pair.
#[derive(Clone, Copy, PartialEq, Eq, Debug, thiserror::Error)]
pub enum ViewPairError {
  /// The spend key was torsioned, which would corrupt the key image of any received output.
  #[error("torsioned spend key")]
  TorsionedSpendKey,
}

/// The pair of keys necessary to scan: the public spend key and the private view key.
///
/// A `ViewPair` can find incoming outputs and decrypt their amounts, yet cannot spend.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct ViewPair {
  pub(crate) spend: Point,
  pub(crate) view: Zeroizing<Scalar>,
}

impl ViewPair {
  /// Create a new `ViewPair`.
  pub fn new(spend: Point, view: Zeroizing<Scalar>) -> Result<ViewPair, ViewPairError> {
    if spend.key_image().is_none() {
      Err(ViewPairError::TorsionedSpendKey)?;
    }
    Ok(ViewPair { spend, view })
  }

  /// The public spend key.
  pub fn spend(&self) -> Point {
    self.spend
  }

  /// The public view key.
  pub fn view(&self) -> Point {
    Point::from(&(*self.view).into() * ED25519_BASEPOINT_TABLE)
  }

  /// The private view key.
  pub fn view_secret(&self) -> &Zeroizing<Scalar> {
    &self.view
  }

  // H_s("SubAddr\0" || view_secret || account || address)
  pub(crate) fn subaddress_derivation(&self, index: SubaddressIndex) -> Scalar {
    let mut buf = Zeroizing::new(b"SubAddr\0".to_vec());
    buf.extend(self.view.to_bytes());
    buf.extend(index.account().to_le_bytes());
    buf.extend(index.address().to_le_bytes());
    Scalar::hash(buf.as_slice())
  }

  /// The (spend, view) public keys for the specified subaddress.
  pub fn subaddress_keys(&self, index: SubaddressIndex) -> (Point, Point) {
    let spend: curve25519_dalek::EdwardsPoint =
      self.spend.into() + (&self.subaddress_derivation(index).into() * ED25519_BASEPOINT_TABLE);
    let view = (*self.view).into() * spend;
    (Point::from(spend), Point::from(view))
  }

  /// The primary address for this wallet.
  pub fn legacy_address(&self, network: Network) -> MoneroAddress {
    MoneroAddress::new(network, AddressType::Standard, self.spend, self.view())
  }

  /// The integrated address for this wallet, carrying the specified payment ID.
  pub fn legacy_integrated_address(&self, network: Network, payment_id: [u8; 8]) -> MoneroAddress {
    MoneroAddress::new(network, AddressType::Integrated(payment_id), self.spend, self.view())
  }

  /// The specified subaddress for this wallet.
  pub fn subaddress(&self, network: Network, subaddress: SubaddressIndex) -> MoneroAddress {
    let (spend, view) = self.subaddress_keys(subaddress);
    MoneroAddress::new(network, AddressType::Subaddress, spend, view)
  }
}

/// The full key material of a wallet: the private spend key and the view pair derived from it.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyPair {
  spend: Zeroizing<Scalar>,
  view_pair: ViewPair,
}

impl KeyPair {
  /// Derive a wallet's keys from 32 bytes of seed entropy.
  ///
  /// The spend key is the seed reduced to a scalar. The view key is the Keccak-256 hash of the
  /// spend key, reduced to a scalar, making a full wallet recoverable from its seed alone.
  pub fn from_seed(seed: &Zeroizing<[u8; 32]>) -> KeyPair {
    Self::from_spend(Zeroizing::new(Scalar::reduce(**seed)))
  }

  /// Reconstruct a wallet's keys from its private spend key.
  pub fn from_spend(spend: Zeroizing<Scalar>) -> KeyPair {
    let view = Zeroizing::new(Scalar::reduce(keccak256(spend.to_bytes())));

    let spend_pub = Point::from(&(*spend).into() * ED25519_BASEPOINT_TABLE);
    KeyPair {
      spend,
      view_pair: ViewPair::new(spend_pub, view)
        .expect("prime-order point (sG) was somehow torsioned"),
    }
  }

  /// The private spend key.
  pub fn spend_secret(&self) -> &Zeroizing<Scalar> {
    &self.spend
  }

  /// The private view key.
  pub fn view_secret(&self) -> &Zeroizing<Scalar> {
    &self.view_pair.view
  }

  /// The view pair for this wallet, sufficient for scanning.
  pub fn view_pair(&self) -> &ViewPair {
    &self.view_pair
  }

  /// The one-time private key for an output scanned with the specified key offset.
  ///
  /// The offset is the scalar the scanner recovered, the sum of the shared-key derivation and
  /// (for subaddresses) the subaddress derivation.
  pub fn one_time_key(&self, key_offset: Scalar) -> Zeroizing<Scalar> {
    Zeroizing::new(Scalar::from((*self.spend).into() + key_offset.into()))
  }
}

#[cfg(test)]
mod tests {
  use rand_core::{RngCore, OsRng};
  use super::*;

  fn keys() -> KeyPair {
    let mut seed = Zeroizing::new([0; 32]);
    OsRng.fill_bytes(seed.as_mut());
    KeyPair::from_seed(&seed)
  }

  #[test]
  fn view_key_derivation() {
    let seed = Zeroizing::new([0x42; 32]);
    let a = KeyPair::from_seed(&seed);
    let b = KeyPair::from_seed(&seed);
    // The view key is a pure function of the spend key
    assert_eq!(a.view_secret().deref(), b.view_secret().deref());
    assert_eq!(
      a.view_pair().legacy_address(Network::Mainnet),
      b.view_pair().legacy_address(Network::Mainnet),
    );
  }

  #[test]
  fn subaddresses_are_deterministic_and_distinct() {
    let keys = keys();
    let pair = keys.view_pair();

    let index = SubaddressIndex::new(1, 2).unwrap();
    assert_eq!(pair.subaddress_keys(index), pair.subaddress_keys(index));

    let mut addresses = std::collections::HashSet::new();
    addresses.insert(pair.legacy_address(Network::Mainnet).to_string());
    for account in 0 .. 3 {
      for address in 0 .. 3 {
        let Some(index) = SubaddressIndex::new(account, address) else { continue };
        // Each (account, address) yields a distinct address
        assert!(addresses.insert(pair.subaddress(Network::Mainnet, index).to_string()));
      }
    }
  }

  #[test]
  fn subaddress_view_key_relation() {
    let keys = keys();
    let index = SubaddressIndex::new(3, 7).unwrap();
    let (spend, view) = keys.view_pair().subaddress_keys(index);
    // C = v D
    assert_eq!(
      view.into(),
      (*keys.view_secret().deref()).into() * spend.into(),
    );
  }
}
