#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![cfg_attr(not(feature = "std"), no_std)]

use core::fmt;
#[allow(unused_imports)]
use std_shims::prelude::*;
use std_shims::{vec::Vec, string::String};

use zeroize::Zeroize;

use monero_kit_primitives::UpperBound;
use monero_kit_ed25519::{CompressedPoint, Point};

/// Monero's block-oriented Base58 codec.
pub mod base58;

#[cfg(test)]
mod tests;

/// The index of a subaddress.
///
/// Keyed by `(account, address)`, also referred to as `(major, minor)`. The primary address,
/// `(0, 0)`, is not a subaddress and is represented by the lack of a `SubaddressIndex`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Zeroize)]
pub struct SubaddressIndex {
  account: u32,
  address: u32,
}

impl SubaddressIndex {
  /// Create a new `SubaddressIndex`, returning `None` for `(0, 0)` (the primary address).
  pub const fn new(account: u32, address: u32) -> Option<SubaddressIndex> {
    if (account == 0) && (address == 0) {
      return None;
    }
    Some(SubaddressIndex { account, address })
  }

  /// The account this subaddress is under (the major index).
  pub const fn account(&self) -> u32 {
    self.account
  }

  /// The address this subaddress is, within its account (the minor index).
  pub const fn address(&self) -> u32 {
    self.address
  }
}

/// The Monero network an address is for.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Zeroize)]
pub enum Network {
  /// The production network.
  Mainnet,
  /// The staging network, tracking mainnet's protocol.
  Stagenet,
  /// The test network.
  Testnet,
}

/// The type of a Monero address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Zeroize)]
pub enum AddressType {
  /// A standard address, the wallet's primary address.
  Standard,
  /// A standard address carrying an 8-byte payment ID.
  Integrated([u8; 8]),
  /// A subaddress.
  Subaddress,
}

impl AddressType {
  const fn prefix(self, network: Network) -> u8 {
    match (network, self) {
      (Network::Mainnet, AddressType::Standard) => 18,
      (Network::Mainnet, AddressType::Integrated(_)) => 19,
      (Network::Mainnet, AddressType::Subaddress) => 42,
      (Network::Stagenet, AddressType::Standard) => 24,
      (Network::Stagenet, AddressType::Integrated(_)) => 25,
      (Network::Stagenet, AddressType::Subaddress) => 36,
      (Network::Testnet, AddressType::Standard) => 53,
      (Network::Testnet, AddressType::Integrated(_)) => 54,
      (Network::Testnet, AddressType::Subaddress) => 63,
    }
  }

  fn from_prefix(prefix: u8) -> Option<(Network, bool, bool)> {
    // (network, is_integrated, is_subaddress)
    Some(match prefix {
      18 => (Network::Mainnet, false, false),
      19 => (Network::Mainnet, true, false),
      42 => (Network::Mainnet, false, true),
      24 => (Network::Stagenet, false, false),
      25 => (Network::Stagenet, true, false),
      36 => (Network::Stagenet, false, true),
      53 => (Network::Testnet, false, false),
      54 => (Network::Testnet, true, false),
      63 => (Network::Testnet, false, true),
      _ => None?,
    })
  }
}

/// Errors when working with Monero addresses.
#[derive(Clone, Copy, PartialEq, Eq, Debug, thiserror::Error)]
pub enum AddressError {
  /// The Base58 encoding was invalid.
  #[error("invalid encoding")]
  InvalidEncoding,
  /// The checksum did not match the data.
  #[error("invalid checksum")]
  InvalidChecksum,
  /// The address wasn't of the expected length for its type.
  #[error("invalid length")]
  InvalidLength,
  /// The prefix byte didn't name a known network and type.
  #[error("unknown prefix byte ({0})")]
  UnknownPrefix(u8),
  /// The address was for a different network than expected.
  #[error("different network (expected {expected:?}, actual {actual:?})")]
  DifferentNetwork {
    /// The network the address was expected to be for.
    expected: Network,
    /// The network the address was actually for.
    actual: Network,
  },
  /// One of the keys wasn't a canonically-encoded point.
  #[error("invalid key")]
  InvalidKey,
}

/// A Monero address.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MoneroAddress {
  network: Network,
  kind: AddressType,
  spend: Point,
  view: Point,
}

impl Zeroize for MoneroAddress {
  fn zeroize(&mut self) {
    self.network.zeroize();
    self.kind.zeroize();
    self.spend.zeroize();
    self.view.zeroize();
  }
}

impl MoneroAddress {
  /// The upper bound for the length of an address string.
  // prefix + spend + view + payment ID, plus the appended checksum, in Base58
  pub const SIZE_UPPER_BOUND: UpperBound<usize> =
    UpperBound(((1 + 32 + 32 + 8 + base58::CHECKSUM_LEN).div_ceil(8) + 1) * 11);

  /// Create a new `MoneroAddress` from its parts.
  pub fn new(network: Network, kind: AddressType, spend: Point, view: Point) -> MoneroAddress {
    MoneroAddress { network, kind, spend, view }
  }

  /// The network this address is for.
  pub fn network(&self) -> Network {
    self.network
  }

  /// The type of this address.
  pub fn kind(&self) -> AddressType {
    self.kind
  }

  /// The public spend key within this address.
  pub fn spend(&self) -> Point {
    self.spend
  }

  /// The public view key within this address.
  pub fn view(&self) -> Point {
    self.view
  }

  /// Whether this address is a subaddress.
  pub fn is_subaddress(&self) -> bool {
    matches!(self.kind, AddressType::Subaddress)
  }

  /// The payment ID within this address, if it's an integrated address.
  pub fn payment_id(&self) -> Option<[u8; 8]> {
    match self.kind {
      AddressType::Integrated(id) => Some(id),
      _ => None,
    }
  }

  fn parse(s: &str) -> Result<MoneroAddress, AddressError> {
    let bytes = base58::decode(s).ok_or(AddressError::InvalidEncoding)?;
    if bytes.len() < base58::CHECKSUM_LEN {
      Err(AddressError::InvalidLength)?;
    }
    // Split the checksum check out of `decode_check` so a mere checksum error is reported as
    // such, not as an encoding error
    let bytes = {
      let checksum_pos = bytes.len() - base58::CHECKSUM_LEN;
      if monero_kit_primitives::keccak256(&bytes[.. checksum_pos])[.. base58::CHECKSUM_LEN] !=
        bytes[checksum_pos ..]
      {
        Err(AddressError::InvalidChecksum)?;
      }
      &bytes[.. checksum_pos]
    };

    if bytes.is_empty() {
      Err(AddressError::InvalidLength)?;
    }
    let (network, integrated, subaddress) =
      AddressType::from_prefix(bytes[0]).ok_or(AddressError::UnknownPrefix(bytes[0]))?;

    let expected_len = 1 + 32 + 32 + if integrated { 8 } else { 0 };
    if bytes.len() != expected_len {
      Err(AddressError::InvalidLength)?;
    }

    let read_key = |offset: usize| -> Result<Point, AddressError> {
      CompressedPoint::from(
        <[u8; 32]>::try_from(&bytes[offset .. (offset + 32)]).expect("slice of 32 wasn't 32 long"),
      )
      .decompress()
      .ok_or(AddressError::InvalidKey)
    };
    let spend = read_key(1)?;
    let view = read_key(33)?;

    let kind = if integrated {
      AddressType::Integrated(
        <[u8; 8]>::try_from(&bytes[65 .. 73]).expect("slice of 8 wasn't 8 long"),
      )
    } else if subaddress {
      AddressType::Subaddress
    } else {
      AddressType::Standard
    };

    Ok(MoneroAddress { network, kind, spend, view })
  }

  /// Parse an address from a string, validating it's for the specified network.
  pub fn from_str(network: Network, s: &str) -> Result<MoneroAddress, AddressError> {
    let res = Self::parse(s)?;
    if res.network != network {
      Err(AddressError::DifferentNetwork { expected: network, actual: res.network })?;
    }
    Ok(res)
  }

  /// Parse an address from a string, without validating its network.
  pub fn from_str_with_unchecked_network(s: &str) -> Result<MoneroAddress, AddressError> {
    Self::parse(s)
  }

  fn encoded(&self) -> String {
    let mut bytes = Vec::with_capacity(1 + 32 + 32 + 8);
    bytes.push(self.kind.prefix(self.network));
    bytes.extend(self.spend.compress().to_bytes());
    bytes.extend(self.view.compress().to_bytes());
    if let AddressType::Integrated(id) = self.kind {
      bytes.extend(id);
    }
    base58::encode_check(bytes)
  }
}

impl fmt::Display for MoneroAddress {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.encoded())
  }
}
