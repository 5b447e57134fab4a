//! The encrypted wallet file.
//!
//! The envelope is `"MONE" || version || salt || nonce || ciphertext`, the ciphertext being the
//! ChaCha20-Poly1305 sealing of the wallet's canonical serialization under an Argon2id-derived
//! key. A wrong password is indistinguishable from a tampered file: both fail the AEAD tag.

use core::ops::Deref;
use std_shims::{
  vec,
  vec::Vec,
  string::String,
  io::{self, Read, Write},
};

use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};
use rand_core::{RngCore, CryptoRng};

use chacha20poly1305::{
  aead::{Aead, KeyInit},
  ChaCha20Poly1305, Key, Nonce,
};
use argon2::{Algorithm, Argon2, Params, Version};

use monero_kit::{io::*, ed25519::Scalar};

use crate::{
  address::Network,
  keys::{ViewPair, KeyPair},
  storage::{OwnedOutput, TransactionRecord},
};

const MAGIC: [u8; 4] = *b"MONE";
const VERSION: u8 = 1;

const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 12;

// Argon2id parameters: 64 MiB, 3 iterations, 4 lanes
const ARGON2_MEMORY_KIB: u32 = 64 * 1024;
const ARGON2_ITERATIONS: u32 = 3;
const ARGON2_LANES: u32 = 4;

/// An error when working with wallet files.
#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum WalletFileError {
  /// The file didn't begin with the expected magic.
  #[error("not a wallet file")]
  InvalidMagic,
  /// The file was for an unsupported format version.
  #[error("unsupported wallet file version ({0})")]
  UnsupportedVersion(u8),
  /// The file was truncated.
  #[error("truncated wallet file")]
  Truncated,
  /// The password was wrong (or the file was tampered with).
  #[error("invalid password")]
  InvalidPassword,
  /// The key derivation function failed.
  #[error("key derivation failure")]
  KeyDerivation,
  /// The decrypted contents were malformed.
  #[error("malformed wallet file contents")]
  Malformed,
}

/// The key material within a wallet file.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub enum WalletKeys {
  /// A full wallet, holding the spend key (the view key being derived from it).
  Full(KeyPair),
  /// A view-only wallet, holding solely the view key and the public spend key.
  ViewOnly(ViewPair),
}

impl WalletKeys {
  /// The view pair for these keys, sufficient for scanning.
  pub fn view_pair(&self) -> &ViewPair {
    match self {
      WalletKeys::Full(keys) => keys.view_pair(),
      WalletKeys::ViewOnly(pair) => pair,
    }
  }
}

/// A label for a subaddress.
#[derive(Clone, PartialEq, Eq, Debug, Zeroize)]
pub struct SubaddressLabel {
  /// The account (major) index.
  pub account: u32,
  /// The address (minor) index.
  pub address: u32,
  /// The user's label.
  pub label: String,
}

/// An entry within the wallet's address book.
#[derive(Clone, PartialEq, Eq, Debug, Zeroize)]
pub struct AddressBookEntry {
  /// The address, as a string.
  pub address: String,
  /// The user's label for it.
  pub label: String,
}

/// The contents of a wallet file.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct WalletFile {
  /// The network this wallet is for.
  pub network: Network,
  /// The wallet's key material.
  pub keys: WalletKeys,
  /// The labels assigned to subaddresses.
  pub subaddress_labels: Vec<SubaddressLabel>,
  /// The wallet's owned outputs.
  pub outputs: Vec<OwnedOutput>,
  /// The wallet's transaction history.
  pub transactions: Vec<TransactionRecord>,
  /// The wallet's address book.
  pub address_book: Vec<AddressBookEntry>,
  /// The height the wallet has synchronized through.
  pub sync_height: u64,
}

fn derive_key(password: &[u8], salt: &[u8; SALT_LEN]) -> Result<Zeroizing<[u8; 32]>, WalletFileError> {
  let params = Params::new(ARGON2_MEMORY_KIB, ARGON2_ITERATIONS, ARGON2_LANES, Some(32))
    .map_err(|_| WalletFileError::KeyDerivation)?;
  let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

  let mut key = Zeroizing::new([0; 32]);
  argon2
    .hash_password_into(password, salt, key.as_mut())
    .map_err(|_| WalletFileError::KeyDerivation)?;
  Ok(key)
}

fn write_string<W: Write>(s: &str, w: &mut W) -> io::Result<()> {
  write_list(write_byte, s.as_bytes(), w)
}

fn read_string<R: Read>(r: &mut R) -> io::Result<String> {
  String::from_utf8(read_list(read_byte, 65536, r)?)
    .map_err(|_| io::Error::other("non-UTF-8 string"))
}

impl WalletFile {
  fn write_plaintext<W: Write>(&self, w: &mut W) -> io::Result<()> {
    write_byte(
      &match self.network {
        Network::Mainnet => 0,
        Network::Stagenet => 1,
        Network::Testnet => 2,
      },
      w,
    )?;

    match &self.keys {
      WalletKeys::Full(keys) => {
        write_byte(&0, w)?;
        keys.spend_secret().write(w)?;
      }
      WalletKeys::ViewOnly(pair) => {
        write_byte(&1, w)?;
        pair.spend().compress().write(w)?;
        pair.view_secret().write(w)?;
      }
    }

    write_list(
      |label: &SubaddressLabel, w| {
        w.write_all(&label.account.to_le_bytes())?;
        w.write_all(&label.address.to_le_bytes())?;
        write_string(&label.label, w)
      },
      &self.subaddress_labels,
      w,
    )?;
    write_list(OwnedOutput::write, &self.outputs, w)?;
    write_list(TransactionRecord::write, &self.transactions, w)?;
    write_list(
      |entry: &AddressBookEntry, w| {
        write_string(&entry.address, w)?;
        write_string(&entry.label, w)
      },
      &self.address_book,
      w,
    )?;
    w.write_all(&self.sync_height.to_le_bytes())
  }

  fn read_plaintext<R: Read>(r: &mut R) -> io::Result<WalletFile> {
    let network = match read_byte(r)? {
      0 => Network::Mainnet,
      1 => Network::Stagenet,
      2 => Network::Testnet,
      _ => Err(io::Error::other("unknown network"))?,
    };

    let keys = match read_byte(r)? {
      0 => {
        let spend = Zeroizing::new(Scalar::read(r)?);
        WalletKeys::Full(KeyPair::from_spend(spend))
      }
      1 => {
        let spend = monero_kit::ed25519::CompressedPoint::read(r)?
          .decompress()
          .ok_or_else(|| io::Error::other("invalid spend key"))?;
        let view = Zeroizing::new(Scalar::read(r)?);
        WalletKeys::ViewOnly(
          ViewPair::new(spend, view).map_err(|_| io::Error::other("torsioned spend key"))?,
        )
      }
      _ => Err(io::Error::other("unknown key material kind"))?,
    };

    Ok(WalletFile {
      network,
      keys,
      subaddress_labels: read_list(
        |r| {
          Ok(SubaddressLabel {
            account: read_u32(r)?,
            address: read_u32(r)?,
            label: read_string(r)?,
          })
        },
        65536,
        r,
      )?,
      outputs: read_list(OwnedOutput::read, 1 << 24, r)?,
      transactions: read_list(TransactionRecord::read, 1 << 24, r)?,
      address_book: read_list(
        |r| Ok(AddressBookEntry { address: read_string(r)?, label: read_string(r)? }),
        65536,
        r,
      )?,
      sync_height: read_u64(r)?,
    })
  }

  /// Seal this wallet into its encrypted file format.
  pub fn seal<R: RngCore + CryptoRng>(
    &self,
    rng: &mut R,
    password: &[u8],
  ) -> Result<Vec<u8>, WalletFileError> {
    let mut salt = [0; SALT_LEN];
    rng.fill_bytes(&mut salt);
    let mut nonce = [0; NONCE_LEN];
    rng.fill_bytes(&mut nonce);

    let key = derive_key(password, &salt)?;
    let cipher = ChaCha20Poly1305::new(Key::from_slice(key.deref()));

    let plaintext = {
      let mut plaintext = vec![];
      self
        .write_plaintext(&mut plaintext)
        .expect("writing to a Vec cannot fail");
      Zeroizing::new(plaintext)
    };

    let ciphertext = cipher
      .encrypt(Nonce::from_slice(&nonce), plaintext.as_slice())
      .expect("ChaCha20-Poly1305 encryption of an in-memory wallet failed");

    let mut res = Vec::with_capacity(4 + 1 + SALT_LEN + NONCE_LEN + ciphertext.len());
    res.extend(MAGIC);
    res.push(VERSION);
    res.extend(salt);
    res.extend(nonce);
    res.extend(ciphertext);
    Ok(res)
  }

  /// Open an encrypted wallet file.
  pub fn open(bytes: &[u8], password: &[u8]) -> Result<WalletFile, WalletFileError> {
    if bytes.len() < 4 {
      Err(WalletFileError::InvalidMagic)?;
    }
    if bytes[.. 4] != MAGIC {
      Err(WalletFileError::InvalidMagic)?;
    }
    let bytes = &bytes[4 ..];

    let Some(version) = bytes.first() else { Err(WalletFileError::Truncated)? };
    if *version != VERSION {
      Err(WalletFileError::UnsupportedVersion(*version))?;
    }
    let bytes = &bytes[1 ..];

    if bytes.len() < (SALT_LEN + NONCE_LEN + 16) {
      Err(WalletFileError::Truncated)?;
    }
    let salt: [u8; SALT_LEN] =
      bytes[.. SALT_LEN].try_into().expect("slice of SALT_LEN wasn't SALT_LEN long");
    let nonce: [u8; NONCE_LEN] = bytes[SALT_LEN .. (SALT_LEN + NONCE_LEN)]
      .try_into()
      .expect("slice of NONCE_LEN wasn't NONCE_LEN long");
    let ciphertext = &bytes[(SALT_LEN + NONCE_LEN) ..];

    let key = derive_key(password, &salt)?;
    let cipher = ChaCha20Poly1305::new(Key::from_slice(key.deref()));

    // An AEAD tag failure means the key (and so the password) was wrong, or the file was
    // tampered with; the two are indistinguishable
    let plaintext = Zeroizing::new(
      cipher
        .decrypt(Nonce::from_slice(&nonce), ciphertext)
        .map_err(|_| WalletFileError::InvalidPassword)?,
    );

    let mut reader = plaintext.as_slice();
    let res = Self::read_plaintext(&mut reader).map_err(|_| WalletFileError::Malformed)?;
    if !reader.is_empty() {
      Err(WalletFileError::Malformed)?;
    }
    Ok(res)
  }
}
