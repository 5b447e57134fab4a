//! The transaction `extra` field.
//!
//! On the wire, `extra` is an arbitrary byte blob. In practice it's a stream of tag-prefixed
//! fields carrying what wallets need to scan: the transaction key (tag 0x01), the per-output
//! additional keys for subaddress sends (0x04), and nonces holding payment IDs or arbitrary
//! data (0x02). Parsing is tolerant: whatever decodes before the first malformed field is
//! used, as Monero's own wallet behaves.

use std_shims::{
  vec,
  vec::Vec,
  io::{self, Write},
};

use zeroize::Zeroize;

use monero_kit::{
  io::*,
  ed25519::{CompressedPoint, Point},
};

// Nonce fields are bounded to 255 bytes, one of which the marker takes
const MAX_NONCE_SIZE: usize = 255;
// A run of padding may span at most this many zero bytes
const MAX_PADDING: usize = 255;

// Markers within a nonce field
const NONCE_UNENCRYPTED_PAYMENT_ID: u8 = 0;
const NONCE_ENCRYPTED_PAYMENT_ID: u8 = 1;
// The highest byte not interpretable as a continued VarInt, claimed for arbitrary data
pub(crate) const ARBITRARY_DATA_MARKER: u8 = 127;

/// The most arbitrary data which fits within one nonce field, past its marker byte.
pub const MAX_ARBITRARY_DATA_SIZE: usize = MAX_NONCE_SIZE - 1;

/// The longest extra current relay rules accept.
pub const MAX_EXTRA_SIZE_BY_RELAY_RULE: usize = 1060;

/// A payment ID, identifying why Monero was sent to the receiver.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Zeroize)]
pub enum PaymentId {
  /// The deprecated 32-byte form, carried in the clear.
  Unencrypted([u8; 32]),
  /// The 8-byte form, XORed with a pad derived from the shared secret.
  Encrypted([u8; 8]),
}

impl PaymentId {
  /// Apply the eight-byte pad, encrypting a decrypted ID or decrypting an encrypted one.
  ///
  /// Unencrypted payment IDs were never masked and pass through unchanged.
  pub fn masked(self, pad: [u8; 8]) -> PaymentId {
    match self {
      PaymentId::Unencrypted(_) => self,
      PaymentId::Encrypted(id) => {
        PaymentId::Encrypted((u64::from_le_bytes(id) ^ u64::from_le_bytes(pad)).to_le_bytes())
      }
    }
  }

  /// Write the `PaymentId`, as the contents of a nonce field.
  pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
    match self {
      PaymentId::Unencrypted(id) => {
        write_byte(&NONCE_UNENCRYPTED_PAYMENT_ID, w)?;
        w.write_all(id)
      }
      PaymentId::Encrypted(id) => {
        write_byte(&NONCE_ENCRYPTED_PAYMENT_ID, w)?;
        w.write_all(id)
      }
    }
  }

  // Parse a nonce field's contents as a payment ID, requiring it be exactly that.
  fn parse(nonce: &[u8]) -> Option<PaymentId> {
    match *nonce.first()? {
      NONCE_UNENCRYPTED_PAYMENT_ID => {
        Some(PaymentId::Unencrypted(nonce[1 ..].try_into().ok()?))
      }
      NONCE_ENCRYPTED_PAYMENT_ID => Some(PaymentId::Encrypted(nonce[1 ..].try_into().ok()?)),
      _ => None,
    }
  }
}

/// One field within an extra.
#[derive(Clone, PartialEq, Eq, Debug, Zeroize)]
pub enum ExtraField {
  /// A run of zero padding, of the contained length.
  Padding(usize),
  /// The transaction key, the commitment to the randomness outputs were derived from.
  PublicKey(CompressedPoint),
  /// A nonce: payment IDs, arbitrary data, or anything else a sender included.
  ///
  /// Reads bound nonces to 255 bytes. The field is directly constructible, so an over-long
  /// nonce can be written yet would not read back.
  Nonce(Vec<u8>),
  /// The merge-mining field within miner transactions.
  MergeMining(u64, [u8; 32]),
  /// The per-output additional transaction keys, present for payments to subaddresses.
  PublicKeys(Vec<CompressedPoint>),
}

impl ExtraField {
  /// Write the `ExtraField`, with its tag.
  pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
    match self {
      ExtraField::Padding(len) => {
        for _ in 0 .. *len {
          write_byte(&0, w)?;
        }
        Ok(())
      }
      ExtraField::PublicKey(key) => {
        write_byte(&1, w)?;
        key.write(w)
      }
      ExtraField::Nonce(nonce) => {
        write_byte(&2, w)?;
        write_list(write_byte, nonce, w)
      }
      ExtraField::MergeMining(depth, merkle_root) => {
        write_byte(&3, w)?;
        write_varint(*depth, w)?;
        w.write_all(merkle_root)
      }
      ExtraField::PublicKeys(keys) => {
        write_byte(&4, w)?;
        write_list(CompressedPoint::write, keys, w)
      }
    }
  }
}

// A cursor over an extra's bytes, parsing field by field.
struct Parser<'a>(&'a [u8]);

impl<'a> Parser<'a> {
  fn byte(&mut self) -> Option<u8> {
    let (byte, rest) = self.0.split_first()?;
    self.0 = rest;
    Some(*byte)
  }

  fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
    if self.0.len() < N {
      return None;
    }
    let (bytes, rest) = self.0.split_at(N);
    self.0 = rest;
    bytes.try_into().ok()
  }

  fn varint(&mut self) -> Option<u64> {
    read_varint(&mut self.0).ok()
  }

  fn field(&mut self) -> Option<ExtraField> {
    match self.byte()? {
      0 => {
        // Padding runs to the first non-zero byte, within its bound
        let mut len = 1;
        while self.0.first() == Some(&0) {
          self.0 = &self.0[1 ..];
          len += 1;
          if len > MAX_PADDING {
            return None;
          }
        }
        // A non-zero byte after padding is malformed, not a new field
        if !self.0.is_empty() {
          return None;
        }
        Some(ExtraField::Padding(len))
      }
      1 => Some(ExtraField::PublicKey(CompressedPoint::from_bytes(self.take()?))),
      2 => {
        let len = usize::try_from(self.varint()?).ok()?;
        if (len > MAX_NONCE_SIZE) || (self.0.len() < len) {
          return None;
        }
        let (nonce, rest) = self.0.split_at(len);
        self.0 = rest;
        Some(ExtraField::Nonce(nonce.to_vec()))
      }
      3 => Some(ExtraField::MergeMining(self.varint()?, self.take()?)),
      4 => {
        let len = usize::try_from(self.varint()?).ok()?;
        if len > (MAX_EXTRA_SIZE_BY_RELAY_RULE / 32) {
          return None;
        }
        let mut keys = Vec::with_capacity(len);
        for _ in 0 .. len {
          keys.push(CompressedPoint::from_bytes(self.take()?));
        }
        Some(ExtraField::PublicKeys(keys))
      }
      _ => None,
    }
  }
}

/// A parsed extra.
#[derive(Clone, PartialEq, Eq, Debug, Zeroize)]
pub struct Extra(pub(crate) Vec<ExtraField>);

impl Extra {
  /// Parse an extra from its bytes.
  ///
  /// Parsing never fails: fields are collected until the bytes are exhausted or a field is
  /// malformed, whatever was collected by then being the result.
  pub fn parse(bytes: &[u8]) -> Extra {
    let mut parser = Parser(bytes);
    let mut fields = vec![];
    while !parser.0.is_empty() {
      let Some(field) = parser.field() else { break };
      fields.push(field);
    }
    Extra(fields)
  }

  /// The transaction keys within this extra.
  ///
  /// All `PublicKey` fields are candidates, alongside the first set of `PublicKeys`. A key
  /// which doesn't decode becomes the identity, yielding a degenerate ECDH, exactly as
  /// Monero's wallet handles malformed keys. `None` is returned if no primary key is present
  /// at all.
  pub fn keys(&self) -> Option<(Vec<Point>, Option<Vec<Point>>)> {
    let identity = {
      use curve25519_dalek::traits::Identity;
      Point::from(curve25519_dalek::EdwardsPoint::identity())
    };
    let decode = |key: &CompressedPoint| key.decompress().unwrap_or(identity);

    let mut keys = vec![];
    let mut additional = None;
    for field in &self.0 {
      match field {
        ExtraField::PublicKey(key) => keys.push(decode(key)),
        ExtraField::PublicKeys(list) if additional.is_none() => {
          additional = Some(list.iter().map(decode).collect::<Vec<_>>());
        }
        _ => {}
      }
    }

    (!keys.is_empty()).then_some((keys, additional))
  }

  /// The payment ID within this extra, read from the first nonce field.
  ///
  /// The first nonce must be exactly a payment ID for one to be yielded.
  pub fn payment_id(&self) -> Option<PaymentId> {
    self.0.iter().find_map(|field| match field {
      ExtraField::Nonce(nonce) => Some(PaymentId::parse(nonce)),
      _ => None,
    })?
  }

  /// The arbitrary data within this extra: every nonce led by the 0x7f marker, marker
  /// stripped.
  ///
  /// No space is reserved for arbitrary data by the protocol, so including any is always a
  /// fingerprint, before even considering the content.
  pub fn arbitrary_data(&self) -> Vec<Vec<u8>> {
    let mut data = vec![];
    for field in &self.0 {
      if let ExtraField::Nonce(nonce) = field {
        if nonce.first() == Some(&ARBITRARY_DATA_MARKER) {
          data.push(nonce[1 ..].to_vec());
        }
      }
    }
    data
  }

  // Build an extra for sending: the key commitments first, nonces appended after.
  pub(crate) fn new(key: CompressedPoint, additional: Vec<CompressedPoint>) -> Extra {
    let mut fields = Vec::with_capacity(3);
    fields.push(ExtraField::PublicKey(key));
    if !additional.is_empty() {
      fields.push(ExtraField::PublicKeys(additional));
    }
    Extra(fields)
  }

  pub(crate) fn push_nonce(&mut self, nonce: Vec<u8>) {
    self.0.push(ExtraField::Nonce(nonce));
  }

  /// Write the `Extra`.
  ///
  /// Extras are neither length-prefixed nor of deterministic length; the buffer written to
  /// must be externally delimited.
  pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
    for field in &self.0 {
      field.write(w)?;
    }
    Ok(())
  }

  /// Serialize the `Extra` to a `Vec<u8>`.
  pub fn serialize(&self) -> Vec<u8> {
    let mut buf = vec![];
    self.write(&mut buf).expect("writing to a Vec cannot fail");
    buf
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn round_trip() {
    let mut extra = Extra::new(CompressedPoint::G, vec![CompressedPoint::H, CompressedPoint::G]);
    extra.push_nonce({
      let mut nonce = vec![];
      PaymentId::Encrypted([0xab; 8]).write(&mut nonce).unwrap();
      nonce
    });
    extra.push_nonce({
      let mut nonce = vec![ARBITRARY_DATA_MARKER];
      nonce.extend(b"hello");
      nonce
    });

    let parsed = Extra::parse(&extra.serialize());
    assert_eq!(parsed, extra);

    let (keys, additional) = parsed.keys().unwrap();
    assert_eq!(keys.len(), 1);
    assert_eq!(additional.unwrap().len(), 2);
    assert_eq!(parsed.payment_id(), Some(PaymentId::Encrypted([0xab; 8])));
    assert_eq!(parsed.arbitrary_data(), vec![b"hello".to_vec()]);
  }

  #[test]
  fn tolerates_malformed_tails() {
    let mut bytes = Extra::new(CompressedPoint::G, vec![]).serialize();
    // An unknown tag ends parsing without discarding what came before
    bytes.push(0xde);
    bytes.extend([1, 2, 3]);
    let parsed = Extra::parse(&bytes);
    assert_eq!(parsed.0.len(), 1);
    assert!(parsed.keys().is_some());

    // A truncated key field yields nothing past the prior fields
    let mut truncated = Extra::new(CompressedPoint::G, vec![]).serialize();
    truncated.push(1);
    truncated.extend([0; 16]);
    assert_eq!(Extra::parse(&truncated).0.len(), 1);

    // Trailing padding is accepted
    let mut padded = Extra::new(CompressedPoint::G, vec![]).serialize();
    padded.extend([0; 7]);
    let parsed = Extra::parse(&padded);
    assert_eq!(parsed.0.len(), 2);
    assert_eq!(parsed.0[1], ExtraField::Padding(7));

    // The masked payment ID round-trips under its pad
    let id = PaymentId::Encrypted([1, 2, 3, 4, 5, 6, 7, 8]);
    let pad = [0x5a; 8];
    assert_eq!(id.masked(pad).masked(pad), id);
  }
}
