use core::ops::Deref;
use std_shims::{vec, vec::Vec, collections::HashMap};

use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

#[cfg(feature = "compile-time-generators")]
use curve25519_dalek::constants::ED25519_BASEPOINT_TABLE;
#[cfg(not(feature = "compile-time-generators"))]
use curve25519_dalek::constants::ED25519_BASEPOINT_POINT as ED25519_BASEPOINT_TABLE;

use monero_kit::{
  ed25519::{Scalar, CompressedPoint, Point, Commitment},
  transaction::{Output, PrunedTransaction},
};
use crate::{
  address::SubaddressIndex, extra::PaymentId, ViewPair, WalletOutput, Extra,
  SharedKeyDerivations, payment_id_pad,
};

/// Errors when scanning a transaction.
#[derive(Clone, Copy, PartialEq, Eq, Debug, thiserror::Error)]
pub enum ScanError {
  /// The transaction broke the consensus rules assumed of anything on-chain.
  #[error("invalid scannable transaction ({0})")]
  InvalidScannableTransaction(&'static str),
}

/// A transaction scanner, finding the outputs received by a wallet.
///
/// When an output is successfully scanned, the output key MUST be checked against the local
/// database for lack of prior observation. If it was prior observed, that output is an
/// instance of the
/// [burning bug](https://web.getmonero.org/2018/09/25/a-post-mortum-of-the-burning-bug.html)
/// and MAY be unspendable. Only the prior received output(s) or the newly received output will
/// be spendable (as spending one will burn all of them). Once checked, the output key MUST be
/// saved so future checks can be performed.
#[derive(Clone)]
pub struct Scanner {
  pair: ViewPair,
  // Subaddress spend key -> index, None marking the primary address
  subaddresses: HashMap<CompressedPoint, Option<SubaddressIndex>>,
}

impl Zeroize for Scanner {
  fn zeroize(&mut self) {
    self.pair.zeroize();
    // This may not be effective, unfortunately
    for (mut key, mut value) in self.subaddresses.drain() {
      key.zeroize();
      value.zeroize();
    }
  }
}
impl Drop for Scanner {
  fn drop(&mut self) {
    self.zeroize();
  }
}
impl ZeroizeOnDrop for Scanner {}

impl Scanner {
  /// Create a `Scanner` from a `ViewPair`.
  pub fn new(pair: ViewPair) -> Self {
    let mut subaddresses = HashMap::new();
    subaddresses.insert(pair.spend().compress(), None);
    Self { pair, subaddresses }
  }

  /// Register a subaddress to scan for.
  ///
  /// Only registered subaddresses (and the primary address) are found when scanning.
  pub fn register_subaddress(&mut self, subaddress: SubaddressIndex) {
    let (spend, _) = self.pair.subaddress_keys(subaddress);
    self.subaddresses.insert(spend.compress(), Some(subaddress));
  }

  /// Register every subaddress below the (exclusive) account and address bounds.
  ///
  /// The derived lookup table is cached within this scanner across scans.
  pub fn register_subaddresses(&mut self, accounts: u32, addresses: u32) {
    for account in 0 .. accounts {
      for address in 0 .. addresses {
        if let Some(subaddress) = SubaddressIndex::new(account, address) {
          self.register_subaddress(subaddress);
        }
      }
    }
  }

  // Attempt to claim a single output under a single candidate transaction key.
  //
  // `Ok(None)` is simply not ours; `Err` is a transaction no valid chain contains.
  #[allow(clippy::too_many_arguments)]
  fn scan_output(
    &self,
    tx: &PrunedTransaction,
    tx_hash: [u8; 32],
    first_index_on_blockchain: u64,
    o: usize,
    output: &Output,
    output_key: Point,
    candidate_tx_key: Point,
    payment_id: Option<PaymentId>,
    arbitrary_data: &[Vec<u8>],
  ) -> Result<Option<WalletOutput>, ScanError> {
    // The ECDH: our view key times the transaction key
    let ecdh = {
      let view = Zeroizing::new((*self.pair.view).into());
      Zeroizing::new(Point::from(view.deref() * candidate_tx_key.into()))
    };
    let derivations = SharedKeyDerivations::from_ecdh(&ecdh, o);

    // The view tag rejects ~255/256 foreign outputs with a single byte comparison. Outputs
    // predating view tags always take the full derivation path.
    if let Some(view_tag) = output.view_tag {
      if view_tag != derivations.view_tag {
        return Ok(None);
      }
    }

    // P - H_s(ecdh || o) G is the spend key of whichever of our addresses this pays, if any.
    // Subtracting a prime-order element preserves any torsion within the output key, so a
    // torsion-malleated key only matches a spend key of identical torsion (and ours has none).
    let address_spend_key =
      output_key.into() - (&derivations.shared_key.into() * ED25519_BASEPOINT_TABLE);
    let Some(subaddress) =
      self.subaddresses.get(&CompressedPoint::from_bytes(address_spend_key.compress().to_bytes()))
    else {
      return Ok(None);
    };

    // The recoverable key offset: the shared key, plus the subaddress derivation if this went
    // to a subaddress
    let mut key_offset = derivations.shared_key.into();
    if let Some(subaddress) = subaddress {
      key_offset += self.pair.subaddress_derivation(*subaddress).into();
    }

    // Recover the amount
    let commitment = if let Some(amount) = output.amount {
      // Miner outputs are transparent, committed to with a mask of one
      Commitment::new(Scalar::ONE, amount)
    } else {
      let Some(proofs) = &tx.proofs else {
        Err(ScanError::InvalidScannableTransaction("non-miner transaction without RCT proofs"))?
      };
      let Some(encrypted) = proofs.base.encrypted_amounts.get(o) else {
        Err(ScanError::InvalidScannableTransaction("output without an encrypted amount"))?
      };
      let opening = derivations.open_amount(encrypted);

      // The decrypted opening must reproduce the on-chain commitment, or this output is
      // malformed (or simply not ours)
      if Some(&opening.calculate().compress()) != proofs.base.commitments.get(o) {
        return Ok(None);
      }
      opening
    };

    Ok(Some(WalletOutput {
      transaction: tx_hash,
      index_in_transaction: u64::try_from(o).expect("output index exceeded u64"),
      index_on_blockchain: first_index_on_blockchain
        .checked_add(u64::try_from(o).expect("output index exceeded u64"))
        .ok_or(ScanError::InvalidScannableTransaction("on-chain output index exceeded u64"))?,
      key: output_key,
      key_offset: Scalar::from(key_offset),
      commitment,
      additional_timelock: tx.prefix.additional_timelock,
      subaddress: *subaddress,
      payment_id: payment_id.map(|id| id.masked(payment_id_pad(&ecdh))),
      arbitrary_data: arbitrary_data.to_vec(),
    }))
  }

  /// Scan a transaction for the outputs this wallet received.
  ///
  /// `first_index_on_blockchain` is the on-chain index of the transaction's first RingCT
  /// output (its position within the global RingCT output set), as later needed to spend.
  pub fn scan_transaction(
    &self,
    first_index_on_blockchain: u64,
    tx_hash: [u8; 32],
    tx: &PrunedTransaction,
  ) -> Result<Vec<WalletOutput>, ScanError> {
    let extra = Extra::parse(&tx.prefix.extra);
    let Some((tx_keys, additional_keys)) = extra.keys() else {
      // No transaction key means nothing derivable, so nothing ours
      return Ok(vec![]);
    };
    let payment_id = extra.payment_id();
    let arbitrary_data = extra.arbitrary_data();

    let mut found = vec![];
    for (o, output) in tx.prefix.outputs.iter().enumerate() {
      let Some(output_key) = output.key.decompress() else { continue };

      // Each transaction key is a candidate, as is this output's additional key
      let additional = additional_keys.as_ref().and_then(|keys| keys.get(o));
      for candidate in tx_keys.iter().chain(additional) {
        if let Some(scanned) = self.scan_output(
          tx,
          tx_hash,
          first_index_on_blockchain,
          o,
          output,
          output_key,
          *candidate,
          payment_id,
          &arbitrary_data,
        )? {
          found.push(scanned);
          // Stop after the first match so a key listed twice doesn't double-count the output
          break;
        }
      }
    }

    Ok(found)
  }
}
