//! Offline signing: exporting an unsigned transaction as a JSON document, to be imported and
//! signed on a device holding the spend key.
//!
//! The document carries the full signing intent, so the signer reproduces the exact
//! transaction the composer built (the intent's key streams are deterministic), alongside
//! human-auditable copies of the prefix, rings, masks, and fee for the signer to display.

use std_shims::{
  vec::Vec,
  string::{String, ToString},
};

use zeroize::Zeroizing;
use rand_core::{RngCore, CryptoRng};

use serde::{Serialize, Deserialize};

use crate::{
  ed25519::{Scalar, CompressedPoint},
  transaction::Transaction,
  send::{Payee, SendError, SignableTransaction},
};

/// An error when exporting or importing an unsigned transaction.
#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum OfflineError {
  /// The document wasn't valid JSON, or didn't have the expected fields.
  #[error("malformed unsigned transaction document")]
  Malformed,
  /// The document was for an unsupported version.
  #[error("unsupported unsigned transaction version ({0})")]
  UnsupportedVersion(u32),
  /// The amount of key images didn't match the amount of inputs.
  #[error("wrong amount of key images")]
  WrongKeyImageCount,
  /// The document's audit fields didn't match its signing intent.
  ///
  /// The document was tampered with, or produced by an inconsistent implementation.
  #[error("document's audit fields don't match its intent")]
  Inconsistent,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UnsignedInput {
  // Each ring member as 64 bytes of hex: the output key, then the commitment
  ring_members_hex: Vec<String>,
  real_index: u8,
  key_image_hex: String,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UnsignedOutput {
  mask_hex: String,
  amount: u64,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UnsignedTransactionDocument {
  version: u32,
  tx_prefix_hex: String,
  inputs: Vec<UnsignedInput>,
  outputs: Vec<UnsignedOutput>,
  fee: u64,
  change_address: Option<String>,
  // The serialized signing intent, reproducing the above exactly when signed
  signable_hex: String,
}

/// An unsigned transaction, as exchanged with an offline signer.
pub struct UnsignedTransaction {
  intent: SignableTransaction,
  key_images: Vec<CompressedPoint>,
}

impl UnsignedTransaction {
  /// Create an `UnsignedTransaction` from a signing intent and its inputs' key images.
  ///
  /// The key images must be in the order of the intent's inputs. The composer (who scanned the
  /// outputs being spent) has them saved alongside the outputs.
  pub fn new(
    intent: SignableTransaction,
    key_images: Vec<CompressedPoint>,
  ) -> Result<UnsignedTransaction, OfflineError> {
    if intent.inputs.len() != key_images.len() {
      Err(OfflineError::WrongKeyImageCount)?;
    }
    Ok(UnsignedTransaction { intent, key_images })
  }

  /// The signing intent within this document.
  pub fn intent(&self) -> &SignableTransaction {
    &self.intent
  }

  // The transaction this will be once signed, for the audit fields.
  fn transaction_without_signatures(&self) -> Transaction {
    self
      .intent
      .clone()
      .unsigned_transaction(self.key_images.clone())
      .expect("key image count validated at construction")
  }

  /// Export this unsigned transaction as a JSON document.
  pub fn export(&self) -> String {
    let tx = self.transaction_without_signatures();

    let mut prefix_bytes = Vec::with_capacity(2048);
    // The prefix is the serialization before the proofs; serializing the prefix alone means
    // serializing the transaction with its version yet without its proofs section
    {
      use monero_kit::io::write_varint;
      write_varint(crate::transaction::VERSION, &mut prefix_bytes)
        .expect("writing to a Vec cannot fail");
      let full = tx.serialize();
      let proofs_len = {
        let mut proofs = Vec::with_capacity(1024);
        tx.proofs
          .as_ref()
          .expect("built transaction had no proofs")
          .write(&mut proofs)
          .expect("writing to a Vec cannot fail");
        proofs.len()
      };
      prefix_bytes.extend(&full[1 .. (full.len() - proofs_len)]);
    }

    let inputs = self
      .intent
      .inputs
      .iter()
      .zip(&self.key_images)
      .map(|(input, key_image)| UnsignedInput {
        ring_members_hex: input
          .decoys()
          .ring()
          .iter()
          .map(|member| {
            let mut hex = hex::encode(member[0].compress().to_bytes());
            hex.push_str(&hex::encode(member[1].compress().to_bytes()));
            hex
          })
          .collect(),
        real_index: input.decoys().signer_index(),
        key_image_hex: hex::encode(key_image.to_bytes()),
      })
      .collect();

    let outputs = self
      .intent
      .output_commitments()
      .into_iter()
      .map(|(opening, _)| UnsignedOutput {
        mask_hex: hex::encode(opening.mask.to_bytes()),
        amount: opening.amount,
      })
      .collect();

    let change_address = self.intent.payees.iter().find_map(|payee| match payee {
      Payee::Change(change) => Some(change.address().to_string()),
      Payee::Destination(..) => None,
    });

    let document = UnsignedTransactionDocument {
      version: 1,
      tx_prefix_hex: hex::encode(prefix_bytes),
      inputs,
      outputs,
      fee: tx.proofs.as_ref().expect("built transaction had no proofs").base.fee,
      change_address,
      signable_hex: hex::encode(self.intent.serialize()),
    };

    serde_json::to_string(&document).expect("couldn't serialize unsigned transaction to JSON")
  }

  /// Import an unsigned transaction from a JSON document.
  ///
  /// The document's audit fields are validated against its signing intent; a document whose
  /// displayed prefix/fee don't match what signing would actually produce is rejected.
  pub fn import(document: &str) -> Result<UnsignedTransaction, OfflineError> {
    let document: UnsignedTransactionDocument =
      serde_json::from_str(document).map_err(|_| OfflineError::Malformed)?;
    if document.version != 1 {
      Err(OfflineError::UnsupportedVersion(document.version))?;
    }

    let signable = hex::decode(&document.signable_hex).map_err(|_| OfflineError::Malformed)?;
    let intent =
      SignableTransaction::read(&mut signable.as_slice()).map_err(|_| OfflineError::Malformed)?;

    let key_images = document
      .inputs
      .iter()
      .map(|input| {
        hex::decode(&input.key_image_hex)
          .ok()
          .and_then(|bytes| <[u8; 32]>::try_from(bytes).ok())
          .map(CompressedPoint::from)
          .ok_or(OfflineError::Malformed)
      })
      .collect::<Result<Vec<_>, _>>()?;

    let res = UnsignedTransaction::new(intent, key_images)?;

    // Re-derive the audit fields and check the document presented them faithfully
    let expected = res.export();
    let expected: UnsignedTransactionDocument =
      serde_json::from_str(&expected).expect("exported document wasn't valid JSON");
    if (expected.tx_prefix_hex != document.tx_prefix_hex) || (expected.fee != document.fee) {
      Err(OfflineError::Inconsistent)?;
    }

    Ok(res)
  }

  /// Sign this transaction with the spend key, yielding the complete transaction.
  pub fn sign(
    self,
    rng: &mut (impl RngCore + CryptoRng),
    sender_spend_key: &Zeroizing<Scalar>,
  ) -> Result<Transaction, SendError> {
    self.intent.sign(rng, sender_spend_key)
  }
}
