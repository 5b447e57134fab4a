//! Assembly of the transaction itself: the prefix's inputs and outputs, the extra, the weight
//! and fee, and the proofs (short of the CLSAGs, which signing fills).

use std_shims::{vec, vec::Vec};

#[cfg(feature = "compile-time-generators")]
use curve25519_dalek::constants::ED25519_BASEPOINT_TABLE;
#[cfg(not(feature = "compile-time-generators"))]
use curve25519_dalek::constants::ED25519_BASEPOINT_POINT as ED25519_BASEPOINT_TABLE;

use crate::{
  io::{MAX_VARINT_LEN, varint_len},
  ed25519::{CompressedPoint, Point},
  ringct::{bulletproofs::Bulletproof, RctBase, RctPrunable, RctProofs},
  transaction::{Input, Output, Timelock, TransactionPrefix, Transaction},
  extra::{ARBITRARY_DATA_MARKER, PaymentId, Extra},
  send::{Payee, SignableTransaction, SignableTransactionWithKeyImages},
  RING_SIZE,
};

impl SignableTransaction {
  // The prefix's inputs, pairing each ring's offsets with its key image.
  pub(crate) fn prefix_inputs(&self, key_images: &[CompressedPoint]) -> Vec<Input> {
    debug_assert_eq!(self.inputs.len(), key_images.len());
    self
      .inputs
      .iter()
      .zip(key_images)
      .map(|(input, key_image)| Input::ToKey {
        amount: None,
        key_offsets: input.decoys().offsets().to_vec(),
        key_image: *key_image,
      })
      .collect()
  }

  // The prefix's outputs: each payee's one-time key and view tag.
  pub(crate) fn prefix_outputs(&self) -> Vec<Output> {
    let derivations = self.payment_derivations();
    debug_assert_eq!(self.payees.len(), derivations.shared.len());

    self
      .payees
      .iter()
      .zip(&derivations.shared)
      .map(|(payee, shared)| {
        // P = H_s(ecdh || o) G + B
        let key = (&shared.shared_key.into() * ED25519_BASEPOINT_TABLE) +
          payee.address().spend().into();
        Output {
          amount: None,
          key: Point::from(key).compress(),
          view_tag: Some(shared.view_tag),
        }
      })
      .collect()
  }

  // The extra: the key commitments, a payment ID if one belongs, and any arbitrary data.
  pub(crate) fn extra(&self) -> Vec<u8> {
    let derivations = self.payment_derivations();

    let mut extra =
      Extra::new(derivations.tx_key_pub.compress(), derivations.additional_pubs.clone());

    // An integrated destination's payment ID, encrypted under its payee's pad
    let integrated = self.payees.iter().zip(&derivations.id_pads).find_map(|(payee, pad)| {
      payee.address().payment_id().map(|id| PaymentId::Encrypted(id).masked(*pad))
    });
    let payment_id = integrated.or_else(|| {
      /*
        Otherwise, two-output transactions carry a dummy encrypted payment ID for the
        destination, as the reference wallet does. Omitting it entirely would fingerprint this
        wallet software to the whole chain, rather than reveal a random-looking ID to one
        recipient.
      */
      (self.payees.len() == 2)
        .then(|| {
          self.payees.iter().zip(&derivations.id_pads).find_map(|(payee, pad)| {
            matches!(payee, Payee::Destination(..))
              .then(|| PaymentId::Encrypted([0; 8]).masked(*pad))
          })
        })
        .flatten()
    });
    if let Some(id) = payment_id {
      let mut nonce = Vec::with_capacity(1 + 8);
      id.write(&mut nonce).expect("writing to a Vec cannot fail");
      extra.push_nonce(nonce);
    }

    for part in &self.data {
      let mut nonce = vec![ARBITRARY_DATA_MARKER];
      nonce.extend(part);
      extra.push_nonce(nonce);
    }

    extra.serialize()
  }

  // The weight of the transaction this intent builds, leaving the fee's own encoding out.
  //
  // Computed arithmetically from the wire format, so no proofs need constructing to price the
  // transaction.
  fn weight_without_fee(&self) -> usize {
    let n_inputs = self.inputs.len();
    let n_outputs = self.payees.len();
    let mut weight = 0;

    // Version and (empty) additional timelock
    weight += varint_len(crate::transaction::VERSION) + 1;

    // Inputs: the type tag, the zero amount, and the ring's offsets and key image
    weight += varint_len(u64::try_from(n_inputs).expect("inputs exceeded u64"));
    for input in &self.inputs {
      weight += 1 + 1 + varint_len(u64::try_from(RING_SIZE).expect("ring size exceeded u64"));
      weight += input.decoys().offsets().iter().map(|offset| varint_len(*offset)).sum::<usize>();
      weight += 32;
    }

    // Outputs: the zero amount, the tagged-key type, the key, and the view tag
    weight += varint_len(u64::try_from(n_outputs).expect("outputs exceeded u64"));
    weight += n_outputs * (1 + 1 + 32 + 1);

    // The extra, with its length prefix
    let extra = self.extra().len();
    weight += varint_len(u64::try_from(extra).expect("extra exceeded u64")) + extra;

    // The RingCT base, sans the fee: the type byte, and the compact encrypted amount and
    // commitment per output
    weight += 1 + (n_outputs * (8 + 32));

    // The prunable section: the range-proof count, the aggregated Bulletproof+ (whose L/R
    // vectors carry their own length prefixes), a CLSAG and pseudo-out per input, and the
    // aggregation clawback
    let (clawback, bp_len) = Bulletproof::calculate_clawback(n_outputs);
    let lr_len = 6 + n_outputs.next_power_of_two().ilog2();
    weight += 1 + bp_len + (2 * varint_len(u64::from(lr_len)));
    weight += n_inputs * (((RING_SIZE + 2) * 32) + 32);
    weight += clawback;

    weight
  }

  // The weight of the transaction, and the fee that weight necessitates.
  //
  // The fee's encoding occupies part of the weight it's calculated from, so the answer is the
  // first fee length consistent with the fee it produces.
  pub(crate) fn weight_and_necessary_fee(&self) -> (usize, u64) {
    let base = self.weight_without_fee();
    for fee_len in 1 ..= MAX_VARINT_LEN {
      let fee = self.fee_rate.calculate_fee_from_weight(base + fee_len);
      if varint_len(fee) <= fee_len {
        return (base + fee_len, fee);
      }
    }
    unreachable!("no fee encoding was consistent with its own length")
  }
}

impl SignableTransactionWithKeyImages {
  // The transaction, complete except the CLSAGs and pseudo-outs signing fills.
  pub(crate) fn transaction_without_signatures(&self) -> Transaction {
    let mut commitments = Vec::with_capacity(self.intent.payees.len());
    let mut openings = Vec::with_capacity(self.intent.payees.len());
    let mut encrypted_amounts = Vec::with_capacity(self.intent.payees.len());
    for (opening, encrypted) in self.intent.output_commitments() {
      commitments.push(opening.calculate().compress());
      openings.push(opening);
      encrypted_amounts.push(encrypted);
    }

    let bulletproof = {
      let mut rng = self.intent.seeded_rng(b"bulletproof");
      Bulletproof::prove(&mut rng, openings)
        .expect("couldn't prove the range of outputs validated at construction")
    };

    let fee = if self
      .intent
      .payees
      .iter()
      .any(|payee| matches!(payee, Payee::Change(_)))
    {
      self.intent.weight_and_necessary_fee().1
    } else {
      // Without a change output, the unspent difference is the fee
      let inputs = self.intent.inputs.iter().map(|input| input.commitment().amount).sum::<u64>();
      let destinations = self
        .intent
        .payees
        .iter()
        .filter_map(|payee| match payee {
          Payee::Destination(_, amount) => Some(*amount),
          Payee::Change(_) => None,
        })
        .sum::<u64>();
      // In bounds, as the constructor validated inputs >= destinations + fee
      inputs - destinations
    };

    Transaction {
      prefix: TransactionPrefix {
        additional_timelock: Timelock::None,
        inputs: self.intent.prefix_inputs(&self.key_images),
        outputs: self.intent.prefix_outputs(),
        extra: self.intent.extra(),
      },
      proofs: Some(RctProofs {
        base: RctBase { fee, encrypted_amounts, commitments },
        prunable: RctPrunable::Clsag { bulletproof, clsags: vec![], pseudo_outs: vec![] },
      }),
    }
  }
}
