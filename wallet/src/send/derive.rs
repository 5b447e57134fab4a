//! The deterministic derivations within a send: every ephemeral scalar, shared key, and
//! encrypted amount is a pure function of the signing intent, so a re-serialized intent
//! reproduces the identical transaction (as offline signing requires).

use std_shims::{vec, vec::Vec};

use zeroize::{Zeroize, Zeroizing};

use rand_core::SeedableRng;
use rand_chacha::ChaCha20Rng;

#[cfg(feature = "compile-time-generators")]
use curve25519_dalek::constants::ED25519_BASEPOINT_TABLE;
#[cfg(not(feature = "compile-time-generators"))]
use curve25519_dalek::constants::ED25519_BASEPOINT_POINT as ED25519_BASEPOINT_TABLE;

use crate::{
  ed25519::{Scalar, CompressedPoint, Point, Commitment},
  primitives::keccak256,
  ringct::EncryptedAmount,
  SharedKeyDerivations, payment_id_pad,
  send::{ChangeDestination, Payee, SignableTransaction, key_image_sort},
  OutputWithDecoys,
};

// A deterministic RNG bound to a domain, the outgoing view key, and the input set.
//
// The inputs are use-once (their key images burn with them), making each stream unique per
// transaction; the outgoing view key keeps it unknowable to outside observers.
fn seeded_rng(
  domain: &'static [u8],
  outgoing_view_key: &Zeroizing<[u8; 32]>,
  inputs: &[OutputWithDecoys],
) -> ChaCha20Rng {
  let mut transcript = Zeroizing::new(Vec::with_capacity(64 + (64 * inputs.len())));
  transcript
    .push(u8::try_from(domain.len()).expect("a constant domain tag exceeded 255 bytes"));
  transcript.extend(domain);
  transcript.extend(outgoing_view_key.iter());

  // Bind the inputs in a canonical order (the key image sort, merely as a fixed ordering)
  let mut bound = inputs
    .iter()
    .map(|input| (input.key().compress(), input.commitment().calculate().compress()))
    .collect::<Vec<_>>();
  bound.sort_by(|(a, _), (b, _)| key_image_sort(a, b));
  for (key, commitment) in bound {
    transcript.extend(key.to_bytes());
    transcript.extend(commitment.to_bytes());
  }

  let seed = keccak256(&transcript);
  transcript.zeroize();
  ChaCha20Rng::from_seed(seed)
}

// Everything derived per payee for building the outputs: the published key commitments, the
// per-payee shared keys, and the payment ID pads.
pub(crate) struct PaymentDerivations {
  pub(crate) tx_key_pub: Point,
  pub(crate) additional_pubs: Vec<CompressedPoint>,
  pub(crate) shared: Vec<Zeroizing<SharedKeyDerivations>>,
  pub(crate) id_pads: Vec<[u8; 8]>,
}

impl SignableTransaction {
  pub(crate) fn seeded_rng(&self, domain: &'static [u8]) -> ChaCha20Rng {
    seeded_rng(domain, &self.outgoing_view_key, &self.inputs)
  }

  // Whether any payee is addressed by subaddress, requiring `r B`-style shared keys.
  fn pays_a_subaddress(&self) -> bool {
    self.payees.iter().any(|payee| match payee {
      Payee::Destination(address, _) => address.is_subaddress(),
      Payee::Change(ChangeDestination::External(address)) => address.is_subaddress(),
      // Owned change derives with the view key directly, never as a subaddress send
      Payee::Change(ChangeDestination::Owned { .. }) => false,
    })
  }

  /*
    Sending to a subaddress keys the shared secret as `r B`, not `r G`, so each payee needs a
    dedicated key, the additional keys.

    The exception is a two-output transaction whose change we hold the view key for: the
    change side computes `v (r B)` with `v` itself, letting the single transaction key serve
    both outputs.
  */
  fn uses_additional_keys(&self) -> bool {
    let owned_change = self
      .payees
      .iter()
      .any(|payee| matches!(payee, Payee::Change(ChangeDestination::Owned { .. })));
    self.pays_a_subaddress() && !((self.payees.len() == 2) && owned_change)
  }

  // The ephemeral scalars: the transaction key, then one per payee if additional keys are in
  // use.
  fn ephemeral_scalars(&self) -> (Zeroizing<Scalar>, Vec<Zeroizing<Scalar>>) {
    let mut stream = self.seeded_rng(b"transaction_keys");
    let tx_key = Zeroizing::new(Scalar::random(&mut stream));
    let mut additional = vec![];
    if self.uses_additional_keys() {
      for _ in &self.payees {
        additional.push(Zeroizing::new(Scalar::random(&mut stream)));
      }
    }
    (tx_key, additional)
  }

  pub(crate) fn payment_derivations(&self) -> PaymentDerivations {
    let (tx_key, additional) = self.ephemeral_scalars();
    let tx_key_dalek = Zeroizing::new((*tx_key).into());
    let uses_additional = self.uses_additional_keys();
    debug_assert!(additional.is_empty() || (additional.len() == self.payees.len()));

    // The single transaction key's commitment: under G normally, under the paid subaddress's
    // spend key when one transaction key serves a subaddress send
    let tx_key_pub = if self.pays_a_subaddress() && (!uses_additional) {
      let subaddress_spend = self
        .payees
        .iter()
        .find_map(|payee| match payee {
          Payee::Destination(address, _) if address.is_subaddress() => Some(address.spend()),
          _ => None,
        })
        .expect("subaddress send had no subaddress destination");
      Point::from(&*tx_key_dalek * subaddress_spend.into())
    } else {
      Point::from(&*tx_key_dalek * ED25519_BASEPOINT_TABLE)
    };

    // One commitment per payee when additional keys are in use: under the payee's spend key
    // for subaddresses, under G otherwise
    let mut additional_pubs = Vec::with_capacity(additional.len());
    for (scalar, payee) in additional.iter().zip(&self.payees) {
      let scalar = Zeroizing::new((**scalar).into());
      let address = payee.address();
      additional_pubs.push(
        if address.is_subaddress() {
          Point::from(&*scalar * address.spend().into())
        } else {
          Point::from(&*scalar * ED25519_BASEPOINT_TABLE)
        }
        .compress(),
      );
    }

    // The per-payee ECDH and its derivations
    let mut shared = Vec::with_capacity(self.payees.len());
    let mut id_pads = Vec::with_capacity(self.payees.len());
    for (o, payee) in self.payees.iter().enumerate() {
      let ecdh = match payee {
        // Owned change: we hold the view key, so derive against the transaction key itself
        Payee::Change(ChangeDestination::Owned { view, .. }) => {
          let view_secret: Zeroizing<curve25519_dalek::Scalar> =
            Zeroizing::new((**view.view_secret()).into());
          Zeroizing::new(Point::from(&*view_secret * tx_key_pub.into()))
        }
        // Anyone else: their view key, times whichever ephemeral key covers this payee
        payee => {
          let address = payee.address();
          let scalar = if address.is_subaddress() {
            additional.get(o).unwrap_or(&tx_key)
          } else {
            &tx_key
          };
          let scalar = Zeroizing::new((**scalar).into());
          Zeroizing::new(Point::from(&*scalar * address.view().into()))
        }
      };

      shared.push(SharedKeyDerivations::from_ecdh(&ecdh, o));
      id_pads.push(payment_id_pad(&ecdh));
    }

    PaymentDerivations { tx_key_pub, additional_pubs, shared, id_pads }
  }

  // The change: whatever the inputs contribute beyond the destinations and the fee.
  pub(crate) fn change_amount(&self) -> u64 {
    let inputs = self.inputs.iter().map(|input| input.commitment().amount).sum::<u64>();
    let destinations = self
      .payees
      .iter()
      .filter_map(|payee| match payee {
        Payee::Destination(_, amount) => Some(*amount),
        Payee::Change(_) => None,
      })
      .sum::<u64>();
    // In bounds, as the constructor validated the funds suffice
    inputs - (destinations + self.weight_and_necessary_fee().1)
  }

  // The opening and encrypted amount for each output.
  pub(crate) fn output_commitments(&self) -> Vec<(Commitment, EncryptedAmount)> {
    let derivations = self.payment_derivations();

    let mut commitments = Vec::with_capacity(self.payees.len());
    for (payee, shared) in self.payees.iter().zip(&derivations.shared) {
      let amount = match payee {
        Payee::Destination(_, amount) => *amount,
        Payee::Change(_) => self.change_amount(),
      };
      commitments.push((
        Commitment::new(shared.commitment_mask(), amount),
        EncryptedAmount::Compact { amount: shared.encrypt_amount(amount) },
      ));
    }
    commitments
  }

  // The sum of the output commitments' masks, which the pseudo-outs must balance against.
  pub(crate) fn sum_output_masks(&self) -> Scalar {
    let mut sum = curve25519_dalek::Scalar::ZERO;
    for (commitment, _) in self.output_commitments() {
      sum += commitment.mask.into();
    }
    Scalar::from(sum)
  }
}
