use core::fmt;
use std_shims::{
  io, vec,
  vec::Vec,
  string::{String, ToString},
  collections::HashSet,
};

use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use rand_core::{RngCore, CryptoRng};
use rand::seq::SliceRandom;

#[cfg(feature = "compile-time-generators")]
use curve25519_dalek::constants::ED25519_BASEPOINT_TABLE;
#[cfg(not(feature = "compile-time-generators"))]
use curve25519_dalek::constants::ED25519_BASEPOINT_POINT as ED25519_BASEPOINT_TABLE;
use curve25519_dalek::traits::{Identity, IsIdentity};

use crate::{
  io::*,
  ed25519::{Scalar, CompressedPoint, Point, Commitment},
  ringct::{
    clsag::{ClsagError, ClsagContext, Clsag},
    RctType, RctPrunable, RctProofs,
  },
  transaction::{TransactionPrefix, Transaction},
  address::{Network, SubaddressIndex, MoneroAddress},
  extra::{MAX_ARBITRARY_DATA_SIZE, MAX_EXTRA_SIZE_BY_RELAY_RULE},
  RING_SIZE, FeeRate, ViewPair, OutputWithDecoys,
};

mod derive;
mod assemble;

mod offline;
pub use offline::{UnsignedTransaction, OfflineError};

// The protocol's input ordering: inputs sort by their key images, descending.
pub(crate) fn key_image_sort(a: &CompressedPoint, b: &CompressedPoint) -> core::cmp::Ordering {
  a.cmp(b).reverse()
}

// Where change is delivered: an address of ours (whose view key we hold, letting the normal
// wallet protocol apply), or a bare external address.
#[derive(Clone, Zeroize)]
pub(crate) enum ChangeDestination {
  Owned { view: ViewPair, subaddress: Option<SubaddressIndex> },
  External(MoneroAddress),
}

impl PartialEq for ChangeDestination {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (
        ChangeDestination::Owned { view: a, subaddress: a_sub },
        ChangeDestination::Owned { view: b, subaddress: b_sub },
      ) => bool::from(a.spend.ct_eq(&b.spend) & a.view.ct_eq(&b.view)) & (a_sub == b_sub),
      (ChangeDestination::External(a), ChangeDestination::External(b)) => a == b,
      _ => false,
    }
  }
}
impl Eq for ChangeDestination {}

impl ChangeDestination {
  // The network never affects derivations, so Mainnet is as good as any
  pub(crate) fn address(&self) -> MoneroAddress {
    match self {
      ChangeDestination::Owned { view, subaddress: Some(subaddress) } => {
        view.subaddress(Network::Mainnet, *subaddress)
      }
      ChangeDestination::Owned { view, subaddress: None } => view.legacy_address(Network::Mainnet),
      ChangeDestination::External(address) => *address,
    }
  }
}

impl fmt::Debug for ChangeDestination {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ChangeDestination").field("address", &self.address()).finish_non_exhaustive()
  }
}

/// Specification for a transaction's change output.
#[derive(Clone, PartialEq, Eq, Debug, Zeroize)]
pub struct Change(Option<ChangeDestination>);

impl Change {
  /// Deliver change to this wallet.
  ///
  /// Taking the view pair lets the wallet protocol treat the change output as the sender's
  /// own, as Monero assumes it can.
  pub fn new(view: ViewPair, subaddress: Option<SubaddressIndex>) -> Change {
    Change(Some(ChangeDestination::Owned { view, subaddress }))
  }

  /// Deliver change to an arbitrary address, or to no one.
  ///
  /// You MUST assume this harms your privacy. With `Some`, the transaction can't be shaped the
  /// way the wallet protocol expects (the change's view key being unavailable), making it
  /// fingerprintable. With `None`, unspent value is shunted into the fee, itself a fingerprint.
  pub fn fingerprintable(address: Option<MoneroAddress>) -> Change {
    Change(address.map(ChangeDestination::External))
  }
}

// A party the transaction pays: a destination with an explicit amount, or the change.
#[derive(Clone, PartialEq, Eq, Debug, Zeroize)]
pub(crate) enum Payee {
  Destination(MoneroAddress, u64),
  Change(ChangeDestination),
}

impl Payee {
  pub(crate) fn address(&self) -> MoneroAddress {
    match self {
      Payee::Destination(address, _) => *address,
      Payee::Change(change) => change.address(),
    }
  }
}

/// An error while building a transaction.
#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum SendError {
  /// A RingCT format this library doesn't produce was requested.
  #[error("only CLSAG + Bulletproof+ transactions are produced")]
  UnsupportedRctType,
  /// The intent spent no inputs.
  #[error("no inputs")]
  NoInputs,
  /// The intent spent more inputs than a transaction may hold.
  #[error("too many inputs")]
  TooManyInputs,
  /// The inputs were invalid, such as one being spent twice.
  #[error("invalid inputs")]
  InvalidInputs,
  /// An input's ring wasn't of the protocol's fixed ring size.
  #[error("invalid ring size")]
  RingSizeInvalid,
  /// The intent paid no destination.
  #[error("no outputs")]
  NoOutputs,
  /// The intent paid more parties than a transaction may hold outputs.
  #[error("too many outputs")]
  TooManyOutputs,
  /// A single destination was paid with no change output.
  ///
  /// The protocol requires two outputs per transaction, presumed one payment and one change.
  #[error("a single output with no change")]
  NoChange,
  /// More than one address carried a payment ID.
  #[error("multiple addresses with payment IDs")]
  MultiplePaymentIds,
  /// More arbitrary data was specified than the extra accommodates.
  #[error("too much data")]
  TooMuchArbitraryData,
  /// The transaction would exceed the protocol's weight limit.
  #[error("transaction exceeds the weight limit")]
  TooLargeTransaction,
  /// The amounts involved overflowed a `u64`.
  #[error("amounts overflowed u64 (in {in_amount}, out {out_amount})")]
  AmountsUnrepresentable {
    /// The amount in, via the inputs.
    in_amount: u128,
    /// The amount which would go out, between the destinations and the fee.
    out_amount: u128,
  },
  /// The inputs couldn't cover the destinations and the fee.
  #[error("insufficient funds (in {inputs}, out {outputs}, fee {necessary_fee:?})")]
  NotEnoughFunds {
    /// The amount the inputs contributed.
    inputs: u64,
    /// The amount the destinations required.
    outputs: u64,
    /// The fee required on top, `None` if the destinations alone caused this.
    necessary_fee: Option<u64>,
  },
  /// The spend key offered doesn't correspond to the inputs being spent.
  #[error("spend key doesn't correspond to the inputs")]
  WrongPrivateKey,
  /// The input and output commitments didn't cancel, an internal invariant violation.
  ///
  /// This indicates a bug within this library; the build is aborted.
  #[error("input and output commitments didn't balance")]
  BalanceMismatch,
  /// A deserialized intent was internally inconsistent, marking its serialization malicious.
  #[error("intent deserialized from a malicious serialization")]
  MaliciousSerialization,
  /// An error from the CLSAGs.
  #[error("clsag error ({0})")]
  ClsagError(ClsagError),
}

/// The complete intent of a send: everything necessary to produce the signed transaction.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SignableTransaction {
  rct_type: RctType,
  outgoing_view_key: Zeroizing<[u8; 32]>,
  inputs: Vec<OutputWithDecoys>,
  payees: Vec<Payee>,
  data: Vec<Vec<u8>>,
  fee_rate: FeeRate,
}

impl PartialEq for SignableTransaction {
  fn eq(&self, other: &Self) -> bool {
    (self.rct_type == other.rct_type) &&
      bool::from(self.outgoing_view_key.ct_eq(&*other.outgoing_view_key)) &&
      (self.inputs == other.inputs) &&
      (self.payees == other.payees) &&
      (self.data == other.data) &&
      (self.fee_rate == other.fee_rate)
  }
}
impl Eq for SignableTransaction {}

impl fmt::Debug for SignableTransaction {
  /// This may run in variable time and reveals everything except the outgoing view key.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("SignableTransaction")
      .field("rct_type", &self.rct_type)
      .field("inputs", &self.inputs)
      .field("payees", &self.payees)
      .field("data", &self.data)
      .field("fee_rate", &self.fee_rate)
      .finish_non_exhaustive()
  }
}

#[derive(Zeroize, ZeroizeOnDrop)]
pub(crate) struct SignableTransactionWithKeyImages {
  pub(crate) intent: SignableTransaction,
  pub(crate) key_images: Vec<CompressedPoint>,
}

impl SignableTransaction {
  fn validate_structure(&self) -> Result<(), SendError> {
    if self.rct_type != RctType::ClsagBulletproofPlus {
      Err(SendError::UnsupportedRctType)?;
    }

    if self.inputs.is_empty() {
      Err(SendError::NoInputs)?;
    }
    if self.inputs.len() > TransactionPrefix::INPUTS_UPPER_BOUND.0 {
      Err(SendError::TooManyInputs)?;
    }
    // No input may be spent twice
    let distinct =
      self.inputs.iter().map(|input| input.key().compress()).collect::<HashSet<_>>();
    if distinct.len() != self.inputs.len() {
      Err(SendError::InvalidInputs)?;
    }
    if self.inputs.iter().any(|input| input.decoys().len() != RING_SIZE) {
      Err(SendError::RingSizeInvalid)?;
    }

    for part in &self.data {
      if part.len() > MAX_ARBITRARY_DATA_SIZE {
        Err(SendError::TooMuchArbitraryData)?;
      }
    }

    Ok(())
  }

  fn validate_payees(&self) -> Result<(), SendError> {
    let destinations =
      self.payees.iter().filter(|payee| matches!(payee, Payee::Destination(..))).count();
    if destinations == 0 {
      Err(SendError::NoOutputs)?;
    }
    if self.payees.len() > TransactionPrefix::OUTPUTS_UPPER_BOUND.0 {
      Err(SendError::TooManyOutputs)?;
    }
    // Monero requires two outputs, presumed one payment and one change
    if self.payees.len() < 2 {
      Err(SendError::NoChange)?;
    }
    // A deserialized intent could claim several change outputs
    if (self.payees.len() - destinations) > 1 {
      Err(SendError::MaliciousSerialization)?;
    }

    let payment_ids =
      self.payees.iter().filter(|payee| payee.address().payment_id().is_some()).count();
    if payment_ids > 1 {
      Err(SendError::MultiplePaymentIds)?;
    }

    Ok(())
  }

  fn validate_funds(&self) -> Result<(), SendError> {
    if self.extra().len() > MAX_EXTRA_SIZE_BY_RELAY_RULE {
      Err(SendError::TooMuchArbitraryData)?;
    }

    let in_amount =
      self.inputs.iter().map(|input| u128::from(input.commitment().amount)).sum::<u128>();
    let destinations_amount = self
      .payees
      .iter()
      .filter_map(|payee| match payee {
        Payee::Destination(_, amount) => Some(u128::from(*amount)),
        Payee::Change(_) => None,
      })
      .sum::<u128>();

    let (weight, necessary_fee) = self.weight_and_necessary_fee();
    let out_amount = destinations_amount + u128::from(necessary_fee);

    let (Ok(in_amount), Ok(out_amount)) = (u64::try_from(in_amount), u64::try_from(out_amount))
    else {
      Err(SendError::AmountsUnrepresentable { in_amount, out_amount })?
    };
    if in_amount < out_amount {
      Err(SendError::NotEnoughFunds {
        inputs: in_amount,
        outputs: u64::try_from(destinations_amount)
          .expect("the total out fit in a u64 yet a part of it didn't"),
        necessary_fee: Some(necessary_fee),
      })?;
    }

    // Half the no-penalty block size, less a margin
    const MAX_TX_WEIGHT: usize = (300_000 / 2) - 600;
    if weight >= MAX_TX_WEIGHT {
      Err(SendError::TooLargeTransaction)?;
    }

    Ok(())
  }

  fn validate(&self) -> Result<(), SendError> {
    self.validate_structure()?;
    self.validate_payees()?;
    self.validate_funds()
  }

  /// Create a new `SignableTransaction`.
  ///
  /// `outgoing_view_key` seeds every deterministic stream within this transaction. Anyone
  /// knowing it can identify the transaction as built by this methodology and recover the data
  /// within it, so it must be handled as a private key. It also must not be reused across two
  /// distinct transactions sharing input keys, or ephemeral secrets MAY repeat.
  ///
  /// `data` is embedded into the transaction's extra; see `Extra::arbitrary_data` for the
  /// implications.
  ///
  /// This runs in time variable to the validity of its arguments and the public data.
  pub fn new(
    rct_type: RctType,
    outgoing_view_key: Zeroizing<[u8; 32]>,
    inputs: Vec<OutputWithDecoys>,
    destinations: Vec<(MoneroAddress, u64)>,
    change: Change,
    data: Vec<Vec<u8>>,
    fee_rate: FeeRate,
  ) -> Result<SignableTransaction, SendError> {
    let mut payees = destinations
      .into_iter()
      .map(|(address, amount)| Payee::Destination(address, amount))
      .collect::<Vec<_>>();
    if let Some(change) = change.0 {
      payees.push(Payee::Change(change));
    }

    let mut tx =
      SignableTransaction { rct_type, outgoing_view_key, inputs, payees, data, fee_rate };
    tx.validate()?;

    // Shuffle the payees so the change output's position doesn't leak
    let mut shuffle_rng = tx.seeded_rng(b"shuffle_payments");
    tx.payees.shuffle(&mut shuffle_rng);

    Ok(tx)
  }

  /// The fee rate this transaction uses.
  pub fn fee_rate(&self) -> FeeRate {
    self.fee_rate
  }

  /// The fee this transaction requires.
  ///
  /// Distinct from the fee it will pay: without a change output, all unspent value is shunted
  /// into the fee.
  pub fn necessary_fee(&self) -> u64 {
    self.weight_and_necessary_fee().1
  }

  /// Write the `SignableTransaction`.
  ///
  /// This layout is solely this library's, not a Monero protocol serialization, and may run in
  /// time variable to its value.
  pub fn write<W: io::Write>(&self, w: &mut W) -> io::Result<()> {
    fn write_address<W: io::Write>(address: &MoneroAddress, w: &mut W) -> io::Result<()> {
      write_list(write_byte, address.to_string().as_bytes(), w)
    }

    fn write_subaddress<W: io::Write>(
      subaddress: &Option<SubaddressIndex>,
      w: &mut W,
    ) -> io::Result<()> {
      match subaddress {
        None => write_byte(&0, w),
        Some(subaddress) => {
          write_byte(&1, w)?;
          w.write_all(&subaddress.account().to_le_bytes())?;
          w.write_all(&subaddress.address().to_le_bytes())
        }
      }
    }

    fn write_payee<W: io::Write>(payee: &Payee, w: &mut W) -> io::Result<()> {
      match payee {
        Payee::Destination(address, amount) => {
          write_byte(&0, w)?;
          write_address(address, w)?;
          write_varint(*amount, w)
        }
        Payee::Change(ChangeDestination::External(address)) => {
          write_byte(&1, w)?;
          write_address(address, w)
        }
        Payee::Change(ChangeDestination::Owned { view, subaddress }) => {
          write_byte(&2, w)?;
          view.spend().compress().write(w)?;
          view.view.write(w)?;
          write_subaddress(subaddress, w)
        }
      }
    }

    write_byte(&u8::from(self.rct_type), w)?;
    w.write_all(self.outgoing_view_key.as_slice())?;
    self.fee_rate.write(w)?;
    write_list(OutputWithDecoys::write, &self.inputs, w)?;
    write_list(write_payee, &self.payees, w)?;
    write_list(|data, w| write_list(write_byte, data, w), &self.data, w)
  }

  /// Serialize the `SignableTransaction` to a `Vec<u8>`.
  pub fn serialize(&self) -> Vec<u8> {
    let mut buf = Vec::with_capacity(1024);
    self.write(&mut buf).expect("writing to a Vec cannot fail");
    buf
  }

  /// Read a `SignableTransaction`.
  ///
  /// The read intent is validated as the constructor validates, rejecting inconsistent or
  /// malicious serializations.
  pub fn read<R: io::Read>(r: &mut R) -> io::Result<SignableTransaction> {
    fn read_address<R: io::Read>(r: &mut R) -> io::Result<MoneroAddress> {
      let bytes = read_list(read_byte, MoneroAddress::SIZE_UPPER_BOUND.0, r)?;
      String::from_utf8(bytes)
        .ok()
        .and_then(|address| MoneroAddress::from_str_with_unchecked_network(&address).ok())
        .ok_or_else(|| io::Error::other("invalid address"))
    }

    fn read_subaddress<R: io::Read>(r: &mut R) -> io::Result<Option<SubaddressIndex>> {
      Ok(match read_byte(r)? {
        0 => None,
        1 => Some(
          SubaddressIndex::new(read_u32(r)?, read_u32(r)?)
            .ok_or_else(|| io::Error::other("(0, 0) claimed as a subaddress"))?,
        ),
        _ => Err(io::Error::other("invalid subaddress flag"))?,
      })
    }

    fn read_payee<R: io::Read>(r: &mut R) -> io::Result<Payee> {
      Ok(match read_byte(r)? {
        0 => Payee::Destination(read_address(r)?, read_varint(r)?),
        1 => Payee::Change(ChangeDestination::External(read_address(r)?)),
        2 => Payee::Change(ChangeDestination::Owned {
          view: ViewPair::new(
            CompressedPoint::read(r)?
              .decompress()
              .ok_or_else(|| io::Error::other("change had an invalid public spend key"))?,
            Zeroizing::new(Scalar::read(r)?),
          )
          .map_err(io::Error::other)?,
          subaddress: read_subaddress(r)?,
        }),
        _ => Err(io::Error::other("invalid payee kind"))?,
      })
    }

    let tx = SignableTransaction {
      rct_type: RctType::try_from(read_byte(r)?)
        .map_err(|()| io::Error::other("unsupported/invalid RctType"))?,
      outgoing_view_key: Zeroizing::new(read_bytes(r)?),
      fee_rate: FeeRate::read(r)?,
      inputs: read_list(OutputWithDecoys::read, TransactionPrefix::INPUTS_UPPER_BOUND.0, r)?,
      payees: read_list(read_payee, TransactionPrefix::OUTPUTS_UPPER_BOUND.0, r)?,
      data: read_list(
        |r| read_list(read_byte, MAX_ARBITRARY_DATA_SIZE, r),
        MAX_EXTRA_SIZE_BY_RELAY_RULE,
        r,
      )?,
    };
    tx.validate().map_err(io::Error::other)?;
    Ok(tx)
  }

  // Pair the inputs with their key images and apply the protocol's input ordering.
  fn sorted_with_key_images(
    mut self,
    key_images: Vec<CompressedPoint>,
  ) -> SignableTransactionWithKeyImages {
    debug_assert_eq!(self.inputs.len(), key_images.len());

    let mut paired = core::mem::take(&mut self.inputs).into_iter().zip(key_images).collect::<Vec<_>>();
    paired.sort_by(|(_, a), (_, b)| key_image_sort(a, b));

    let (inputs, key_images) = paired.into_iter().unzip();
    self.inputs = inputs;
    SignableTransactionWithKeyImages { intent: self, key_images }
  }

  /// The transaction this will be, without its signatures (and the fields they fill).
  ///
  /// Returns `None` if the wrong amount of key images is provided.
  pub fn unsigned_transaction(self, key_images: Vec<CompressedPoint>) -> Option<Transaction> {
    if self.inputs.len() != key_images.len() {
      None?;
    }
    Some(self.sorted_with_key_images(key_images).transaction_without_signatures())
  }

  /// Sign this transaction, yielding the complete transaction.
  ///
  /// This runs in time variable to the validity of its arguments and the public data.
  pub fn sign(
    self,
    rng: &mut (impl RngCore + CryptoRng),
    sender_spend_key: &Zeroizing<Scalar>,
  ) -> Result<Transaction, SendError> {
    let spend: Zeroizing<curve25519_dalek::Scalar> = Zeroizing::new((**sender_spend_key).into());

    // Each input's one-time key is the spend key plus the scanned offset; its image is that
    // key times the hash of the output key
    let one_time_key = |input: &OutputWithDecoys| {
      Zeroizing::new(&*spend + input.key_offset().into())
    };
    let mut key_images = vec![];
    for input in &self.inputs {
      let key = one_time_key(input);
      if bool::from(!(&*key * ED25519_BASEPOINT_TABLE).ct_eq(&input.key().into())) {
        Err(SendError::WrongPrivateKey)?;
      }
      key_images.push(
        Point::from(&*key * Point::hash_to_point(input.key().compress().to_bytes()).into())
          .compress(),
      );
    }

    let with_images = self.sorted_with_key_images(key_images);

    // The CLSAG context per (now sorted) input
    let mut clsag_inputs = Vec::with_capacity(with_images.intent.inputs.len());
    for input in &with_images.intent.inputs {
      clsag_inputs.push((
        Zeroizing::new(Scalar::from(*one_time_key(input))),
        ClsagContext::new(input.decoys().clone(), input.commitment().clone())
          .map_err(SendError::ClsagError)?,
      ));
    }

    let mask_sum = with_images.intent.sum_output_masks();
    let mut tx = with_images.transaction_without_signatures();

    let clsags_and_pseudo_outs = Clsag::sign(
      rng,
      clsag_inputs,
      mask_sum,
      tx.signature_hash().expect("signing a transaction without a signature hash"),
    )
    .map_err(SendError::ClsagError)?;

    // The pseudo-outs, less the output commitments and the fee, must cancel to the identity.
    // A mismatch is a bug within this library; the build is aborted over publishing an
    // unbalanced transaction.
    {
      let proofs = tx.proofs.as_ref().ok_or(SendError::BalanceMismatch)?;
      let mut balance = curve25519_dalek::EdwardsPoint::identity();
      for (_, pseudo_out) in &clsags_and_pseudo_outs {
        balance += (*pseudo_out).into();
      }
      for commitment in &proofs.base.commitments {
        balance -= commitment.decompress().ok_or(SendError::BalanceMismatch)?.into();
      }
      balance -= Commitment::new(Scalar::ZERO, proofs.base.fee).calculate().into();
      if !balance.is_identity() {
        Err(SendError::BalanceMismatch)?;
      }
    }

    // Fill the signatures in
    let Some(RctProofs {
      prunable: RctPrunable::Clsag { ref mut clsags, ref mut pseudo_outs, .. },
      ..
    }) = tx.proofs
    else {
      panic!("transaction being signed wasn't CLSAG")
    };
    for (clsag, pseudo_out) in clsags_and_pseudo_outs {
      clsags.push(clsag);
      pseudo_outs.push(pseudo_out.compress());
    }

    Ok(tx)
  }
}
