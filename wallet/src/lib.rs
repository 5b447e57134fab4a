#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![cfg_attr(not(feature = "std"), no_std)]

use zeroize::{Zeroize, Zeroizing};

use monero_kit::{io::write_varint, ed25519::*, primitives::keccak256, ringct::EncryptedAmount};

pub use monero_kit::*;

pub use monero_kit_address as address;

mod keys;
pub use keys::{ViewPairError, ViewPair, KeyPair};

/// Structures and functionality for working with transactions' extra fields.
pub mod extra;
pub(crate) use extra::Extra;

pub(crate) mod output;
pub use output::WalletOutput;

mod scan;
pub use scan::{ScanError, Scanner};

/// The interfaces to the daemon consumed by the wallet.
pub mod provider;

mod decoys;
pub use decoys::OutputWithDecoys;

/// The fee model.
pub mod fee;
pub use fee::{FeePriority, FeeRate};

/// Input selection over owned outputs.
pub mod select;

/// The storage contract, with an in-memory reference implementation.
pub mod storage;
pub use storage::OwnedOutput;

/// The encrypted wallet file.
pub mod file;

/// Structs and functionality for sending transactions.
pub mod send;

/// The fixed ring size of the Monero protocol.
pub const RING_SIZE: usize = 16;

// The per-output key material both sides of a transfer derive from the ECDH shared point:
// the one-byte view tag prefilter and the shared key the one-time key is offset by.
#[derive(Clone, PartialEq, Eq, Zeroize)]
struct SharedKeyDerivations {
  // keccak256("view_tag" || 8 r A || o)[0]
  view_tag: u8,
  // H_s(8 r A || o)
  shared_key: Scalar,
}

// 8 r A, compressed: the cofactor-cleared ECDH point both parties agree on.
fn ecdh_bytes(ecdh: &Point) -> Zeroizing<[u8; 32]> {
  Zeroizing::new(Point::from((*ecdh).into().mul_by_cofactor()).compress().to_bytes())
}

impl SharedKeyDerivations {
  fn from_ecdh(ecdh: &Point, output_index: usize) -> Zeroizing<SharedKeyDerivations> {
    // 8 r A || varint(o)
    let mut derivation = Zeroizing::new(ecdh_bytes(ecdh).to_vec());
    write_varint(output_index, &mut *derivation)
      .expect("writing to a Vec cannot fail");

    let view_tag = {
      let mut tagged = Zeroizing::new(b"view_tag".to_vec());
      tagged.extend(derivation.iter());
      keccak256(&tagged)[0]
    };

    Zeroizing::new(SharedKeyDerivations { view_tag, shared_key: Scalar::hash(&derivation) })
  }

  // The mask for this output's commitment, H_s("commitment_mask" || shared key).
  fn commitment_mask(&self) -> Scalar {
    let mut preimage = Zeroizing::new(b"commitment_mask".to_vec());
    preimage.extend(self.shared_key.to_bytes());
    Scalar::hash(&preimage)
  }

  // The eight-byte pad XORed with the amount, keccak256("amount" || shared key)[.. 8].
  fn amount_pad(&self) -> Zeroizing<[u8; 8]> {
    let mut preimage = Zeroizing::new(b"amount".to_vec());
    preimage.extend(self.shared_key.to_bytes());
    let mut digest = Zeroizing::new(keccak256(&preimage));
    let mut pad = Zeroizing::new([0; 8]);
    pad.copy_from_slice(&digest[.. 8]);
    digest.zeroize();
    pad
  }

  fn encrypt_amount(&self, amount: u64) -> [u8; 8] {
    (amount ^ u64::from_le_bytes(*self.amount_pad())).to_le_bytes()
  }

  // Recover the opening of an output's commitment from its encrypted amount.
  fn open_amount(&self, encrypted: &EncryptedAmount) -> Commitment {
    match encrypted {
      EncryptedAmount::Compact { amount } => Commitment::new(
        self.commitment_mask(),
        u64::from_le_bytes(*amount) ^ u64::from_le_bytes(*self.amount_pad()),
      ),
      EncryptedAmount::Original { mask, amount } => {
        // The legacy scheme: both values masked additively by a hash chain off the shared key
        let mask_pad = Zeroizing::new(Scalar::hash(Zeroizing::new(self.shared_key.to_bytes())));
        let amount_pad = Zeroizing::new(Scalar::hash(Zeroizing::new(mask_pad.to_bytes())));

        let mask = Scalar::reduce(*mask).into() - (*mask_pad).into();
        let amount_scalar =
          Zeroizing::new(Scalar::reduce(*amount).into() - (*amount_pad).into());

        let mut amount_bytes = Zeroizing::new([0; 8]);
        amount_bytes.copy_from_slice(&Zeroizing::new(amount_scalar.to_bytes())[.. 8]);

        Commitment::new(Scalar::from(mask), u64::from_le_bytes(*amount_bytes))
      }
    }
  }
}

// The eight-byte pad for encrypted payment IDs, keccak256(8 r A || 0x8d)[.. 8].
fn payment_id_pad(ecdh: &Point) -> [u8; 8] {
  let mut preimage = Zeroizing::new(ecdh_bytes(ecdh).to_vec());
  preimage.push(0x8d);
  let mut pad = [0; 8];
  pad.copy_from_slice(&keccak256(&preimage)[.. 8]);
  pad
}
