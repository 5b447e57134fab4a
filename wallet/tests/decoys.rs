use rand_core::{SeedableRng, OsRng};
use rand_chacha::ChaCha20Rng;

use monero_kit_wallet::{
  ed25519::Point,
  transaction::{PrunedTransaction, Transaction},
  provider::{ProviderError, OutputProvider},
  RING_SIZE, Scanner, OutputWithDecoys,
};

mod runner;

// A provider presenting a synthetic chain: one output per block, keyed off the index.
struct SyntheticChain {
  height: u64,
  outputs_per_block: u64,
}

impl SyntheticChain {
  fn output(&self, index: u64) -> [Point; 2] {
    // Deterministic, so repeated fetches agree
    let mut rng = ChaCha20Rng::from_seed({
      let mut seed = [0; 32];
      seed[.. 8].copy_from_slice(&index.to_le_bytes());
      seed
    });
    [runner::random_point(&mut rng), runner::random_point(&mut rng)]
  }
}

impl OutputProvider for SyntheticChain {
  async fn get_output_distribution_end_height(&self) -> Result<u64, ProviderError> {
    Ok(self.height)
  }

  async fn get_output_distribution(&self, to_height: u64) -> Result<Vec<u64>, ProviderError> {
    Ok((0 .. to_height).map(|i| (i + 1) * self.outputs_per_block).collect())
  }

  async fn get_unlocked_outputs(
    &self,
    indexes: &[u64],
    _height: u64,
  ) -> Result<Vec<Option<[Point; 2]>>, ProviderError> {
    Ok(indexes.iter().map(|index| Some(self.output(*index))).collect())
  }
}

// The real output must be served as the chain knows it, so its fetch matches
struct SyntheticChainWithReal {
  chain: SyntheticChain,
  real_index: u64,
  real: [Point; 2],
}

impl OutputProvider for SyntheticChainWithReal {
  async fn get_output_distribution_end_height(&self) -> Result<u64, ProviderError> {
    self.chain.get_output_distribution_end_height().await
  }

  async fn get_output_distribution(&self, to_height: u64) -> Result<Vec<u64>, ProviderError> {
    self.chain.get_output_distribution(to_height).await
  }

  async fn get_unlocked_outputs(
    &self,
    indexes: &[u64],
    height: u64,
  ) -> Result<Vec<Option<[Point; 2]>>, ProviderError> {
    let mut res = self.chain.get_unlocked_outputs(indexes, height).await?;
    for (i, index) in indexes.iter().enumerate() {
      if *index == self.real_index {
        res[i] = Some(self.real);
      }
    }
    Ok(res)
  }
}

// Scan an output of our own to anchor the decoy selection on
fn owned_output(index_on_blockchain: u64) -> (monero_kit_wallet::WalletOutput, [Point; 2]) {
  use zeroize::Zeroizing;
  use rand_core::RngCore;
  use monero_kit_wallet::{
    ringct::RctType,
    address::Network,
    send::{Change, SignableTransaction},
  };

  let sender = runner::wallet(&mut OsRng);
  let recipient = runner::wallet(&mut OsRng);
  let signable = SignableTransaction::new(
    RctType::ClsagBulletproofPlus,
    {
      let mut key = Zeroizing::new([0; 32]);
      OsRng.fill_bytes(key.as_mut());
      key
    },
    vec![runner::fabricate_input(&mut OsRng, &sender, 10_000_000_000, 1)],
    vec![(recipient.view_pair().legacy_address(Network::Mainnet), 5_000_000_000)],
    Change::new(sender.view_pair().clone(), None),
    vec![],
    runner::fee_rate(),
  )
  .unwrap();
  let tx = signable.sign(&mut OsRng, sender.spend_secret()).unwrap();

  let scanner = Scanner::new(recipient.view_pair().clone());
  let output = scanner
    .scan_transaction(index_on_blockchain, tx.hash(), &PrunedTransaction::from(tx.clone()))
    .unwrap()
    .swap_remove(0);

  let members = [output.key(), output.commitment().calculate()];
  (output, members)
}

#[tokio::test(flavor = "current_thread")]
async fn decoy_selection() {
  let height = 4000u64;
  let outputs_per_block = 5;

  let (output, members) = owned_output(3000);
  let real_index = output.index_on_blockchain();

  let provider = SyntheticChainWithReal {
    chain: SyntheticChain { height, outputs_per_block },
    real_index,
    real: members,
  };

  let mut rng = ChaCha20Rng::from_seed([7; 32]);
  let with_decoys =
    OutputWithDecoys::new(&mut rng, &provider, height, output.clone()).await.unwrap();

  let decoys = with_decoys.decoys();
  // The ring is of the fixed size, ascending, without duplicates, and contains the real spend
  assert_eq!(decoys.len(), RING_SIZE);
  let positions = decoys.positions();
  for pair in positions.windows(2) {
    assert!(pair[0] < pair[1]);
  }
  assert_eq!(positions[usize::from(decoys.signer_index())], real_index);
  assert_eq!(
    decoys.ring()[usize::from(decoys.signer_index())][0],
    output.key(),
  );

  // Every member is old enough to spend: within the blocks holding ten-plus confirmations
  let bound = ((height - 10) + 1) * outputs_per_block;
  for position in &positions {
    assert!(*position < bound);
  }

  // The same seed yields the same ring; a different seed yields a different one
  let mut rng = ChaCha20Rng::from_seed([7; 32]);
  let replay = OutputWithDecoys::new(&mut rng, &provider, height, output.clone()).await.unwrap();
  assert_eq!(replay, with_decoys);

  let mut rng = ChaCha20Rng::from_seed([8; 32]);
  let other = OutputWithDecoys::new(&mut rng, &provider, height, output.clone()).await.unwrap();
  assert!(other != with_decoys);

  // The serialization round-trips
  let read = OutputWithDecoys::read(&mut with_decoys.serialize().as_slice()).unwrap();
  assert_eq!(read, with_decoys);
}
