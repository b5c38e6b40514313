// Copyright 2021-2022 Semantic Network Ltd.
// This file is part of polkasafe.

// polkasafe is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// polkasafe is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with polkasafe.  If not, see <http://www.gnu.org/licenses/>.

use crate::{
  artifact::ArtifactStore,
  error::Error,
  safe::{ExecutionOutcome, ExecutionSuccess, SafeTransaction},
  setup::{self, CoreContracts, Funding},
  signer::{self, Wallet},
  utils, Result,
};
use ethcontract::{prelude::*, transport::DynTransport};

#[derive(Clone, Debug)]
pub struct TransferOptions {
  pub salt_nonce: U256,
  /// Defaults to the deployer.
  pub to: Option<Address>,
  pub value: U256,
  pub data: Vec<u8>,
  pub funding: Funding,
}

impl TransferOptions {
  pub fn new() -> Result<Self> {
    Ok(Self {
      salt_nonce: U256::from(42u64),
      to: None,
      value: utils::parse_ether("0.0123")?,
      data: Vec::new(),
      funding: Funding::Always(utils::ether(1)),
    })
  }
}

#[derive(Clone, Debug)]
pub struct TransferReport {
  pub safe: Address,
  pub safe_tx_hash: H256,
  pub signature: Vec<u8>,
  pub tx_hash: H256,
  pub execution: ExecutionSuccess,
}

/// Creates and funds a Safe, then signs and executes one transaction
/// from it with the deployer's key. An `ExecutionFailure` is an error.
pub async fn send_safe_tx(
  web3: &Web3<DynTransport>,
  artifacts: &ArtifactStore,
  wallets: &[Wallet],
  contracts: &CoreContracts,
  opts: &TransferOptions,
) -> Result<TransferReport> {
  let deployer = wallets
    .first()
    .ok_or(Error::NoAccounts { needed: 1, found: 0 })?;
  println!("Executing Safe transaction with account: {:?}", deployer.address());

  let safe =
    setup::create_funded_safe(web3, artifacts, wallets, contracts, opts.salt_nonce, opts.funding)
      .await?;

  let nonce = safe.nonce().await?;
  let transaction = SafeTransaction::new(
    opts.to.unwrap_or_else(|| deployer.address()),
    opts.value,
    opts.data.clone(),
  )
  .with_nonce(nonce);
  let safe_tx_hash = safe.transaction_hash(&transaction).await?;
  println!("Safe transaction hash: {:?}", safe_tx_hash);
  let preimage = safe.encode_transaction_data(&transaction).await?;
  if H256(utils::keccak256(&preimage)) != safe_tx_hash {
    return Err(Error::Other(
      "getTransactionHash does not match encodeTransactionData".to_string(),
    ));
  }

  let signature = deployer.sign_message(safe_tx_hash.as_bytes());
  let recovered = signer::recover_message(safe_tx_hash.as_bytes(), &signature)?;
  if recovered != deployer.address() {
    return Err(Error::Signing(format!(
      "signature recovers to {:?}, expected {:?}",
      recovered,
      deployer.address()
    )));
  }
  println!("Signature: 0x{}", hex::encode(&signature));

  let (tx_hash, outcome) = safe
    .exec_transaction(deployer.account(), &transaction, signature.clone(), None)
    .await?;
  if outcome.is_none() {
    log::warn!("no execution event found in receipt {:?}", tx_hash);
  }
  let execution = ExecutionOutcome::into_success(outcome)?;
  println!("Safe transaction executed, tx hash: {:?}", tx_hash);
  log::info!(
    "ExecutionSuccess for {:?}, payment {}",
    execution.inner_tx_hash,
    execution.payment
  );

  Ok(TransferReport {
    safe: safe.address(),
    safe_tx_hash,
    signature,
    tx_hash,
    execution,
  })
}
