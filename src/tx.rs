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

//! Transaction plumbing shared by the contract clients.

use crate::{error::Error, Result};
use ethcontract::{
  contract::MethodBuilder,
  errors::ExecutionError,
  prelude::*,
  tokens::Tokenize,
  transaction::{TransactionBuilder, TransactionResult},
  transport::DynTransport,
  web3::types::{Bytes as RawBytes, TransactionReceipt},
};

pub async fn next_nonce(web3: &Web3<DynTransport>, from_account: &Account) -> Result<U256> {
  Ok(
    web3
      .eth()
      .transaction_count(from_account.address(), None)
      .await?,
  )
}

fn log_confirm_timeout(e: &ExecutionError) {
  if let ExecutionError::ConfirmTimeout(result) = e {
    let failed_txid = match &**result {
      TransactionResult::Hash(h) => *h,
      TransactionResult::Receipt(r) => r.transaction_hash,
    };
    log::warn!("ExecutionError::ConfirmTimeout... {:?}", failed_txid);
  }
}

fn into_receipt(result: TransactionResult) -> Result<TransactionReceipt> {
  match result {
    TransactionResult::Receipt(r) => Ok(r),
    // should not ever happen, the builders wait for the receipt by default
    TransactionResult::Hash(h) => Err(Error::Other(format!(
      "transaction {:?} was not confirmed",
      h
    ))),
  }
}

/// Sends a transaction and waits for its receipt. `to: None` creates a
/// contract. Reverted transactions come back as `ExecutionError::Failure`.
pub async fn send(
  web3: &Web3<DynTransport>,
  from_account: Account,
  to: Option<Address>,
  value: U256,
  data: Vec<u8>,
  gas: Option<U256>,
) -> Result<TransactionReceipt> {
  let nonce = next_nonce(web3, &from_account).await?;
  let mut tx = TransactionBuilder::new(web3.clone())
    .from(from_account)
    .value(value)
    .data(RawBytes(data))
    .nonce(nonce);
  if let Some(address) = to {
    tx = tx.to(address);
  }
  if let Some(g) = gas {
    tx = tx.gas(g);
  }
  // web3 will estimate gas when none is given
  match tx.send().await {
    Ok(r) => into_receipt(r),
    Err(e) => {
      log_confirm_timeout(&e);
      Err(e.into())
    }
  }
}

/// Sends a contract method from `from_account` with an explicit nonce and
/// waits for the receipt.
pub async fn send_method<R: Tokenize>(
  web3: &Web3<DynTransport>,
  method: MethodBuilder<DynTransport, R>,
  from_account: Account,
  gas: Option<U256>,
) -> Result<TransactionReceipt> {
  let nonce = next_nonce(web3, &from_account).await?;
  let mut method = method.from(from_account).nonce(nonce);
  if let Some(g) = gas {
    method = method.gas(g);
  }
  match method.send().await {
    Ok(r) => into_receipt(r),
    Err(e) => {
      log_confirm_timeout(&e.inner);
      Err(e.into())
    }
  }
}

pub async fn code_at(web3: &Web3<DynTransport>, address: Address) -> Result<Vec<u8>> {
  let code = web3.eth().code(address, None).await?;
  Ok(code.0)
}

pub async fn balance(web3: &Web3<DynTransport>, address: Address) -> Result<U256> {
  Ok(web3.eth().balance(address, None).await?)
}

/// Plain value transfer.
pub async fn transfer(
  web3: &Web3<DynTransport>,
  from_account: Account,
  to: Address,
  value: U256,
) -> Result<H256> {
  let receipt = send(web3, from_account, Some(to), value, Vec::new(), None).await?;
  Ok(receipt.transaction_hash)
}
