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
  artifact::ArtifactStore, deployment::GNOSIS_SAFE_L2, error::Error, tx, utils, Result,
};
use ethcontract::{
  common::contract::Interface,
  contract::{MethodBuilder, ViewMethodBuilder},
  prelude::*,
  transport::DynTransport,
  web3::{
    ethabi::{Contract as Abi, RawLog, Token},
    types::Log,
  },
  Instance,
};
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
  Call = 0,
  DelegateCall = 1,
}

/// Arguments of `GnosisSafe.setup`.
#[derive(Clone, Debug)]
pub struct SafeSetup {
  pub owners: Vec<Address>,
  pub threshold: u64,
  pub to: Address,
  pub data: Vec<u8>,
  pub fallback_handler: Address,
  pub payment_token: Address,
  pub payment: U256,
  pub payment_receiver: Address,
}

impl SafeSetup {
  /// Owners and threshold with a fallback handler; no delegate setup call
  /// and no payment.
  pub fn new(owners: Vec<Address>, threshold: u64, fallback_handler: Address) -> Self {
    let address_0 = utils::zero_address();
    Self {
      owners,
      threshold,
      to: address_0,
      data: Vec::new(),
      fallback_handler,
      payment_token: address_0,
      payment: U256::zero(),
      payment_receiver: address_0,
    }
  }

  /// Calldata for `setup(...)` encoded against the singleton's ABI, used as
  /// the factory initializer.
  pub fn initializer(&self, safe_abi: &Abi) -> Result<Vec<u8>> {
    if self.threshold == 0 || self.threshold as usize > self.owners.len() {
      return Err(Error::Other(format!(
        "threshold {} invalid for {} owner(s)",
        self.threshold,
        self.owners.len()
      )));
    }
    let data = safe_abi.function("setup")?.encode_input(&[
      Token::Array(self.owners.iter().map(|o| Token::Address(*o)).collect()),
      Token::Uint(self.threshold.into()),
      Token::Address(self.to),
      Token::Bytes(self.data.clone()),
      Token::Address(self.fallback_handler),
      Token::Address(self.payment_token),
      Token::Uint(self.payment),
      Token::Address(self.payment_receiver),
    ])?;
    Ok(data)
  }
}

/// A Safe transaction. The hash is always obtained from the contract.
#[derive(Clone, Debug)]
pub struct SafeTransaction {
  pub to: Address,
  pub value: U256,
  pub data: Vec<u8>,
  pub operation: Operation,
  pub safe_tx_gas: U256,
  pub base_gas: U256,
  pub gas_price: U256,
  pub gas_token: Address,
  pub refund_receiver: Address,
  pub nonce: U256,
}

impl SafeTransaction {
  /// A plain call with no refund and nonce 0.
  pub fn new(to: Address, value: U256, data: Vec<u8>) -> Self {
    let address_0 = utils::zero_address();
    Self {
      to,
      value,
      data,
      operation: Operation::Call,
      safe_tx_gas: U256::zero(),
      base_gas: U256::zero(),
      gas_price: U256::zero(),
      gas_token: address_0,
      refund_receiver: address_0,
      nonce: U256::zero(),
    }
  }

  pub fn with_nonce(mut self, nonce: U256) -> Self {
    self.nonce = nonce;
    self
  }

  pub fn with_operation(mut self, operation: Operation) -> Self {
    self.operation = operation;
    self
  }

  fn tokens(&self, last: Token) -> Vec<Token> {
    vec![
      Token::Address(self.to),
      Token::Uint(self.value),
      Token::Bytes(self.data.clone()),
      Token::Uint((self.operation as u8).into()),
      Token::Uint(self.safe_tx_gas),
      Token::Uint(self.base_gas),
      Token::Uint(self.gas_price),
      Token::Address(self.gas_token),
      Token::Address(self.refund_receiver),
      last,
    ]
  }

  /// Arguments of `getTransactionHash` / `encodeTransactionData`.
  pub fn hash_tokens(&self) -> Vec<Token> {
    self.tokens(Token::Uint(self.nonce))
  }

  /// Arguments of `execTransaction`. The nonce isn't included as it's a
  /// contract global.
  pub fn exec_tokens(&self, signatures: Vec<u8>) -> Vec<Token> {
    self.tokens(Token::Bytes(signatures))
  }
}

#[derive(Clone, Debug)]
pub struct ExecutionSuccess {
  pub tx_hash: H256,
  pub payment: U256,
  pub inner_tx_hash: H256, // the Safe transaction hash that was executed
}

#[derive(Clone, Debug)]
pub enum ExecutionOutcome {
  Success(ExecutionSuccess),
  Failure { inner_tx_hash: H256, payment: U256 },
}

impl ExecutionOutcome {
  /// A receipt without either event, or with `ExecutionFailure`, is an
  /// error: the Safe consumed its nonce without running the call.
  pub fn into_success(outcome: Option<Self>) -> Result<ExecutionSuccess> {
    match outcome {
      Some(ExecutionOutcome::Success(success)) => Ok(success),
      Some(ExecutionOutcome::Failure { inner_tx_hash, .. }) => {
        Err(Error::ExecutionFailed(inner_tx_hash))
      }
      None => Err(Error::MissingEvent("ExecutionSuccess")),
    }
  }
}

fn selector(abi: &Abi, name: &str) -> Result<[u8; 4]> {
  Ok(abi.function(name)?.short_signature())
}

#[derive(Clone)]
pub struct SafeClient {
  instance: Instance<DynTransport>,
}

impl SafeClient {
  pub fn at(web3: &Web3<DynTransport>, interface: Arc<Interface>, address: Address) -> Self {
    Self {
      instance: Instance::at(web3.clone(), interface, address),
    }
  }

  /// A client using the `GnosisSafeL2` artifact's ABI.
  pub fn load(
    web3: &Web3<DynTransport>,
    artifacts: &ArtifactStore,
    address: Address,
  ) -> Result<Self> {
    Ok(Self::at(web3, artifacts.interface(GNOSIS_SAFE_L2)?, address))
  }

  pub fn address(&self) -> H160 {
    self.instance.address()
  }

  pub fn abi(&self) -> &Abi {
    self.instance.abi()
  }

  pub async fn nonce(&self) -> Result<U256> {
    let method: ViewMethodBuilder<DynTransport, U256> = self
      .instance
      .view_method(selector(self.abi(), "nonce")?, ())?;
    Ok(method.call().await?)
  }

  pub async fn get_threshold(&self) -> Result<U256> {
    let method: ViewMethodBuilder<DynTransport, U256> = self
      .instance
      .view_method(selector(self.abi(), "getThreshold")?, ())?;
    Ok(method.call().await?)
  }

  pub async fn get_owners(&self) -> Result<Vec<H160>> {
    let method: ViewMethodBuilder<DynTransport, Vec<Address>> = self
      .instance
      .view_method(selector(self.abi(), "getOwners")?, ())?;
    Ok(method.call().await?)
  }

  pub async fn balance(&self) -> Result<U256> {
    tx::balance(&self.instance.web3(), self.address()).await
  }

  /// The hash the owners sign, as computed by the contract.
  pub async fn transaction_hash(&self, transaction: &SafeTransaction) -> Result<H256> {
    let method: ViewMethodBuilder<DynTransport, Bytes<[u8; 32]>> = self.instance.view_method(
      selector(self.abi(), "getTransactionHash")?,
      Token::Tuple(transaction.hash_tokens()),
    )?;
    Ok(H256(method.call().await?.0))
  }

  /// EIP-712 preimage of the transaction hash.
  pub async fn encode_transaction_data(&self, transaction: &SafeTransaction) -> Result<Vec<u8>> {
    let method: ViewMethodBuilder<DynTransport, Bytes<Vec<u8>>> = self.instance.view_method(
      selector(self.abi(), "encodeTransactionData")?,
      Token::Tuple(transaction.hash_tokens()),
    )?;
    Ok(method.call().await?.0)
  }

  pub async fn exec_transaction(
    &self,
    from_account: Account,
    transaction: &SafeTransaction,
    signatures: Vec<u8>,
    gas: Option<U256>,
  ) -> Result<(H256, Option<ExecutionOutcome>)> {
    let method: MethodBuilder<DynTransport, bool> = self.instance.method(
      selector(self.abi(), "execTransaction")?,
      Token::Tuple(transaction.exec_tokens(signatures)),
    )?;
    let receipt = tx::send_method(&self.instance.web3(), method, from_account, gas).await?;
    log::info!("exec_transaction mined in {:?}", receipt.transaction_hash);
    let outcome = self.execution_outcome(receipt.transaction_hash, &receipt.logs)?;
    Ok((receipt.transaction_hash, outcome))
  }

  /// Finds the `ExecutionSuccess` / `ExecutionFailure` event this Safe
  /// emitted in a receipt.
  pub fn execution_outcome(&self, tx_hash: H256, logs: &[Log]) -> Result<Option<ExecutionOutcome>> {
    let success = self.abi().event("ExecutionSuccess")?;
    let failure = self.abi().event("ExecutionFailure")?;
    for entry in logs.iter().filter(|l| l.address == self.address()) {
      let raw = RawLog {
        topics: entry.topics.clone(),
        data: entry.data.0.clone(),
      };
      let topic0 = entry.topics.first().copied();
      let (decoded, ok) = if topic0 == Some(success.signature()) {
        (success.parse_log(raw), true)
      } else if topic0 == Some(failure.signature()) {
        (failure.parse_log(raw), false)
      } else {
        continue;
      };
      let mut params = match decoded {
        Ok(d) => d.params.into_iter().map(|p| p.value),
        Err(_) => continue,
      };
      let inner_tx_hash = params
        .next()
        .and_then(|t| t.into_fixed_bytes())
        .map(|b| H256::from_slice(&b))
        .unwrap_or_default();
      let payment = params.next().and_then(|t| t.into_uint()).unwrap_or_default();
      return Ok(Some(if ok {
        ExecutionOutcome::Success(ExecutionSuccess {
          tx_hash,
          payment,
          inner_tx_hash,
        })
      } else {
        ExecutionOutcome::Failure {
          inner_tx_hash,
          payment,
        }
      }));
    }
    Ok(None)
  }

  /// `CompatibilityFallbackHandler.simulate(accessor, payload)` routed
  /// through this Safe's fallback, as a read-only call.
  pub async fn simulate(
    &self,
    handler: Arc<Interface>,
    from: Option<Address>,
    accessor: Address,
    accessor_calldata: Vec<u8>,
  ) -> Result<Vec<u8>> {
    let handler = Instance::at(self.instance.web3(), handler, self.address());
    let mut method: ViewMethodBuilder<DynTransport, Bytes<Vec<u8>>> = handler.view_method(
      selector(handler.abi(), "simulate")?,
      (accessor, Bytes(accessor_calldata)),
    )?;
    if let Some(from) = from {
      method = method.from(from);
    }
    Ok(method.call().await?.0)
  }
}
