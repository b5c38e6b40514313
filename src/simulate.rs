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
  deployment::{AddressTable, COMPATIBILITY_FALLBACK_HANDLER, SIMULATE_TX_ACCESSOR},
  error::Error,
  safe::Operation,
  setup::{self, CoreContracts, Funding},
  signer::Wallet,
  utils, Result,
};
use ethcontract::{
  prelude::*,
  transport::DynTransport,
  web3::ethabi::{Contract as Abi, Token},
};

#[derive(Clone, Debug)]
pub struct SimulateOptions {
  pub salt_nonce: U256,
  /// Defaults to the deployer.
  pub to: Option<Address>,
  pub value: U256,
  pub data: Vec<u8>,
  pub operation: Operation,
  pub funding: Funding,
}

impl SimulateOptions {
  pub fn new() -> Result<Self> {
    Ok(Self {
      salt_nonce: U256::one(),
      to: None,
      value: utils::parse_ether("0.12")?,
      data: Vec::new(),
      operation: Operation::Call,
      funding: Funding::TopUp {
        min_balance: utils::parse_ether("0.1")?,
        amount: utils::ether(1),
      },
    })
  }
}

/// The core contracts plus the `SimulateTxAccessor`.
#[derive(Clone, Copy, Debug)]
pub struct SimulationContracts {
  pub core: CoreContracts,
  pub accessor: Address,
}

impl SimulationContracts {
  pub const NAMES: [&'static str; 4] = [
    CoreContracts::NAMES[0],
    CoreContracts::NAMES[1],
    CoreContracts::NAMES[2],
    SIMULATE_TX_ACCESSOR,
  ];

  /// All four addresses are required together, so one error lists every
  /// missing name.
  pub fn from_table(table: &AddressTable) -> Result<Self> {
    let found = table.require(&Self::NAMES)?;
    setup::print_addresses(&Self::NAMES, &found);
    Ok(Self {
      core: CoreContracts {
        safe_l2: found[0],
        factory: found[1],
        fallback_handler: found[2],
      },
      accessor: found[3],
    })
  }
}

/// `SimulateTxAccessor.simulate` return values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulationResult {
  pub estimate: U256,
  pub success: bool,
  pub return_data: Vec<u8>,
}

#[derive(Clone, Debug)]
pub struct SimulationReport {
  pub safe: Address,
  /// Safe balance after funding, right before the simulation call.
  pub safe_balance: U256,
  pub accessor_calldata: Vec<u8>,
  pub response: Vec<u8>,
  pub result: Option<SimulationResult>,
}

pub fn accessor_calldata(
  accessor_abi: &Abi,
  to: Address,
  value: U256,
  data: Vec<u8>,
  operation: Operation,
) -> Result<Vec<u8>> {
  let calldata = accessor_abi.function("simulate")?.encode_input(&[
    Token::Address(to),
    Token::Uint(value),
    Token::Bytes(data),
    Token::Uint((operation as u8).into()),
  ])?;
  Ok(calldata)
}

/// Decodes the handler's response as the accessor's `(estimate, success,
/// returnData)`.
pub fn decode_simulation(accessor_abi: &Abi, response: &[u8]) -> Option<SimulationResult> {
  let mut tokens = accessor_abi
    .function("simulate")
    .ok()?
    .decode_output(response)
    .ok()?
    .into_iter();
  Some(SimulationResult {
    estimate: tokens.next()?.into_uint()?,
    success: tokens.next()?.into_bool()?,
    return_data: tokens.next()?.into_bytes()?,
  })
}

/// Creates (and tops up) a Safe, then previews a transaction through the
/// fallback handler without submitting anything.
pub async fn simulate(
  web3: &Web3<DynTransport>,
  artifacts: &ArtifactStore,
  wallets: &[Wallet],
  contracts: &SimulationContracts,
  opts: &SimulateOptions,
) -> Result<SimulationReport> {
  let deployer = wallets
    .first()
    .ok_or(Error::NoAccounts { needed: 1, found: 0 })?;
  println!("Safe transaction simulation with account: {:?}", deployer.address());
  let accessor_interface = artifacts.interface(SIMULATE_TX_ACCESSOR)?;
  let handler_interface = artifacts.interface(COMPATIBILITY_FALLBACK_HANDLER)?;

  let safe = setup::create_funded_safe(
    web3,
    artifacts,
    wallets,
    &contracts.core,
    opts.salt_nonce,
    opts.funding,
  )
  .await?;
  let safe_balance = safe.balance().await?;

  let payload = accessor_calldata(
    &accessor_interface.abi,
    opts.to.unwrap_or_else(|| deployer.address()),
    opts.value,
    opts.data.clone(),
    opts.operation,
  )?;
  println!("accessor.simulate tx: 0x{}", hex::encode(&payload));

  let response = safe
    .simulate(
      handler_interface,
      Some(deployer.address()),
      contracts.accessor,
      payload.clone(),
    )
    .await?;
  println!("accessor.simulate result: 0x{}", hex::encode(&response));
  let result = decode_simulation(&accessor_interface.abi, &response);
  match &result {
    Some(r) => log::info!(
      "simulation success={} estimate={} return data {} byte(s)",
      r.success,
      r.estimate,
      r.return_data.len()
    ),
    None => log::warn!("simulate response is not an accessor result"),
  }

  Ok(SimulationReport {
    safe: safe.address(),
    safe_balance,
    accessor_calldata: payload,
    response,
    result,
  })
}
