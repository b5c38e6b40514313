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

//! Safe creation and funding shared by the transaction and simulation
//! scripts.

use crate::{
  artifact::ArtifactStore,
  deployment::{
    AddressTable, COMPATIBILITY_FALLBACK_HANDLER, GNOSIS_SAFE_L2, GNOSIS_SAFE_PROXY_FACTORY,
  },
  error::Error,
  factory::FactoryClient,
  safe::{SafeClient, SafeSetup},
  signer::Wallet,
  tx, utils, Result,
};
use ethcontract::{prelude::*, transport::DynTransport};

/// Addresses every Safe script needs from the deployment table.
#[derive(Clone, Copy, Debug)]
pub struct CoreContracts {
  pub safe_l2: Address,
  pub factory: Address,
  pub fallback_handler: Address,
}

impl CoreContracts {
  pub const NAMES: [&'static str; 3] = [
    GNOSIS_SAFE_L2,
    GNOSIS_SAFE_PROXY_FACTORY,
    COMPATIBILITY_FALLBACK_HANDLER,
  ];

  /// Resolves the addresses from the table alone, so a partial deployment
  /// is reported before any node is contacted.
  pub fn from_table(table: &AddressTable) -> Result<Self> {
    let found = table.require(&Self::NAMES)?;
    print_addresses(&Self::NAMES, &found);
    Ok(Self {
      safe_l2: found[0],
      factory: found[1],
      fallback_handler: found[2],
    })
  }
}

pub(crate) fn print_addresses(names: &[&str], addresses: &[Address]) {
  println!("Loading contract instances from deployment addresses:");
  for (name, address) in names.iter().zip(addresses.iter()) {
    println!("- {}: {}", name, utils::to_checksum(address));
  }
}

#[derive(Clone, Copy, Debug)]
pub enum Funding {
  /// Always send `amount`.
  Always(U256),
  /// Send `amount` only while the balance is below `min_balance`.
  TopUp { min_balance: U256, amount: U256 },
}

/// The deployer plus the multisig signer when a second key is configured.
pub fn owners(wallets: &[Wallet]) -> Result<Vec<Address>> {
  if wallets.is_empty() {
    return Err(Error::NoAccounts { needed: 1, found: 0 });
  }
  Ok(wallets.iter().take(2).map(|w| w.address()).collect())
}

/// Creates a 1-of-n Safe through the factory and funds it.
pub async fn create_funded_safe(
  web3: &Web3<DynTransport>,
  artifacts: &ArtifactStore,
  wallets: &[Wallet],
  contracts: &CoreContracts,
  salt_nonce: U256,
  funding: Funding,
) -> Result<SafeClient> {
  let deployer = wallets
    .first()
    .ok_or(Error::NoAccounts { needed: 1, found: 0 })?;
  let setup = SafeSetup::new(owners(wallets)?, 1, contracts.fallback_handler);
  let safe_interface = artifacts.interface(GNOSIS_SAFE_L2)?;
  let initializer = setup.initializer(&safe_interface.abi)?;

  let factory = FactoryClient::load(web3, artifacts, contracts.factory)?;
  let created = factory
    .create_proxy_with_nonce(deployer.account(), contracts.safe_l2, initializer, salt_nonce)
    .await?;
  println!("Safe account created, tx hash: {:?}", created.tx_hash);
  println!(
    "Safe account Created at address: {}",
    utils::to_checksum(&created.address)
  );

  let safe = SafeClient::at(web3, safe_interface, created.address);
  let owners = safe.get_owners().await?;
  if owners != setup.owners {
    return Err(Error::Other(format!(
      "Safe owners {:?} differ from the requested {:?}",
      owners, setup.owners
    )));
  }
  log::info!(
    "Safe {:?} owners {:?} threshold {}",
    safe.address(),
    owners,
    safe.get_threshold().await?
  );
  fund(web3, deployer, &safe, funding).await?;
  Ok(safe)
}

pub async fn fund(
  web3: &Web3<DynTransport>,
  from: &Wallet,
  safe: &SafeClient,
  funding: Funding,
) -> Result<Option<H256>> {
  let amount = match funding {
    Funding::Always(amount) => amount,
    Funding::TopUp {
      min_balance,
      amount,
    } => {
      let balance = safe.balance().await?;
      if balance >= min_balance {
        println!(
          "Safe account has sufficient balance: {} ETH",
          utils::format_ether(balance)
        );
        return Ok(None);
      }
      amount
    }
  };
  let tx_hash = tx::transfer(web3, from.account(), safe.address(), amount).await?;
  println!(
    "Transferred {} ETH to Safe account, tx hash: {:?}",
    utils::format_ether(amount),
    tx_hash
  );
  Ok(Some(tx_hash))
}
