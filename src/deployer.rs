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

//! Brings up the full Safe contract set and records the addresses.

use crate::{
  artifact::{self, ArtifactStore},
  create2::{self, DeployCalldata},
  deployment::*,
  error::Error,
  tx, Result,
};
use ethcontract::{prelude::*, tokens::Tokenize, transport::DynTransport, Instance};
use std::path::PathBuf;

/// Libraries and handlers deployed directly, in order.
pub const LIBRARIES: [&str; 5] = [
  CREATE_CALL,
  MULTI_SEND,
  MULTI_SEND_CALL_ONLY,
  DEFAULT_CALLBACK_HANDLER,
  COMPATIBILITY_FALLBACK_HANDLER,
];

/// Singletons redeployed through the deterministic deployment proxy.
pub const SINGLETONS: [&str; 3] = [GNOSIS_SAFE, GNOSIS_SAFE_L2, GNOSIS_SAFE_PROXY_FACTORY];

#[derive(Clone, Debug)]
pub struct DeployOptions {
  /// Raw hex bytecode of the deployment proxy.
  pub proxy_bytecode_path: PathBuf,
  /// Reuse this proxy instead of deploying a new one.
  pub proxy_address: Option<Address>,
}

#[derive(Clone, Copy, Debug)]
pub struct DeterministicDeployment {
  pub address: Address,
  pub code_hash: H256,
  pub tx_hash: H256,
}

pub struct Deployer {
  web3: Web3<DynTransport>,
  account: Account,
  artifacts: ArtifactStore,
}

impl Deployer {
  pub fn new(web3: &Web3<DynTransport>, account: Account, artifacts: ArtifactStore) -> Self {
    Self {
      web3: web3.clone(),
      account,
      artifacts,
    }
  }

  /// Sends a creation transaction and returns the new contract's address.
  pub async fn deploy_code(&self, name: &str, code: Vec<u8>) -> Result<Address> {
    let receipt = tx::send(
      &self.web3,
      self.account.clone(),
      None,
      U256::zero(),
      code,
      None,
    )
    .await?;
    let address = receipt
      .contract_address
      .ok_or_else(|| Error::DeploymentFailed(name.to_string()))?;
    println!("{} deployed to: {:?}", name, address);
    Ok(address)
  }

  /// Deploys the artifact `name` with `params` as constructor arguments.
  pub async fn deploy_artifact<P: Tokenize>(&self, name: &str, params: P) -> Result<Address> {
    let contract = self.artifacts.load_deployable(name)?;
    let nonce = tx::next_nonce(&self.web3, &self.account).await?;
    let instance = Instance::builder(self.web3.clone(), contract, params)?
      .from(self.account.clone())
      .nonce(nonce)
      .deploy()
      .await?;
    println!("{} deployed to: {:?}", name, instance.address());
    Ok(instance.address())
  }

  /// Hash of the code deployed at `address`; empty code is fatal.
  pub async fn deployed_code_hash(&self, name: &str, address: Address) -> Result<H256> {
    let code = tx::code_at(&self.web3, address).await?;
    if code.is_empty() {
      return Err(Error::MissingBytecode(name.to_string()));
    }
    Ok(create2::code_hash(&code))
  }

  /// Deploys `name` through the proxy at the address derived from the name
  /// salt. An address that already holds code is rejected before sending.
  pub async fn deploy_deterministic(
    &self,
    proxy: Address,
    name: &str,
    code_hash: H256,
  ) -> Result<DeterministicDeployment> {
    let calldata = DeployCalldata::new(code_hash, Some(create2::name_salt(name)));
    let address = calldata.address(proxy);
    if !tx::code_at(&self.web3, address).await?.is_empty() {
      return Err(Error::AlreadyDeployed {
        name: name.to_string(),
        address,
      });
    }
    let receipt = tx::send(
      &self.web3,
      self.account.clone(),
      Some(proxy),
      U256::zero(),
      calldata.to_bytes(),
      None,
    )
    .await?;
    if tx::code_at(&self.web3, address).await?.is_empty() {
      return Err(Error::MissingBytecode(name.to_string()));
    }
    println!(
      "{} deterministic deployment transaction: {:?}",
      name, receipt.transaction_hash
    );
    println!("{} deterministic address: {:?}", name, address);
    Ok(DeterministicDeployment {
      address,
      code_hash,
      tx_hash: receipt.transaction_hash,
    })
  }

  pub async fn deploy_all(&self, opts: &DeployOptions) -> Result<AddressTable> {
    let mut addresses = AddressTable::new();

    let proxy = match opts.proxy_address {
      Some(p) => {
        log::info!("reusing {} at {:?}", DETERMINISTIC_DEPLOYMENT_PROXY, p);
        p
      }
      None => {
        let code = artifact::read_bytecode_file(&opts.proxy_bytecode_path)?;
        self.deploy_code(DETERMINISTIC_DEPLOYMENT_PROXY, code).await?
      }
    };
    addresses.insert(DETERMINISTIC_DEPLOYMENT_PROXY, proxy);

    for name in LIBRARIES.iter() {
      let address = self.deploy_artifact(name, ()).await?;
      addresses.insert(*name, address);
    }

    // upload the singleton code, the hashes feed the deterministic deployments
    let mut code_hashes = Vec::with_capacity(SINGLETONS.len());
    for name in SINGLETONS.iter() {
      let initial = self.deploy_artifact(name, ()).await?;
      addresses.insert(initial_key(name), initial);
      code_hashes.push((*name, self.deployed_code_hash(name, initial).await?));
    }

    // the factory instantiates proxies by code, so it has to be on chain
    let singleton = addresses
      .get(&initial_key(GNOSIS_SAFE))
      .ok_or_else(|| Error::DeploymentFailed(GNOSIS_SAFE.to_string()))?;
    let safe_proxy = self
      .deploy_artifact(GNOSIS_SAFE_PROXY, (singleton,))
      .await?;
    addresses.insert(initial_key(GNOSIS_SAFE_PROXY), safe_proxy);

    let accessor = self.deploy_artifact(SIMULATE_TX_ACCESSOR, ()).await?;
    addresses.insert(SIMULATE_TX_ACCESSOR, accessor);

    println!("\nDeploying Safe contracts through {}...", DETERMINISTIC_DEPLOYMENT_PROXY);
    for (name, code_hash) in code_hashes {
      let deployed = self.deploy_deterministic(proxy, name, code_hash).await?;
      addresses.insert(name, deployed.address);
    }

    Ok(addresses)
  }
}

/// Deploys everything and writes the table for `network`.
pub async fn deploy_and_save(
  deployer: &Deployer,
  store: &DeploymentStore,
  network: &str,
  opts: &DeployOptions,
) -> Result<(AddressTable, PathBuf)> {
  let addresses = deployer.deploy_all(opts).await?;
  let path = store.save(network, &addresses)?;
  println!("\nDeployment addresses saved to: {}", path.display());
  Ok((addresses, path))
}
