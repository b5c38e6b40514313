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
  artifact::ArtifactStore, deployment::DeploymentStore, error::Error, signer::Wallet, tx, utils,
  Result,
};
use ethcontract::{transport::DynTransport, Address, Http, Web3};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Env vars holding account keys when the config file lists none, in
/// account order.
pub const KEY_ENV_VARS: [&str; 2] = ["LOCAL_PRIV_KEY", "LOCAL_PRIV_KEY_2"];

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
  #[serde(default)]
  pub network: String,
  #[serde(default = "default_eth_url")]
  pub eth_url: String,
  pub chain_id: Option<u64>,
  #[serde(default)]
  pub private_keys: Vec<String>,
  #[serde(default = "default_deployment_dir")]
  pub deployment_dir: String,
  #[serde(default = "default_artifacts_dir")]
  pub artifacts_dir: String,
  #[serde(default = "default_proxy_bytecode_path")]
  pub proxy_bytecode_path: String,
  pub proxy_address: Option<String>,
  pub node_binary: Option<String>,
  pub adapter_binary: Option<String>,
  pub compiler_binary: Option<String>,
}

fn default_eth_url() -> String {
  "http://127.0.0.1:8545".to_string()
}

fn default_deployment_dir() -> String {
  "deployment".to_string()
}

fn default_artifacts_dir() -> String {
  "artifacts".to_string()
}

fn default_proxy_bytecode_path() -> String {
  "output/bytecode.txt".to_string()
}

impl Config {
  pub fn deployment_store(&self) -> DeploymentStore {
    DeploymentStore::new(&self.deployment_dir)
  }

  pub fn artifact_store(&self) -> ArtifactStore {
    ArtifactStore::new(&self.artifacts_dir)
  }

  pub fn proxy_address(&self) -> Result<Option<Address>> {
    match &self.proxy_address {
      Some(a) => Ok(Some(utils::address_or_default(Some(a.as_str()))?)),
      None => Ok(None),
    }
  }

  /// Warns about configured node/adapter/compiler binaries that don't exist.
  pub fn check_binaries(&self) {
    let binaries = [
      ("node", &self.node_binary),
      ("adapter", &self.adapter_binary),
      ("compiler", &self.compiler_binary),
    ];
    for (kind, path) in binaries.iter() {
      if let Some(p) = path {
        if !Path::new(p).exists() {
          log::warn!("{} binary not found at {}", kind, p);
        }
      }
    }
  }
}

pub fn network_from_env() -> Result<String> {
  std::env::var("NETWORK").map_err(|_| Error::MissingEnv("NETWORK"))
}

/// Loads `config/config.<network>.json` (optional) overlaid with `SAFE_*`
/// environment variables.
pub fn load_config(network: &str) -> Result<Config> {
  let fp = format!("config/config.{}.json", network);
  let mut settings = config::Config::default();
  settings.merge(config::File::with_name(fp.as_str()).required(false))?;
  settings.merge(config::Environment::with_prefix("SAFE"))?;
  let mut conf: Config = settings.try_into()?;
  conf.network = network.to_string();
  if conf.private_keys.is_empty() {
    conf.private_keys = KEY_ENV_VARS
      .iter()
      .filter_map(|v| std::env::var(v).ok())
      .filter(|k| !k.trim().is_empty())
      .collect();
  }
  Ok(conf)
}

// utils for binaries
pub async fn init_web3(
  conf: &Config,
  wallets_needed: usize,
  check_balance: bool,
) -> Result<(Web3<DynTransport>, Vec<Wallet>)> {
  if conf.private_keys.len() < wallets_needed {
    return Err(Error::NoAccounts {
      needed: wallets_needed,
      found: conf.private_keys.len(),
    });
  }
  let web3 = Web3::new(DynTransport::new(Http::new(conf.eth_url.as_str())?));
  let chain_id = match conf.chain_id {
    Some(id) => id,
    None => web3.eth().chain_id().await?.as_u64(),
  };
  log::info!("connected to {} (chain id {})", conf.eth_url, chain_id);

  let wallets = conf
    .private_keys
    .iter()
    .map(|k| Wallet::from_hex(k, Some(chain_id)))
    .collect::<Result<Vec<_>>>()?;

  if check_balance {
    if let Some(deployer) = wallets.first() {
      let balance = tx::balance(&web3, deployer.address()).await?;
      log::info!(
        "deployer {:?} balance {}",
        deployer.address(),
        utils::format_ether(balance)
      );
      if balance.is_zero() {
        return Err(Error::Other(
          "no balance in the provided private key (for deployment gas fees)".to_string(),
        ));
      }
    }
  }
  Ok((web3, wallets))
}
