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

use crate::{error::Error, utils, Result};
use ethcontract::Address;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::{
  collections::BTreeMap,
  fs,
  path::{Path, PathBuf},
  str::FromStr,
};

pub const DETERMINISTIC_DEPLOYMENT_PROXY: &str = "DeterministicDeploymentProxy";
pub const CREATE_CALL: &str = "CreateCall";
pub const MULTI_SEND: &str = "MultiSend";
pub const MULTI_SEND_CALL_ONLY: &str = "MultiSendCallOnly";
pub const DEFAULT_CALLBACK_HANDLER: &str = "DefaultCallbackHandler";
pub const COMPATIBILITY_FALLBACK_HANDLER: &str = "CompatibilityFallbackHandler";
pub const GNOSIS_SAFE: &str = "GnosisSafe";
pub const GNOSIS_SAFE_L2: &str = "GnosisSafeL2";
pub const GNOSIS_SAFE_PROXY_FACTORY: &str = "GnosisSafeProxyFactory";
pub const GNOSIS_SAFE_PROXY: &str = "GnosisSafeProxy";
pub const SIMULATE_TX_ACCESSOR: &str = "SimulateTxAccessor";

/// Key under which the directly deployed (code upload) instance of a
/// singleton is recorded.
pub fn initial_key(name: &str) -> String {
  format!("{}_Initial", name)
}

/// Contract name → deployed address for one network.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AddressTable(BTreeMap<String, Address>);

impl AddressTable {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&mut self, name: impl Into<String>, address: Address) {
    self.0.insert(name.into(), address);
  }

  pub fn get(&self, name: &str) -> Option<Address> {
    self.0.get(name).copied()
  }

  pub fn names(&self) -> Vec<String> {
    self.0.keys().cloned().collect()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&String, &Address)> {
    self.0.iter()
  }

  /// Looks up every name, failing with the full list of missing ones.
  pub fn require(&self, names: &[&str]) -> Result<Vec<Address>> {
    let missing: Vec<String> = names
      .iter()
      .filter(|n| !self.0.contains_key(**n))
      .map(|n| n.to_string())
      .collect();
    if !missing.is_empty() {
      return Err(Error::MissingAddresses {
        missing,
        available: self.names(),
      });
    }
    Ok(names.iter().filter_map(|n| self.get(n)).collect())
  }
}

impl Serialize for AddressTable {
  fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    let checksummed: BTreeMap<&String, String> = self
      .0
      .iter()
      .map(|(name, address)| (name, utils::to_checksum(address)))
      .collect();
    checksummed.serialize(serializer)
  }
}

impl<'de> Deserialize<'de> for AddressTable {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
    let raw = BTreeMap::<String, String>::deserialize(deserializer)?;
    let mut table = BTreeMap::new();
    for (name, address) in raw {
      let hex = address.trim();
      let parsed = Address::from_str(hex.strip_prefix("0x").unwrap_or(hex))
        .map_err(|e| de::Error::custom(format!("{}: {}", name, e)))?;
      table.insert(name, parsed);
    }
    Ok(AddressTable(table))
  }
}

/// Per-network address tables stored as `<dir>/<network>.json`.
#[derive(Clone, Debug)]
pub struct DeploymentStore {
  dir: PathBuf,
}

impl DeploymentStore {
  pub fn new(dir: impl Into<PathBuf>) -> Self {
    Self { dir: dir.into() }
  }

  pub fn dir(&self) -> &Path {
    &self.dir
  }

  pub fn path(&self, network: &str) -> PathBuf {
    self.dir.join(format!("{}.json", network))
  }

  pub fn exists(&self, network: &str) -> bool {
    self.path(network).is_file()
  }

  pub fn load(&self, network: &str) -> Result<AddressTable> {
    let path = self.path(network);
    if !path.is_file() {
      return Err(Error::DeploymentNotFound(path));
    }
    let contents = fs::read_to_string(&path)?;
    let table = serde_json::from_str(&contents)?;
    log::info!("Loaded deployment addresses from: {}", path.display());
    Ok(table)
  }

  pub fn save(&self, network: &str, table: &AddressTable) -> Result<PathBuf> {
    fs::create_dir_all(&self.dir)?;
    let path = self.path(network);
    fs::write(&path, serde_json::to_string_pretty(table)?)?;
    Ok(path)
  }
}
