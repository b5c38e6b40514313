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
use ethcontract::{common::contract::Interface, Contract};
use std::{
  fs,
  path::{Path, PathBuf},
  sync::Arc,
};

/// Hardhat build output, one `<Name>.sol/<Name>.json` per contract.
#[derive(Clone, Debug)]
pub struct ArtifactStore {
  root: PathBuf,
}

impl ArtifactStore {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// The single artifact file for `name`. Two sources declaring the same
  /// contract name is an error, as in hardhat.
  pub fn find(&self, name: &str) -> Result<PathBuf> {
    let pattern = format!(
      "{}/**/{name}.sol/{name}.json",
      glob::Pattern::escape(&self.root.to_string_lossy()),
      name = name
    );
    let mut matches = glob::glob(&pattern)?.collect::<std::result::Result<Vec<_>, _>>()?;
    match matches.len() {
      0 => Err(Error::ArtifactNotFound(name.to_string())),
      1 => Ok(matches.remove(0)),
      _ => Err(Error::AmbiguousArtifact {
        name: name.to_string(),
        paths: matches,
      }),
    }
  }

  pub fn load(&self, name: &str) -> Result<Contract> {
    let path = self.find(name)?;
    log::debug!("loading {} from {}", name, path.display());
    let contents = fs::read_to_string(&path)?;
    Ok(serde_json::from_str(&contents)?)
  }

  /// Loads `name` and checks its creation code can be deployed as is.
  pub fn load_deployable(&self, name: &str) -> Result<Contract> {
    let contract = self.load(name)?;
    if contract.bytecode.is_empty() {
      return Err(Error::MissingBytecode(name.to_string()));
    }
    if contract.bytecode.requires_linking() {
      return Err(Error::Other(format!("{} has unlinked library references", name)));
    }
    Ok(contract)
  }

  pub fn interface(&self, name: &str) -> Result<Arc<Interface>> {
    Ok(self.load(name)?.interface)
  }
}

/// Reads a text file holding hex encoded bytecode (e.g. the prebuilt
/// deployment proxy).
pub fn read_bytecode_file(path: &Path) -> Result<Vec<u8>> {
  let contents = fs::read_to_string(path)?;
  let code = utils::decode_hex(&contents)?;
  if code.is_empty() {
    return Err(Error::MissingBytecode(path.display().to_string()));
  }
  Ok(code)
}
