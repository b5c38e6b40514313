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

use ethcontract::Address;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("web3 error: {0}")]
  Web3Error(#[from] ethcontract::web3::Error),
  #[error("execution error: {0}")]
  ExecutionError(#[from] ethcontract::errors::ExecutionError),
  #[error("method error: {0}")]
  MethodError(#[from] ethcontract::errors::MethodError),
  #[error("deploy error: {0}")]
  DeployError(#[from] ethcontract::errors::DeployError),
  #[error("abi error: {0}")]
  AbiError(#[from] ethcontract::web3::ethabi::Error),
  #[error("config error: {0}")]
  ConfigError(#[from] config::ConfigError),
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),
  #[error("hex error: {0}")]
  HexError(#[from] hex::FromHexError),
  #[error("hex error: {0}")]
  CHexError(#[from] rustc_hex::FromHexError),
  #[error("invalid private key")]
  InvalidPrivateKey,
  #[error("signing error: {0}")]
  Signing(String),
  #[error("environment variable {0} is required")]
  MissingEnv(&'static str),
  #[error("{needed} account(s) required, {found} configured")]
  NoAccounts { needed: usize, found: usize },
  #[error("Deployment file not found: {}", .0.display())]
  DeploymentNotFound(PathBuf),
  #[error(
    "Required contract addresses not found in deployment file: missing {missing:?}, available {available:?}"
  )]
  MissingAddresses {
    missing: Vec<String>,
    available: Vec<String>,
  },
  #[error("artifact not found for {0}")]
  ArtifactNotFound(String),
  #[error("more than one artifact named {name}: {paths:?}")]
  AmbiguousArtifact { name: String, paths: Vec<PathBuf> },
  #[error("artifact search failed: {0}")]
  Pattern(#[from] glob::PatternError),
  #[error("artifact search failed: {0}")]
  Glob(#[from] glob::GlobError),
  #[error("{0} deployment failed")]
  DeploymentFailed(String),
  #[error("Failed to get {0} bytecode")]
  MissingBytecode(String),
  #[error("{name} is already deployed at {address:?}")]
  AlreadyDeployed { name: String, address: Address },
  #[error("Safe transaction {0:?} failed")]
  ExecutionFailed(ethcontract::H256),
  #[error("no {0} event found in receipt")]
  MissingEvent(&'static str),
  #[error("invalid deployment calldata: expected 64 bytes, got {0}")]
  InvalidCalldata(usize),
  #[error("error: {0}")]
  Other(String),
}

impl From<&str> for Error {
  fn from(err: &str) -> Self {
    Error::Other(err.to_string())
  }
}
impl From<String> for Error {
  fn from(err: String) -> Self {
    Error::Other(err)
  }
}
