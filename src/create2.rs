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

//! Deterministic deployment helpers.
//!
//! The deployment proxy takes `salt ‖ code_hash` as raw calldata and
//! instantiates already-uploaded code at the CREATE2 address of
//! `(proxy, salt, code_hash)`.

use crate::{error::Error, utils::keccak256, Result};
use ethcontract::prelude::{Address, H256};
use rand::Rng;

pub fn code_hash(bytecode: &[u8]) -> H256 {
  H256(keccak256(bytecode))
}

/// Salt used for a named singleton: the hash of its name.
pub fn name_salt(name: &str) -> H256 {
  H256(keccak256(name.as_bytes()))
}

pub fn random_salt() -> H256 {
  let random_bytes = rand::thread_rng().gen::<[u8; 32]>();
  H256(keccak256(&random_bytes))
}

/// `last20(keccak256(0xff ‖ deployer ‖ salt ‖ code_hash))`
pub fn create2_address(deployer: Address, salt: H256, code_hash: H256) -> Address {
  let mut preimage = Vec::with_capacity(85);
  preimage.push(0xff);
  preimage.extend_from_slice(deployer.as_bytes());
  preimage.extend_from_slice(salt.as_bytes());
  preimage.extend_from_slice(code_hash.as_bytes());
  let hash = keccak256(&preimage);
  Address::from_slice(&hash[12..])
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeployCalldata {
  pub salt: H256,
  pub code_hash: H256,
}

impl DeployCalldata {
  pub fn new(code_hash: H256, salt: Option<H256>) -> Self {
    Self {
      salt: salt.unwrap_or_else(random_salt),
      code_hash,
    }
  }

  pub fn to_bytes(&self) -> Vec<u8> {
    let mut data = Vec::with_capacity(64);
    data.extend_from_slice(self.salt.as_bytes());
    data.extend_from_slice(self.code_hash.as_bytes());
    data
  }

  pub fn from_bytes(data: &[u8]) -> Result<Self> {
    if data.len() != 64 {
      return Err(Error::InvalidCalldata(data.len()));
    }
    Ok(Self {
      salt: H256::from_slice(&data[..32]),
      code_hash: H256::from_slice(&data[32..]),
    })
  }

  /// Address the proxy at `proxy` will deploy to for this calldata.
  pub fn address(&self, proxy: Address) -> Address {
    create2_address(proxy, self.salt, self.code_hash)
  }
}

pub fn build_deploy_calldata(code_hash: H256, salt: Option<H256>) -> Vec<u8> {
  DeployCalldata::new(code_hash, salt).to_bytes()
}
