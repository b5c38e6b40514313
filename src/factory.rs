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
  artifact::ArtifactStore, deployment::GNOSIS_SAFE_PROXY_FACTORY, error::Error, tx, Result,
};
use ethcontract::{
  common::contract::Interface,
  contract::MethodBuilder,
  prelude::*,
  transport::DynTransport,
  web3::{
    ethabi::{Event as AbiEvent, EventParam, ParamType, RawLog},
    types::Log,
  },
  Instance,
};
use std::sync::Arc;

/// `ProxyCreation(proxy, singleton)` as emitted by the factory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProxyCreation {
  pub proxy: Address,
  pub singleton: Address,
}

#[derive(Clone, Copy, Debug)]
pub struct CreatedSafe {
  pub address: Address,
  pub singleton: Address,
  pub tx_hash: H256,
}

fn proxy_creation_event(proxy_indexed: bool) -> AbiEvent {
  AbiEvent {
    name: "ProxyCreation".to_owned(),
    inputs: vec![
      EventParam {
        name: "proxy".to_owned(),
        kind: ParamType::Address,
        indexed: proxy_indexed,
      },
      EventParam {
        name: "singleton".to_owned(),
        kind: ParamType::Address,
        indexed: false,
      },
    ],
    anonymous: false,
  }
}

/// Finds the first `ProxyCreation` event `factory` emitted among `logs`.
/// Both the v1.3.0 layout (no indexed fields) and the v1.4 layout (indexed
/// proxy) decode; logs from other contracts are skipped.
pub fn find_proxy_creation(factory: Address, logs: &[Log]) -> Option<ProxyCreation> {
  let layouts = [proxy_creation_event(false), proxy_creation_event(true)];
  let topic0 = layouts[0].signature();
  logs
    .iter()
    .filter(|l| l.address == factory && l.topics.first() == Some(&topic0))
    .find_map(|l| {
      layouts.iter().find_map(|event| {
        let parsed = event
          .parse_log(RawLog {
            topics: l.topics.clone(),
            data: l.data.0.clone(),
          })
          .ok()?;
        let mut values = parsed.params.into_iter().map(|p| p.value);
        let proxy = values.next()?.into_address()?;
        let singleton = values.next()?.into_address()?;
        Some(ProxyCreation { proxy, singleton })
      })
    })
}

#[derive(Clone)]
pub struct FactoryClient {
  instance: Instance<DynTransport>,
}

impl FactoryClient {
  pub fn at(web3: &Web3<DynTransport>, interface: Arc<Interface>, address: Address) -> Self {
    Self {
      instance: Instance::at(web3.clone(), interface, address),
    }
  }

  /// A client using the `GnosisSafeProxyFactory` artifact's ABI.
  pub fn load(
    web3: &Web3<DynTransport>,
    artifacts: &ArtifactStore,
    address: Address,
  ) -> Result<Self> {
    let interface = artifacts.interface(GNOSIS_SAFE_PROXY_FACTORY)?;
    Ok(Self::at(web3, interface, address))
  }

  pub fn address(&self) -> H160 {
    self.instance.address()
  }

  /// `createProxyWithNonce(singleton, initializer, salt_nonce)`; the new
  /// Safe's address is read from the receipt's `ProxyCreation` event.
  pub async fn create_proxy_with_nonce(
    &self,
    from_account: Account,
    singleton: Address,
    initializer: Vec<u8>,
    salt_nonce: U256,
  ) -> Result<CreatedSafe> {
    let selector = self
      .instance
      .abi()
      .function("createProxyWithNonce")?
      .short_signature();
    let method: MethodBuilder<DynTransport, Address> = self
      .instance
      .method(selector, (singleton, Bytes(initializer), salt_nonce))?;
    let receipt = tx::send_method(&self.instance.web3(), method, from_account, None).await?;
    let creation = find_proxy_creation(self.address(), &receipt.logs)
      .ok_or(Error::MissingEvent("ProxyCreation"))?;
    Ok(CreatedSafe {
      address: creation.proxy,
      singleton: creation.singleton,
      tx_hash: receipt.transaction_hash,
    })
  }
}
