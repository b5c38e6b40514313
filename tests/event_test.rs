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

use ethcontract::{
  prelude::{Address, H256, U256},
  transport::DynTransport,
  web3::{ethabi::Token, types::Log},
  Http, Web3,
};
use polkasafe::{
  artifact::ArtifactStore,
  error::Error,
  factory::{self, ProxyCreation},
  safe::{ExecutionOutcome, ExecutionSuccess, SafeClient},
  utils,
};

fn topic(signature: &str) -> H256 {
  H256(utils::keccak256(signature.as_bytes()))
}

fn log(address: Address, topics: Vec<H256>, data: Vec<u8>) -> Log {
  serde_json::from_value(serde_json::json!({
    "address": address,
    "topics": topics,
    "data": format!("0x{}", hex::encode(data)),
  }))
  .expect("bad log")
}

fn offline_web3() -> Web3<DynTransport> {
  Web3::new(DynTransport::new(
    Http::new("http://127.0.0.1:1").expect("couldnt setup web3"),
  ))
}

#[test]
fn proxy_creation_unindexed() {
  let proxy = Address::repeat_byte(0x01);
  let singleton = Address::repeat_byte(0x02);
  let factory = Address::repeat_byte(0xfa);
  let logs = vec![
    log(factory, vec![topic("Transfer(address,address,uint256)")], vec![0u8; 32]),
    log(
      factory,
      vec![topic("ProxyCreation(address,address)")],
      ethcontract::web3::ethabi::encode(&[Token::Address(proxy), Token::Address(singleton)]),
    ),
  ];
  assert_eq!(
    factory::find_proxy_creation(factory, &logs),
    Some(ProxyCreation { proxy, singleton })
  );
}

#[test]
fn proxy_creation_from_another_contract_is_skipped() {
  let factory = Address::repeat_byte(0xfa);
  let creation = |proxy: Address| {
    ethcontract::web3::ethabi::encode(&[
      Token::Address(proxy),
      Token::Address(Address::repeat_byte(0x02)),
    ])
  };
  let topics = vec![topic("ProxyCreation(address,address)")];
  let foreign = log(
    Address::repeat_byte(0xbb),
    topics.clone(),
    creation(Address::repeat_byte(0x0b)),
  );
  let own = log(factory, topics, creation(Address::repeat_byte(0x0f)));

  assert_eq!(factory::find_proxy_creation(factory, &[foreign.clone()]), None);
  assert_eq!(
    factory::find_proxy_creation(factory, &[foreign, own]),
    Some(ProxyCreation {
      proxy: Address::repeat_byte(0x0f),
      singleton: Address::repeat_byte(0x02),
    })
  );
}

#[test]
fn proxy_creation_indexed_proxy() {
  let proxy = Address::repeat_byte(0x03);
  let singleton = Address::repeat_byte(0x04);
  let factory = Address::repeat_byte(0xfa);
  let logs = vec![log(
    factory,
    vec![topic("ProxyCreation(address,address)"), H256::from(proxy)],
    ethcontract::web3::ethabi::encode(&[Token::Address(singleton)]),
  )];
  assert_eq!(
    factory::find_proxy_creation(factory, &logs),
    Some(ProxyCreation { proxy, singleton })
  );
}

#[test]
fn proxy_creation_absent() {
  let factory = Address::repeat_byte(0xfa);
  let logs = vec![log(
    factory,
    vec![topic("SafeSetup(address,address[],uint256,address,address)")],
    vec![0u8; 64],
  )];
  assert_eq!(factory::find_proxy_creation(factory, &logs), None);
  assert_eq!(factory::find_proxy_creation(factory, &[]), None);
}

#[test]
fn execution_events() {
  let safe_address = Address::repeat_byte(0x5a);
  let artifacts = ArtifactStore::new(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/artifacts"));
  let safe = SafeClient::load(&offline_web3(), &artifacts, safe_address).expect("safe client");
  let inner = H256::repeat_byte(0x77);
  let tx_hash = H256::repeat_byte(0x88);
  let data = ethcontract::web3::ethabi::encode(&[
    Token::FixedBytes(inner.as_bytes().to_vec()),
    Token::Uint(U256::from(9u64)),
  ]);

  // same event from another contract is ignored
  let foreign = log(
    Address::repeat_byte(0x01),
    vec![topic("ExecutionSuccess(bytes32,uint256)")],
    data.clone(),
  );
  assert!(safe
    .execution_outcome(tx_hash, &[foreign.clone()])
    .expect("decode")
    .is_none());

  let success = log(
    safe_address,
    vec![topic("ExecutionSuccess(bytes32,uint256)")],
    data.clone(),
  );
  match safe
    .execution_outcome(tx_hash, &[foreign, success])
    .expect("decode")
  {
    Some(ExecutionOutcome::Success(s)) => {
      assert_eq!(s.tx_hash, tx_hash);
      assert_eq!(s.inner_tx_hash, inner);
      assert_eq!(s.payment, U256::from(9u64));
    }
    other => panic!("unexpected {:?}", other),
  }

  let failure = log(
    safe_address,
    vec![topic("ExecutionFailure(bytes32,uint256)")],
    data,
  );
  match safe.execution_outcome(tx_hash, &[failure]).expect("decode") {
    Some(ExecutionOutcome::Failure { inner_tx_hash, .. }) => assert_eq!(inner_tx_hash, inner),
    other => panic!("unexpected {:?}", other),
  }
}

#[test]
fn only_execution_success_is_accepted() {
  let inner = H256::repeat_byte(0x77);
  let success = ExecutionOutcome::Success(ExecutionSuccess {
    tx_hash: H256::repeat_byte(0x88),
    payment: U256::zero(),
    inner_tx_hash: inner,
  });
  let executed = ExecutionOutcome::into_success(Some(success)).expect("success");
  assert_eq!(executed.inner_tx_hash, inner);

  let failure = ExecutionOutcome::Failure {
    inner_tx_hash: inner,
    payment: U256::zero(),
  };
  assert!(matches!(
    ExecutionOutcome::into_success(Some(failure)),
    Err(Error::ExecutionFailed(hash)) if hash == inner
  ));
  assert!(matches!(
    ExecutionOutcome::into_success(None),
    Err(Error::MissingEvent("ExecutionSuccess"))
  ));
}
