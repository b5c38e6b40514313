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
  prelude::{Address, U256},
  web3::ethabi::{encode, Contract as Abi, Token},
};
use polkasafe::{
  artifact::ArtifactStore,
  deployment::{GNOSIS_SAFE_L2, GNOSIS_SAFE_PROXY_FACTORY, SIMULATE_TX_ACCESSOR},
  safe::{Operation, SafeSetup, SafeTransaction},
  simulate,
};

fn fixture_abi(name: &str) -> Abi {
  let store = ArtifactStore::new(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/artifacts"));
  store.interface(name).expect("fixture artifact").abi.clone()
}

fn selector(data: &[u8]) -> String {
  hex::encode(&data[..4])
}

#[test]
fn function_selectors() {
  let safe = fixture_abi(GNOSIS_SAFE_L2);
  let factory = fixture_abi(GNOSIS_SAFE_PROXY_FACTORY);
  let cases: [(&Abi, &str, &str); 6] = [
    (&safe, "setup", "b63e800d"),
    (&safe, "execTransaction", "6a761202"),
    (&safe, "nonce", "affed0e0"),
    (&safe, "getOwners", "a0e67e2b"),
    (&safe, "getThreshold", "e75235b8"),
    (&factory, "createProxyWithNonce", "1688f0b9"),
  ];
  for (contract, name, expected) in cases.iter() {
    let function = contract.function(name).expect("missing function");
    assert_eq!(hex::encode(function.short_signature()), *expected, "{}", name);
  }
}

#[test]
fn setup_initializer() {
  let safe = fixture_abi(GNOSIS_SAFE_L2);
  let owners = vec![Address::repeat_byte(0x11), Address::repeat_byte(0x22)];
  let handler = Address::repeat_byte(0x33);
  let data = SafeSetup::new(owners, 1, handler)
    .initializer(&safe)
    .expect("initializer");
  assert_eq!(selector(&data), "b63e800d");

  let tokens = safe
    .function("setup")
    .expect("setup")
    .decode_input(&data[4..])
    .expect("decode");
  assert_eq!(
    tokens[0],
    Token::Array(vec![
      Token::Address(Address::repeat_byte(0x11)),
      Token::Address(Address::repeat_byte(0x22)),
    ])
  );
  assert_eq!(tokens[1], Token::Uint(U256::one()));
  assert_eq!(tokens[4], Token::Address(handler));
  assert_eq!(tokens[7], Token::Address(Address::zero()));
}

#[test]
fn setup_threshold_is_checked() {
  let safe = fixture_abi(GNOSIS_SAFE_L2);
  let owners = vec![Address::repeat_byte(0x11)];
  assert!(SafeSetup::new(owners.clone(), 0, Address::zero())
    .initializer(&safe)
    .is_err());
  assert!(SafeSetup::new(owners, 2, Address::zero())
    .initializer(&safe)
    .is_err());
}

#[test]
fn transaction_arguments() {
  let tx = SafeTransaction::new(Address::repeat_byte(0xaa), U256::from(5u64), vec![1, 2])
    .with_nonce(U256::from(7u64))
    .with_operation(Operation::DelegateCall);

  let hash_args = tx.hash_tokens();
  assert_eq!(hash_args.len(), 10);
  assert_eq!(hash_args[3], Token::Uint(U256::one()));
  assert_eq!(hash_args[9], Token::Uint(U256::from(7u64)));

  let exec_args = tx.exec_tokens(vec![0xee; 65]);
  assert_eq!(exec_args.len(), 10);
  assert_eq!(exec_args[9], Token::Bytes(vec![0xee; 65]));

  let data = fixture_abi(GNOSIS_SAFE_L2)
    .function("execTransaction")
    .expect("execTransaction")
    .encode_input(&exec_args)
    .expect("encode");
  assert_eq!(selector(&data), "6a761202");
}

#[test]
fn simulation_calldata_and_result() {
  let accessor = fixture_abi(SIMULATE_TX_ACCESSOR);
  let to = Address::repeat_byte(0x44);
  let value = U256::from(120_000_000_000_000_000u64);
  let data = simulate::accessor_calldata(&accessor, to, value, Vec::new(), Operation::Call)
    .expect("encode");

  let function = accessor.function("simulate").expect("simulate");
  assert_eq!(&data[..4], &function.short_signature()[..]);
  let tokens = function.decode_input(&data[4..]).expect("decode");
  assert_eq!(tokens[0], Token::Address(to));
  assert_eq!(tokens[1], Token::Uint(value));
  assert_eq!(tokens[3], Token::Uint(U256::zero()));

  let response = encode(&[
    Token::Uint(U256::from(21_000u64)),
    Token::Bool(true),
    Token::Bytes(Vec::new()),
  ]);
  let result = simulate::decode_simulation(&accessor, &response).expect("decode result");
  assert_eq!(result.estimate, U256::from(21_000u64));
  assert!(result.success);
  assert!(result.return_data.is_empty());

  assert!(simulate::decode_simulation(&accessor, &[0u8; 4]).is_none());
}
