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

use ethcontract::prelude::{Address, H256};
use polkasafe::{
  error::Error,
  signer::{self, Wallet},
  utils,
};
use std::str::FromStr;

// hardhat development accounts #0 and #1
const KEY_0: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
const KEY_1: &str = "59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

#[test]
fn address_from_key() {
  let wallet = Wallet::from_hex(KEY_0, Some(31337)).expect("bad key");
  assert_eq!(
    utils::to_checksum(&wallet.address()),
    "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
  );
  assert_eq!(wallet.chain_id(), Some(31337));

  let wallet = Wallet::from_hex(KEY_1, None).expect("bad key");
  assert_eq!(
    wallet.address(),
    Address::from_str("70997970C51812dc3A010C7d01b50e0d17dc79C8").expect("bad address")
  );
}

#[test]
fn invalid_keys_are_rejected() {
  assert!(matches!(
    Wallet::from_bytes(&[0u8; 32], None),
    Err(Error::InvalidPrivateKey)
  ));
  assert!(Wallet::from_hex("0x1234", None).is_err());
}

#[test]
fn personal_message_hash() {
  assert_eq!(
    H256(signer::hash_message(b"Hello World")),
    H256::from_str("a1de988600a42c4b4ab089b619297c17d53cffae5d5120d82d8a92d0bb3b78f2")
      .expect("bad hash")
  );
}

#[test]
fn sign_and_recover() {
  let wallet = Wallet::from_hex(KEY_0, None).expect("bad key");
  let safe_tx_hash = H256(utils::keccak256(b"safe transaction"));

  let signature = wallet.sign_message(safe_tx_hash.as_bytes());
  assert_eq!(signature.len(), 65);
  assert!(signature[64] == 27 || signature[64] == 28);

  let recovered = signer::recover_message(safe_tx_hash.as_bytes(), &signature).expect("recover");
  assert_eq!(recovered, wallet.address());

  let other = signer::recover_message(b"another message", &signature).expect("recover");
  assert_ne!(other, wallet.address());
}

#[test]
fn malformed_signatures() {
  assert!(matches!(
    signer::recover_message(b"msg", &[0u8; 64]),
    Err(Error::Signing(_))
  ));
  let mut sig = vec![1u8; 65];
  sig[64] = 30;
  assert!(matches!(
    signer::recover_message(b"msg", &sig),
    Err(Error::Signing(_))
  ));
}
