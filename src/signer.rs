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
use ethcontract::{Account, Address, PrivateKey};
use std::convert::TryInto;

/// An account key usable both for offline transaction signing and for
/// personal-message signatures.
#[derive(Clone)]
pub struct Wallet {
  secret: libsecp256k1::SecretKey,
  private_key: PrivateKey,
  address: Address,
  chain_id: Option<u64>,
}

impl std::fmt::Debug for Wallet {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Wallet")
      .field("address", &self.address)
      .field("chain_id", &self.chain_id)
      .finish()
  }
}

impl Wallet {
  pub fn from_bytes(bytes: &[u8; 32], chain_id: Option<u64>) -> Result<Self> {
    let secret = libsecp256k1::SecretKey::parse(bytes).map_err(|_| Error::InvalidPrivateKey)?;
    let private_key = PrivateKey::from_raw(*bytes).map_err(|_| Error::InvalidPrivateKey)?;
    let public_key = libsecp256k1::PublicKey::from_secret_key(&secret);
    Ok(Self {
      secret,
      private_key,
      address: public_key_address(&public_key),
      chain_id,
    })
  }

  /// Parses a hex encoded key, `0x` prefix optional.
  pub fn from_hex(key: &str, chain_id: Option<u64>) -> Result<Self> {
    let mut sk_bytes = [0u8; 32];
    let key = key.trim();
    hex::decode_to_slice(key.strip_prefix("0x").unwrap_or(key), &mut sk_bytes as &mut [u8])?;
    Self::from_bytes(&sk_bytes, chain_id)
  }

  pub fn address(&self) -> Address {
    self.address
  }

  pub fn chain_id(&self) -> Option<u64> {
    self.chain_id
  }

  pub fn account(&self) -> Account {
    Account::Offline(self.private_key.clone(), self.chain_id)
  }

  /// Personal-message signature (`eth_sign` / `personal_sign`): the message
  /// is hashed with the `"\x19Ethereum Signed Message:\n" ‖ len` prefix and
  /// the result is `r ‖ s ‖ v` with `v` in {27, 28}.
  pub fn sign_message(&self, message: &[u8]) -> Vec<u8> {
    let hash = hash_message(message);
    let (signature, recovery_id) =
      libsecp256k1::sign(&libsecp256k1::Message::parse(&hash), &self.secret);
    let mut sigvec = signature.serialize().to_vec();
    sigvec.push(recovery_id.serialize() + 27);
    sigvec
  }
}

pub fn hash_message(message: &[u8]) -> [u8; 32] {
  let mut prefixed = format!("\x19Ethereum Signed Message:\n{}", message.len()).into_bytes();
  prefixed.extend_from_slice(message);
  utils::keccak256(&prefixed)
}

/// Recovers the signer of a personal-message signature produced by
/// [`Wallet::sign_message`].
pub fn recover_message(message: &[u8], signature: &[u8]) -> Result<Address> {
  if signature.len() != 65 {
    return Err(Error::Signing(format!(
      "signature must be 65 bytes, got {}",
      signature.len()
    )));
  }
  let v = signature[64];
  let recovery_byte = match v {
    27 | 28 => v - 27,
    0 | 1 => v,
    _ => return Err(Error::Signing(format!("invalid recovery id {}", v))),
  };
  let rs: [u8; 64] = signature[..64]
    .try_into()
    .map_err(|_| Error::Signing("malformed signature".to_string()))?;
  let sig = libsecp256k1::Signature::parse_standard(&rs)
    .map_err(|e| Error::Signing(format!("{:?}", e)))?;
  let recovery_id = libsecp256k1::RecoveryId::parse(recovery_byte)
    .map_err(|e| Error::Signing(format!("{:?}", e)))?;
  let hash = hash_message(message);
  let public_key = libsecp256k1::recover(&libsecp256k1::Message::parse(&hash), &sig, &recovery_id)
    .map_err(|e| Error::Signing(format!("{:?}", e)))?;
  Ok(public_key_address(&public_key))
}

fn public_key_address(public_key: &libsecp256k1::PublicKey) -> Address {
  let public_key = public_key.serialize();
  debug_assert_eq!(public_key[0], 0x04);
  let hash = utils::keccak256(&public_key[1..]);
  Address::from_slice(&hash[12..])
}
