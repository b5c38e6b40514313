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

use crate::{error::Error, Result};
use ethcontract::prelude::{Address, H160, U256};
use std::str::FromStr;

const ETHER_DECIMALS: usize = 18;

pub fn zero_address() -> Address {
  Address::zero()
}

pub fn address_or_default(address: Option<&str>) -> Result<H160> {
  if let Some(a) = address {
    let a = a.trim();
    Ok(H160::from_str(a.strip_prefix("0x").unwrap_or(a))?)
  } else {
    Ok(zero_address())
  }
}

pub fn keccak256(bytes: &[u8]) -> [u8; 32] {
  use tiny_keccak::{Hasher, Keccak};
  let mut output = [0u8; 32];
  let mut hasher = Keccak::v256();
  hasher.update(bytes);
  hasher.finalize(&mut output);
  output
}

/// Decodes a hex string, with or without a `0x` prefix.
pub fn decode_hex(s: &str) -> Result<Vec<u8>> {
  let s = s.trim();
  Ok(hex::decode(s.strip_prefix("0x").unwrap_or(s))?)
}

/// EIP-55 mixed-case rendering of an address.
pub fn to_checksum(address: &Address) -> String {
  let lower = hex::encode(address.as_bytes());
  let hash = keccak256(lower.as_bytes());
  let mut out = String::with_capacity(42);
  out.push_str("0x");
  for (i, c) in lower.chars().enumerate() {
    let nibble = (hash[i / 2] >> (if i % 2 == 0 { 4 } else { 0 })) & 0x0f;
    if c.is_ascii_alphabetic() && nibble >= 8 {
      out.push(c.to_ascii_uppercase());
    } else {
      out.push(c);
    }
  }
  out
}

/// Parses a decimal amount of native currency ("0.0123") into wei.
pub fn parse_ether(amount: &str) -> Result<U256> {
  let amount = amount.trim();
  let (whole, frac) = match amount.split_once('.') {
    Some((w, f)) => (w, f),
    None => (amount, ""),
  };
  if frac.len() > ETHER_DECIMALS {
    return Err(Error::Other(format!("too many decimals in {}", amount)));
  }
  if whole.is_empty() && frac.is_empty() {
    return Err(Error::Other("empty amount".to_string()));
  }
  let digits = format!("{}{:0<width$}", whole, frac, width = ETHER_DECIMALS);
  U256::from_dec_str(&digits)
    .map_err(|e| Error::Other(format!("invalid amount {}: {:?}", amount, e)))
}

pub fn format_ether(wei: U256) -> String {
  let digits = format!("{:0>width$}", wei.to_string(), width = ETHER_DECIMALS + 1);
  let (whole, frac) = digits.split_at(digits.len() - ETHER_DECIMALS);
  let frac = frac.trim_end_matches('0');
  if frac.is_empty() {
    format!("{}.0", whole)
  } else {
    format!("{}.{}", whole, frac)
  }
}

pub fn ether(units: u64) -> U256 {
  U256::from(units) * U256::exp10(ETHER_DECIMALS)
}

/// Installs the fmt subscriber used by the binaries; `log` records are
/// forwarded to it. Filter comes from `RUST_LOG`, defaulting to `info`.
pub fn init_logging() {
  use tracing_subscriber::EnvFilter;
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .try_init();
}
