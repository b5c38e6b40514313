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

use std::process::{Command, Output};

fn run(bin: &str, network: &str, deployment_dir: &std::path::Path) -> Output {
  Command::new(bin)
    .env("NETWORK", network)
    .env("SAFE_DEPLOYMENT_DIR", deployment_dir)
    .env("SAFE_ETH_URL", "http://127.0.0.1:1")
    .env("LOCAL_PRIV_KEY", "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80")
    .output()
    .expect("failed to start binary")
}

#[test]
fn transaction_without_deployment() {
  let dir = tempfile::tempdir().expect("tempdir");
  let output = run(env!("CARGO_BIN_EXE_2_send_safe_tx"), "cli_test_net", dir.path());

  assert_eq!(output.status.code(), Some(1));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("Deployment file not found"), "{}", stderr);
}

#[test]
fn simulation_without_deployment() {
  let dir = tempfile::tempdir().expect("tempdir");
  let output = run(env!("CARGO_BIN_EXE_3_simulate"), "cli_test_net", dir.path());

  assert_eq!(output.status.code(), Some(1));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("Deployment file not found"), "{}", stderr);
}

#[test]
fn transaction_with_incomplete_deployment() {
  let dir = tempfile::tempdir().expect("tempdir");
  std::fs::write(
    dir.path().join("cli_test_net.json"),
    r#"{ "GnosisSafeL2": "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed" }"#,
  )
  .expect("write");
  let output = run(env!("CARGO_BIN_EXE_2_send_safe_tx"), "cli_test_net", dir.path());

  assert_eq!(output.status.code(), Some(1));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(
    stderr.contains("Required contract addresses not found"),
    "{}",
    stderr
  );
  assert!(stderr.contains("GnosisSafeProxyFactory"), "{}", stderr);
}

#[test]
fn simulation_without_accessor() {
  let dir = tempfile::tempdir().expect("tempdir");
  std::fs::write(
    dir.path().join("cli_test_net.json"),
    r#"{
  "GnosisSafeL2": "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
  "GnosisSafeProxyFactory": "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
  "CompatibilityFallbackHandler": "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB"
}"#,
  )
  .expect("write");
  let output = run(env!("CARGO_BIN_EXE_3_simulate"), "cli_test_net", dir.path());

  assert_eq!(output.status.code(), Some(1));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(
    stderr.contains("Required contract addresses not found"),
    "{}",
    stderr
  );
  assert!(stderr.contains("SimulateTxAccessor"), "{}", stderr);
}
