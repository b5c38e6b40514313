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

use polkasafe::{
  config,
  deployer::{self, DeployOptions, Deployer},
  utils, Result,
};
use std::path::PathBuf;

async fn run() -> Result<()> {
  let net = config::network_from_env()?;
  let conf = config::load_config(net.as_str())?;
  conf.check_binaries();

  let (web3, wallets) = config::init_web3(&conf, 1, true).await?;
  let deployer_wallet = &wallets[0];
  println!(
    "Deploying contracts with account: {}",
    utils::to_checksum(&deployer_wallet.address())
  );

  let opts = DeployOptions {
    proxy_bytecode_path: PathBuf::from(&conf.proxy_bytecode_path),
    proxy_address: conf.proxy_address()?,
  };
  let deployer = Deployer::new(&web3, deployer_wallet.account(), conf.artifact_store());
  let (addresses, _) =
    deployer::deploy_and_save(&deployer, &conf.deployment_store(), net.as_str(), &opts).await?;

  println!("\nDeployed addresses:");
  for (name, address) in addresses.iter() {
    println!("- {}: {}", name, utils::to_checksum(address));
  }
  Ok(())
}

#[tokio::main]
async fn main() {
  dotenv::dotenv().ok();
  utils::init_logging();

  if let Err(e) = run().await {
    eprintln!("{}", e);
    std::process::exit(1);
  }
  println!("\nAll contracts deployed successfully!");
}
