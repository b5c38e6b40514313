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
  setup::CoreContracts,
  transact::{self, TransferOptions},
  utils, Result,
};

async fn run() -> Result<()> {
  let net = config::network_from_env()?;
  let conf = config::load_config(net.as_str())?;
  conf.check_binaries();

  // fail on a missing deployment before touching the node
  let table = conf.deployment_store().load(net.as_str())?;
  let contracts = CoreContracts::from_table(&table)?;
  let (web3, wallets) = config::init_web3(&conf, 1, false).await?;

  let artifacts = conf.artifact_store();
  let opts = TransferOptions::new()?;
  let report = transact::send_safe_tx(&web3, &artifacts, &wallets, &contracts, &opts).await?;
  println!("Safe: {}", utils::to_checksum(&report.safe));
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
  println!("Safe transaction completed successfully!");
}
