pub mod artifact;
pub mod config;
pub mod create2;
pub mod deployer;
pub mod deployment;
pub mod error;
pub mod factory;
pub mod safe;
pub mod setup;
pub mod signer;
pub mod simulate;
pub mod transact;
pub mod tx;
pub mod utils;

pub type Result<T> = std::result::Result<T, error::Error>;
