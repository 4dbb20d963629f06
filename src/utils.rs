use clap::Parser;
use log::trace;

use crate::cli::Cli;

/// Set up crate logging and environment variables.
pub(crate) fn setup() -> Cli {
  // a .env is optional, it's only there to set RUST_LOG for scheduled runs
  let dotenv = dotenv::dotenv().ok();
  env_logger::init();
  if let Some(path) = dotenv {
    trace!("loaded dotenv from {path:?}");
  }

  Cli::parse()
}
