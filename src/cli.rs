use std::path::PathBuf;

use clap::Parser;

use crate::{CONFIG_FILE_PATH, METADATA_FILE_PATH};

#[derive(Parser, Debug)]
#[clap(version = "0.1.0", author = "Thor Kamphefner")]
#[command(name = "post-frame")]
#[command(bin_name = "post-frame")]
#[command(about = "post a random frame, with optional metadata, to twitter")]
pub struct Cli {
  /// Config file with the frames directory, twitter creds and flags.
  #[arg(short, long, default_value = CONFIG_FILE_PATH)]
  pub config:   PathBuf,
  /// Metadata file with per-episode entries and the post templates.
  #[arg(short, long, default_value = METADATA_FILE_PATH)]
  pub metadata: PathBuf,
  /// Pick and render a frame, but log instead of posting.
  #[arg(long)]
  pub dry_run:  bool,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults() {
    let cli = Cli::try_parse_from(["post-frame"]).unwrap();
    assert_eq!(cli.config, PathBuf::from("config.json"));
    assert_eq!(cli.metadata, PathBuf::from("metadata.json"));
    assert!(!cli.dry_run);
  }

  #[test]
  fn overrides() {
    let cli =
      Cli::try_parse_from(["post-frame", "-c", "bot/config.json", "--metadata", "m.json", "--dry-run"])
        .unwrap();
    assert_eq!(cli.config, PathBuf::from("bot/config.json"));
    assert_eq!(cli.metadata, PathBuf::from("m.json"));
    assert!(cli.dry_run);
  }
}
