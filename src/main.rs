use config::{Catalog, Config};
use error::PostError;
use log::{debug, info};
use publish::{publish_frame, DryRun, Publisher, TwitterClient};

use crate::cli::Cli;

mod cli;
mod config;
mod error;
mod frame;
mod publish;
mod template;
mod utils;

const CONFIG_FILE_PATH: &str = "config.json";
const METADATA_FILE_PATH: &str = "metadata.json";

fn main() -> Result<(), PostError> {
  let Cli { config, metadata, dry_run } = utils::setup();
  debug!("config: {config:?}, metadata: {metadata:?}");

  // both files are required; nothing is posted without them
  let config = Config::load(&config)?;
  let catalog = Catalog::load(&metadata)?;

  let mut publisher: Box<dyn Publisher> = if dry_run {
    Box::new(DryRun::default())
  } else {
    Box::new(TwitterClient::new(config.creds.clone())?)
  };

  let report = publish_frame(publisher.as_mut(), &config, &catalog, &mut rand::thread_rng())?;
  info!("published {:?} as {} (media {}): {:?}", report.frame, report.post_id, report.media_id, report.post);
  if let Some(alt_text) = &report.alt_text {
    debug!("alt text: {alt_text:?}");
  }
  if let Some((reply_id, reply)) = &report.reply {
    info!("metadata reply {reply_id}: {reply:?}");
  }
  Ok(())
}
