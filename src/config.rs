use std::{
  collections::BTreeMap,
  fs,
  path::{Path, PathBuf},
};

use anyhow::Context;
use log::debug;
use serde::{de::DeserializeOwned, Deserialize};

use crate::error::PostError;

/// One episode's metadata: arbitrary named fields, e.g. `{"title": "Pilot"}`.
pub(crate) type Entry = serde_json::Map<String, serde_json::Value>;

/// The json config file: where the frames live, twitter creds, and behavior flags.
#[derive(Deserialize, Debug, Clone)]
pub(crate) struct Config {
  pub(crate) frames_path: PathBuf,
  pub(crate) creds:       Creds,
  #[serde(default)]
  pub(crate) meta_reply:  bool,
}

/// OAuth 1.0a user-context credentials.
#[derive(Deserialize, Clone)]
pub(crate) struct Creds {
  pub(crate) consumer_key:    String,
  pub(crate) consumer_secret: String,
  pub(crate) access_token:    String,
  pub(crate) access_secret:   String,
}

// keep secrets out of debug logs
impl std::fmt::Debug for Creds {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Creds")
      .field("consumer_key", &self.consumer_key)
      .field("access_token", &self.access_token)
      .finish_non_exhaustive()
  }
}

/// The json metadata file: per-episode entries plus the text templates.
#[derive(Deserialize, Debug, Clone, Default)]
pub(crate) struct Catalog {
  #[serde(default)]
  pub(crate) entries:        BTreeMap<String, Entry>,
  pub(crate) post_template:  Option<String>,
  pub(crate) reply_template: Option<String>,
  pub(crate) alt_template:   Option<String>,
}

impl Config {
  /// Load the config file. A relative `frames_path` is resolved against the config file's
  /// directory, so the bot can be run from anywhere (e.g. cron).
  pub fn load(path: &Path) -> Result<Self, PostError> {
    let mut config: Config = read_json("config", path)?;
    if config.frames_path.is_relative() {
      let base = path.parent().unwrap_or_else(|| Path::new(""));
      config.frames_path = base.join(&config.frames_path);
    }
    debug!("loaded config: {config:?}");
    Ok(config)
  }
}

impl Catalog {
  pub fn load(path: &Path) -> Result<Self, PostError> {
    let catalog: Catalog = read_json("metadata", path)?;
    debug!("loaded {} catalog entries from {path:?}", catalog.entries.len());
    Ok(catalog)
  }
}

fn read_json<T: DeserializeOwned>(kind: &'static str, path: &Path) -> Result<T, PostError> {
  if !path.exists() {
    return Err(PostError::MissingFile { kind, path: path.to_path_buf() });
  }
  let content =
    fs::read_to_string(path).with_context(|| format!("Could not read {kind} file {path:?}"))?;
  let parsed = serde_json::from_str(&content)
    .with_context(|| format!("Could not parse {kind} file {path:?}"))?;
  Ok(parsed)
}
