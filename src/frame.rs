use std::{
  fs,
  path::{Path, PathBuf},
};

use anyhow::Context;
use log::{debug, info};
use rand::Rng;
use serde_json::Value;

use crate::{
  config::{Catalog, Entry},
  error::PostError,
};

/// What we could learn about a frame from its filename.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FrameMeta {
  /// Catalog entry, annotated with `id` and `frame_id`.
  Entry(Entry),
  /// Filename didn't parse, or the episode isn't in the catalog. Still postable.
  Bare,
}

impl FrameMeta {
  pub fn entry(&self) -> Option<&Entry> {
    match self {
      FrameMeta::Entry(entry) => Some(entry),
      FrameMeta::Bare => None,
    }
  }
}

/// A randomly chosen image, ready to upload.
#[derive(Debug, Clone)]
pub(crate) struct Frame {
  pub(crate) path: PathBuf,
  pub(crate) meta: FrameMeta,
}

/// Resolve a filename like `frame_1x01_episode-title_01234.jpg` against the catalog.
///
/// The name must split on `_` into exactly four parts: prefix, episode id, slug, and frame id
/// with extension. Anything else is [`FrameMeta::Bare`].
pub(crate) fn resolve_meta(filename: &str, catalog: &Catalog) -> FrameMeta {
  let parts: Vec<&str> = filename.split('_').collect();
  let [_, ep_id, _, frame_part] = parts.as_slice() else {
    debug!("{filename:?} has {} underscore segments, posting without metadata", parts.len());
    return FrameMeta::Bare;
  };
  if ep_id.is_empty() {
    return FrameMeta::Bare;
  }

  let Some(entry) = catalog.entries.get(*ep_id) else {
    debug!("no catalog entry for episode {ep_id:?}");
    return FrameMeta::Bare;
  };

  let frame_id = frame_part.rsplit_once('.').map_or(*frame_part, |(stem, _ext)| stem);
  let mut entry = entry.clone();
  entry.insert("id".to_string(), Value::String(ep_id.to_string()));
  entry.insert("frame_id".to_string(), Value::String(frame_id.to_string()));
  FrameMeta::Entry(entry)
}

/// Pick one frame uniformly at random from `frames_path` and resolve its metadata.
pub(crate) fn select_frame<R: Rng>(
  frames_path: &Path,
  catalog: &Catalog,
  rng: &mut R,
) -> Result<Frame, PostError> {
  let frames = list_frames(frames_path)?;
  if frames.is_empty() {
    return Err(PostError::NoFrames(frames_path.to_path_buf()));
  }

  let path = frames[rng.gen_range(0..frames.len())].clone();
  // non-utf8 names can still be posted, they just never match the catalog
  let meta = match path.file_name().and_then(|name| name.to_str()) {
    Some(name) => resolve_meta(name, catalog),
    None => FrameMeta::Bare,
  };
  info!("selected frame {path:?} out of {}", frames.len());
  Ok(Frame { path, meta })
}

/// Files in `dir` (symlinks followed), dotfiles skipped, sorted by name.
fn list_frames(dir: &Path) -> Result<Vec<PathBuf>, PostError> {
  let read_dir =
    fs::read_dir(dir).with_context(|| format!("Could not read frames directory {dir:?}"))?;
  let mut frames = Vec::new();
  for dir_entry in read_dir {
    let dir_entry = dir_entry?;
    if dir_entry.file_name().to_string_lossy().starts_with('.') {
      continue;
    }
    let path = dir_entry.path();
    if path.is_file() {
      frames.push(path);
    }
  }
  frames.sort();
  Ok(frames)
}
