use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors. Anything in here aborts the run; soft failures (bad filenames, missing template
/// fields) never become a `PostError`.
#[derive(Debug, Error)]
pub enum PostError {
  #[error("missing {kind} file '{}'", .path.display())]
  MissingFile { kind: &'static str, path: PathBuf },
  #[error("no frames found in {}", .0.display())]
  NoFrames(PathBuf),
  #[error("authentication failed: {0}")]
  Auth(String),
  #[error("twitter responded with {status}: {body}")]
  Api { status: reqwest::StatusCode, body: String },
  #[error(transparent)]
  Io(#[from] std::io::Error),
  #[error(transparent)]
  Http(#[from] reqwest::Error),
  #[error(transparent)]
  Other(#[from] anyhow::Error),
}
