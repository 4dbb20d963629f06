use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use rand::Rng;

use crate::{
  config::{Catalog, Config},
  error::PostError,
  frame::select_frame,
  template::render,
};

mod oauth;
mod twitter;

pub(crate) use twitter::TwitterClient;

/// Twitter caps media alt text at 1000 characters.
pub(crate) const ALT_TEXT_MAX_CHARS: usize = 1000;

/// The operations we need from the posting API.
pub(crate) trait Publisher {
  /// Check the credentials before anything gets posted.
  fn authenticate(&mut self) -> Result<(), PostError>;
  /// Upload an image, returning its media id.
  fn upload_media(&mut self, path: &Path) -> Result<String, PostError>;
  fn set_alt_text(&mut self, media_id: &str, text: &str) -> Result<(), PostError>;
  /// Post `text` with the media attached, returning the post id.
  fn create_post(&mut self, text: &str, media_id: &str) -> Result<String, PostError>;
  /// Reply to `parent_id`, returning the reply's id.
  fn create_reply(&mut self, text: &str, parent_id: &str) -> Result<String, PostError>;
}

/// What got posted.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PublishReport {
  pub(crate) frame:    PathBuf,
  pub(crate) media_id: String,
  pub(crate) post_id:  String,
  pub(crate) post:     String,
  pub(crate) alt_text: Option<String>,
  pub(crate) reply:    Option<(String, String)>,
}

/// Authenticate, pick a random frame, post it with its rendered text, and optionally reply with
/// the rendered metadata.
///
/// Nothing is posted if authentication or frame selection fails. A failed reply leaves the
/// primary post up.
pub(crate) fn publish_frame<P: Publisher + ?Sized, R: Rng>(
  publisher: &mut P,
  config: &Config,
  catalog: &Catalog,
  rng: &mut R,
) -> Result<PublishReport, PostError> {
  publisher.authenticate()?;

  let frame = select_frame(&config.frames_path, catalog, rng)?;
  let entry = frame.meta.entry();

  let media_id = publisher.upload_media(&frame.path)?;
  debug!("uploaded {:?} as media {media_id}", frame.path);

  let alt_text = match (entry, &catalog.alt_template) {
    (Some(entry), Some(template)) => {
      let text = truncate_chars(&render(template, Some(entry)), ALT_TEXT_MAX_CHARS);
      publisher.set_alt_text(&media_id, &text)?;
      Some(text)
    },
    _ => None,
  };

  let post = catalog.post_template.as_deref().map(|t| render(t, entry)).unwrap_or_default();
  let post_id = publisher.create_post(&post, &media_id)?;
  info!("posted {post_id}: {post:?}");

  let reply = match (entry, config.meta_reply, &catalog.reply_template) {
    (Some(entry), true, Some(template)) => {
      let text = render(template, Some(entry));
      let reply_id = publisher.create_reply(&text, &post_id)?;
      info!("replied {reply_id} to {post_id}: {text:?}");
      Some((reply_id, text))
    },
    _ => None,
  };

  Ok(PublishReport { frame: frame.path, media_id, post_id, post, alt_text, reply })
}

fn truncate_chars(text: &str, max: usize) -> String {
  match text.char_indices().nth(max) {
    Some((cut, _)) => {
      warn!("alt text is longer than {max} characters, truncating");
      text[..cut].to_string()
    },
    None => text.to_string(),
  }
}

/// Logs what would be posted instead of posting it.
#[derive(Debug, Default)]
pub(crate) struct DryRun {
  posts: usize,
}

impl Publisher for DryRun {
  fn authenticate(&mut self) -> Result<(), PostError> {
    info!("dry run: skipping authentication");
    Ok(())
  }

  fn upload_media(&mut self, path: &Path) -> Result<String, PostError> {
    info!("dry run: would upload {path:?}");
    Ok("dry-run-media".to_string())
  }

  fn set_alt_text(&mut self, media_id: &str, text: &str) -> Result<(), PostError> {
    info!("dry run: would set alt text on {media_id}: {text:?}");
    Ok(())
  }

  fn create_post(&mut self, text: &str, media_id: &str) -> Result<String, PostError> {
    self.posts += 1;
    info!("dry run: would post {text:?} with media {media_id}");
    Ok(format!("dry-run-post-{}", self.posts))
  }

  fn create_reply(&mut self, text: &str, parent_id: &str) -> Result<String, PostError> {
    self.posts += 1;
    info!("dry run: would reply to {parent_id}: {text:?}");
    Ok(format!("dry-run-post-{}", self.posts))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn truncates_on_char_boundaries() {
    assert_eq!(truncate_chars("héllo", 2), "hé");
    assert_eq!(truncate_chars("héllo", 5), "héllo");
    assert_eq!(truncate_chars("", 3), "");
  }

  #[test]
  fn dry_run_numbers_posts() {
    let mut dry = DryRun::default();
    assert_eq!(dry.create_post("a", "m").unwrap(), "dry-run-post-1");
    assert_eq!(dry.create_reply("b", "dry-run-post-1").unwrap(), "dry-run-post-2");
  }
}
