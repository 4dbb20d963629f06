use std::{path::Path, time::Duration};

use anyhow::Context;
use log::{debug, trace};
use reqwest::blocking::{multipart, Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::json;

use super::{oauth::authorization_header, Publisher};
use crate::{config::Creds, error::PostError};

const UPLOAD_URL: &str = "https://upload.twitter.com/1.1/media/upload.json";
const METADATA_URL: &str = "https://upload.twitter.com/1.1/media/metadata/create.json";
const TWEETS_URL: &str = "https://api.twitter.com/2/tweets";
const ME_URL: &str = "https://api.twitter.com/2/users/me";
const TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking twitter client: v1.1 media endpoints, v2 tweets, OAuth 1.0a user context.
pub(crate) struct TwitterClient {
  http:  Client,
  creds: Creds,
}

#[derive(Deserialize, Debug)]
struct MediaUpload {
  media_id_string: String,
}

#[derive(Deserialize, Debug)]
struct Data<T> {
  data: T,
}

#[derive(Deserialize, Debug)]
struct Created {
  id: String,
}

#[derive(Deserialize, Debug)]
struct Me {
  username: String,
}

impl TwitterClient {
  pub fn new(creds: Creds) -> Result<Self, PostError> {
    let http = Client::builder()
      .timeout(TIMEOUT)
      .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
      .build()?;
    Ok(Self { http, creds })
  }

  fn signed(&self, builder: RequestBuilder, method: &str, url: &str) -> RequestBuilder {
    builder.header(reqwest::header::AUTHORIZATION, authorization_header(method, url, &[], &self.creds))
  }

  fn post(&self, url: &str) -> RequestBuilder { self.signed(self.http.post(url), "POST", url) }

  fn tweet(&self, body: serde_json::Value) -> Result<String, PostError> {
    trace!("tweet body: {body}");
    let response = check(self.post(TWEETS_URL).json(&body).send()?)?;
    let created: Data<Created> = response.json()?;
    Ok(created.data.id)
  }
}

/// Turn a non-2xx response into a [`PostError::Api`] carrying twitter's error body.
fn check(response: Response) -> Result<Response, PostError> {
  let status = response.status();
  if status.is_success() {
    return Ok(response);
  }
  let body = response.text().unwrap_or_default();
  Err(PostError::Api { status, body })
}

impl Publisher for TwitterClient {
  fn authenticate(&mut self) -> Result<(), PostError> {
    let response = self.signed(self.http.get(ME_URL), "GET", ME_URL).send()?;
    let me: Data<Me> = match check(response) {
      Ok(response) => response.json()?,
      Err(PostError::Api { status, body }) => {
        return Err(PostError::Auth(format!("{status}: {body}")))
      },
      Err(err) => return Err(err),
    };
    debug!("authenticated as @{}", me.data.username);
    Ok(())
  }

  fn upload_media(&mut self, path: &Path) -> Result<String, PostError> {
    let form = multipart::Form::new()
      .file("media", path)
      .with_context(|| format!("Could not read frame {path:?}"))?;
    let response = check(self.post(UPLOAD_URL).multipart(form).send()?)?;
    let upload: MediaUpload = response.json()?;
    Ok(upload.media_id_string)
  }

  fn set_alt_text(&mut self, media_id: &str, text: &str) -> Result<(), PostError> {
    let body = json!({ "media_id": media_id, "alt_text": { "text": text } });
    check(self.post(METADATA_URL).json(&body).send()?)?;
    Ok(())
  }

  fn create_post(&mut self, text: &str, media_id: &str) -> Result<String, PostError> {
    let mut body = json!({ "media": { "media_ids": [media_id] } });
    // media-only tweets leave the text out entirely
    if !text.is_empty() {
      body["text"] = json!(text);
    }
    self.tweet(body)
  }

  fn create_reply(&mut self, text: &str, parent_id: &str) -> Result<String, PostError> {
    self.tweet(json!({ "text": text, "reply": { "in_reply_to_tweet_id": parent_id } }))
  }
}
