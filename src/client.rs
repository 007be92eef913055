use std::time::Duration;

use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::feed::FeedDocument;
use crate::util::{Error, Result};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ClientConfig {
  user_agent: Option<String>,
  accept: Option<String>,
  /// Bounded per-feed fetch timeout. A hung server must not stall the
  /// whole update pass.
  #[serde(default = "default_timeout")]
  #[serde(deserialize_with = "duration_str::deserialize_duration")]
  timeout: Duration,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      user_agent: None,
      accept: None,
      timeout: default_timeout(),
    }
  }
}

impl ClientConfig {
  fn to_builder(&self) -> reqwest::ClientBuilder {
    let mut builder = reqwest::Client::builder();

    if let Some(user_agent) = &self.user_agent {
      builder = builder.user_agent(user_agent);
    } else {
      builder = builder.user_agent(crate::util::USER_AGENT);
    }

    let mut header_map = HeaderMap::new();
    if let Some(accept) = &self.accept {
      header_map
        .append("Accept", accept.try_into().expect("invalid Accept value"));
    }

    if !header_map.is_empty() {
      builder = builder.default_headers(header_map);
    }

    builder.timeout(self.timeout)
  }

  pub fn build(&self) -> Result<Client> {
    let client = self.to_builder().build()?;
    Ok(Client { client })
  }
}

pub struct Client {
  client: reqwest::Client,
}

impl Client {
  /// Fetch and parse one feed. Network trouble and non-2xx statuses
  /// surface as fetch-kind errors, an unparseable body as a
  /// parse-kind error; the caller decides what to do with either.
  pub async fn fetch_feed(&self, url: &Url) -> Result<FeedDocument> {
    let resp = self.client.get(url.clone()).send().await?;

    let status = resp.status();
    if status.is_client_error() || status.is_server_error() {
      return Err(Error::HttpStatus(status, url.clone()));
    }

    let content_type = resp
      .headers()
      .get("content-type")
      .and_then(|v| v.to_str().ok())
      .and_then(|v| v.parse::<mime::Mime>().ok());
    let body = resp.bytes().await?;

    let text = decode_body(&body, content_type.as_ref());
    FeedDocument::from_xml_content(text.as_bytes())
  }
}

/// Decode the body honoring the charset the server declared, falling
/// back to UTF-8.
fn decode_body(body: &[u8], content_type: Option<&mime::Mime>) -> String {
  let encoding_name = content_type
    .and_then(|mime| mime.get_param("charset").map(|charset| charset.as_str()))
    .unwrap_or("utf-8");
  let encoding = encoding_rs::Encoding::for_label(encoding_name.as_bytes())
    .unwrap_or(encoding_rs::UTF_8);

  let (text, _, _) = encoding.decode(body);
  text.into_owned()
}

fn default_timeout() -> Duration {
  Duration::from_secs(10)
}
