use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::feed::norm::Post;
use crate::util::Result;

/// Where a notification ends up. The pair of identifiers is opaque to
/// this crate; only the sink knows how to interpret it (a chat and a
/// thread within it, a channel and a topic, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Destination {
  pub channel: String,
  pub thread: String,
}

/// Renders a post into a destination. Delivery failures are reported
/// back but the caller treats them as fire-and-forget: they are
/// logged, never retried or propagated.
#[async_trait]
pub trait Sink: Send + Sync {
  async fn deliver(&self, destination: &Destination, post: &Post)
    -> Result<()>;
}

/// Plain-text rendering of a post, shared by the bundled sinks.
pub fn render_message(post: &Post) -> String {
  let mut message = format!("{}\nby {}", post.title, post.author);

  if let Some(published) = post.published {
    message.push_str(&format!("\n{}", published.to_rfc2822()));
  }

  message.push_str(&format!("\n\n{}\n\n{}", post.description, post.link));
  message
}

/// Sink that only writes to the log. Useful for dry runs and as the
/// default when no webhook is configured.
#[derive(Debug, Default)]
pub struct LogSink;

#[async_trait]
impl Sink for LogSink {
  async fn deliver(
    &self,
    destination: &Destination,
    post: &Post,
  ) -> Result<()> {
    tracing::info!(
      channel = %destination.channel,
      thread = %destination.thread,
      "{}",
      render_message(post)
    );
    Ok(())
  }
}

/// Sink that POSTs one JSON payload per notification to a fixed
/// endpoint. The receiver is responsible for routing on the
/// destination pair.
pub struct WebhookSink {
  endpoint: Url,
  client: reqwest::Client,
}

impl WebhookSink {
  pub fn new(endpoint: Url) -> Result<Self> {
    let client = reqwest::Client::builder()
      .user_agent(crate::util::USER_AGENT)
      .timeout(std::time::Duration::from_secs(10))
      .build()?;

    Ok(Self { endpoint, client })
  }
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
  destination: &'a Destination,
  post: &'a Post,
  message: String,
}

#[async_trait]
impl Sink for WebhookSink {
  async fn deliver(
    &self,
    destination: &Destination,
    post: &Post,
  ) -> Result<()> {
    let payload = WebhookPayload {
      destination,
      post,
      message: render_message(post),
    };

    self
      .client
      .post(self.endpoint.clone())
      .json(&payload)
      .send()
      .await?
      .error_for_status()?;

    Ok(())
  }
}
