use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::client::ClientConfig;
use crate::dispatch::Subscriber;
use crate::sink::{Destination, LogSink, Sink, WebhookSink};
use crate::util::{ConfigError, Result};

/// The YAML configuration file: which feeds to track, who subscribes
/// to them, and where notifications go.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
  #[serde(default)]
  pub client: ClientConfig,
  pub feeds: Vec<Url>,
  #[serde(default)]
  pub subscribers: Vec<SubscriberConfig>,
  // singleton_map gives the `webhook: {url: ...}` nested-map shape;
  // plain tagging would demand a `!webhook` YAML tag instead
  #[serde(default, with = "serde_yaml::with::singleton_map")]
  pub sink: SinkConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SubscriberConfig {
  /// The feed this subscriber is bound to
  pub feed: Url,
  /// Identifier pair the sink routes on
  pub channel: String,
  pub thread: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "lowercase")]
pub enum SinkConfig {
  /// Write notifications to the log only
  #[default]
  Log,
  /// POST notifications to an HTTP endpoint
  Webhook {
    url: Url,
  },
}

impl Config {
  pub fn load_from_file(path: &Path) -> Result<Self> {
    let f = std::fs::File::open(path)?;
    let config: Config =
      serde_yaml::from_reader(f).map_err(ConfigError::from)?;
    config.validate()?;
    Ok(config)
  }

  /// A subscriber bound to a feed we never poll would silently
  /// receive nothing; reject that upfront.
  fn validate(&self) -> Result<(), ConfigError> {
    for sub in &self.subscribers {
      if !self.feeds.contains(&sub.feed) {
        return Err(ConfigError::Message(format!(
          "subscriber references untracked feed: {}",
          sub.feed
        )));
      }
    }

    Ok(())
  }

  pub fn subscribers(&self) -> Vec<Subscriber> {
    self
      .subscribers
      .iter()
      .map(|sub| Subscriber {
        feed_url: sub.feed.clone(),
        destination: Destination {
          channel: sub.channel.clone(),
          thread: sub.thread.clone(),
        },
      })
      .collect()
  }

  pub fn build_sink(&self) -> Result<Box<dyn Sink>> {
    match &self.sink {
      SinkConfig::Log => Ok(Box::new(LogSink)),
      SinkConfig::Webhook { url } => {
        Ok(Box::new(WebhookSink::new(url.clone())?))
      }
    }
  }
}
