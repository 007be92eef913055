use async_trait::async_trait;
use url::Url;

use crate::client::Client;
use crate::dispatch::{dispatch, Subscriber};
use crate::feed::FeedDocument;
use crate::registry::FeedRegistry;
use crate::sink::Sink;
use crate::util::{Error, Result};

/// Seam over the HTTP client so the update loop can be exercised
/// without a network.
#[async_trait]
pub trait FetchFeed: Send + Sync {
  async fn fetch(&self, url: &Url) -> Result<FeedDocument>;
}

#[async_trait]
impl FetchFeed for Client {
  async fn fetch(&self, url: &Url) -> Result<FeedDocument> {
    self.fetch_feed(url).await
  }
}

/// What happened to one feed during a pass.
#[derive(Debug)]
pub enum FeedOutcome {
  Updated { new_posts: usize },
  Failed(Error),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UpdateSummary {
  pub feeds: usize,
  pub new_posts: usize,
  pub failures: usize,
}

/// One sequential pass over every registered feed: fetch, normalize,
/// diff against the known posts, fan new posts out to subscribers.
///
/// A fetch or parse failure is confined to its feed: the error is
/// logged and the pass moves on, on the theory that the next pass
/// will retry. No error escapes this entry point.
pub async fn update_feeds(
  fetcher: &dyn FetchFeed,
  registry: &mut FeedRegistry,
  subscribers: &[Subscriber],
  sink: &dyn Sink,
) -> UpdateSummary {
  let mut summary = UpdateSummary::default();

  for url in registry.feed_urls() {
    summary.feeds += 1;

    let outcome =
      update_feed(fetcher, registry, &url, subscribers, sink).await;
    match outcome {
      FeedOutcome::Updated { new_posts } => {
        if new_posts > 0 {
          tracing::info!(feed = %url, new_posts, "feed updated");
        }
        summary.new_posts += new_posts;
      }
      FeedOutcome::Failed(error) => {
        tracing::warn!(
          feed = %url,
          kind = ?error.kind(),
          "skipping feed this pass: {error}"
        );
        summary.failures += 1;
      }
    }
  }

  summary
}

async fn update_feed(
  fetcher: &dyn FetchFeed,
  registry: &mut FeedRegistry,
  url: &Url,
  subscribers: &[Subscriber],
  sink: &dyn Sink,
) -> FeedOutcome {
  let document = match fetcher.fetch(url).await {
    Ok(document) => document,
    Err(error) => return FeedOutcome::Failed(error),
  };

  let normalized = document.normalize(url);
  registry.set_title(url, &normalized.title);

  let new_posts = registry.diff_new_posts(url, normalized.posts);
  dispatch(&new_posts, subscribers, sink).await;

  FeedOutcome::Updated {
    new_posts: new_posts.len(),
  }
}
