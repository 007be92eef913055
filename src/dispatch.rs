use serde::{Deserialize, Serialize};
use url::Url;

use crate::feed::norm::Post;
use crate::sink::{Destination, Sink};

/// Binds one destination to one feed. Subscription management lives
/// outside this crate; here a subscriber is just a routing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscriber {
  pub feed_url: Url,
  pub destination: Destination,
}

/// Fan a feed's new posts out to its subscribers: one sink invocation
/// per (new post, matching subscriber) pair. Deduplication already
/// happened in the diff; this layer does no filtering beyond the feed
/// binding and no throttling.
///
/// Posts are delivered to each subscriber in chronological order.
/// Sink failures are logged and skipped so one bad destination cannot
/// starve the others.
pub async fn dispatch(
  new_posts: &[Post],
  subscribers: &[Subscriber],
  sink: &dyn Sink,
) {
  for post in new_posts {
    for subscriber in subscribers {
      if subscriber.feed_url != post.feed_url {
        continue;
      }

      if let Err(error) = sink.deliver(&subscriber.destination, post).await {
        tracing::warn!(
          channel = %subscriber.destination.channel,
          thread = %subscriber.destination.thread,
          post = %post.link,
          "failed to deliver notification: {error}"
        );
      }
    }
  }
}
