use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use url::Url;

use super::{FeedDocument, RawEntry};

/// Substituted when an entry carries no meaningful author text,
/// whether the field is missing or an empty string.
pub const UNKNOWN_AUTHOR: &str = "unknown";

/// Substituted when an entry has no description container at all.
pub const NO_DESCRIPTION: &str = "None";

/// Canonical record of one feed entry. Immutable once created; the
/// registry only ever appends these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
  pub feed_url: Url,
  pub title: String,
  pub author: String,
  pub link: String,
  pub description: String,
  pub published: Option<DateTime<FixedOffset>>,
  pub updated: Option<DateTime<FixedOffset>>,
}

/// Deduplication key. Feeds provide no stable server-assigned id, so
/// (link, title) is the identity of a post: both fields must match for
/// an entry to count as already known. A changed title under the same
/// link is a different post.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PostKey {
  pub link: String,
  pub title: String,
}

impl Post {
  /// Convert a raw entry into a canonical Post. Pure and total:
  /// malformed input yields defaulted fields, never an error.
  pub fn normalize(entry: &RawEntry, feed_url: &Url) -> Self {
    let author = match entry.author() {
      Some(author) if !author.is_empty() => author.to_string(),
      _ => UNKNOWN_AUTHOR.to_string(),
    };

    let description = match entry.description() {
      Some(description) => description.to_string(),
      None => NO_DESCRIPTION.to_string(),
    };

    // title and link pass through verbatim, empty when the source
    // omits them
    Post {
      feed_url: feed_url.clone(),
      title: entry.title().unwrap_or_default().to_string(),
      author,
      link: entry.link().unwrap_or_default().to_string(),
      description,
      published: entry.published(),
      updated: entry.updated(),
    }
  }

  pub fn key(&self) -> PostKey {
    PostKey {
      link: self.link.clone(),
      title: self.title.clone(),
    }
  }
}

/// A parsed feed document reduced to its title and normalized posts,
/// ordered oldest first.
#[derive(Debug, Clone)]
pub struct NormalizedFeed {
  pub title: String,
  pub posts: Vec<Post>,
}

impl FeedDocument {
  /// Normalize the whole document. Raw entries arrive newest first;
  /// the result is reversed so that index order is publication order.
  /// Everything downstream (diffing, dispatch) relies on this.
  pub fn normalize(mut self, feed_url: &Url) -> NormalizedFeed {
    let title = self.title().to_string();
    let posts = self
      .take_entries()
      .iter()
      .rev()
      .map(|entry| Post::normalize(entry, feed_url))
      .collect();

    NormalizedFeed { title, posts }
  }
}

#[cfg(test)]
mod test {
  use super::*;

  fn feed_url() -> Url {
    Url::parse("https://blog.example.com/feed.xml").unwrap()
  }

  fn rss_entry(
    title: Option<&str>,
    author: Option<&str>,
    description: Option<&str>,
  ) -> RawEntry {
    RawEntry::Rss(rss::Item {
      title: title.map(str::to_string),
      link: Some("https://blog.example.com/1".into()),
      author: author.map(str::to_string),
      description: description.map(str::to_string),
      ..Default::default()
    })
  }

  #[test]
  fn test_default_substitution() {
    let entry = rss_entry(Some("a post"), Some(""), None);
    let post = Post::normalize(&entry, &feed_url());

    assert_eq!(post.author, "unknown");
    assert_eq!(post.description, "None");
  }

  #[test]
  fn test_missing_author_is_unknown() {
    let entry = rss_entry(Some("a post"), None, Some("hi"));
    let post = Post::normalize(&entry, &feed_url());

    assert_eq!(post.author, "unknown");
    assert_eq!(post.description, "hi");
  }

  #[test]
  fn test_present_fields_pass_through() {
    let entry = rss_entry(Some("a post"), Some("Alice"), Some("hi"));
    let post = Post::normalize(&entry, &feed_url());

    assert_eq!(post.author, "Alice");
    assert_eq!(post.description, "hi");
    assert_eq!(post.title, "a post");
    assert_eq!(post.link, "https://blog.example.com/1");
    assert_eq!(post.feed_url, feed_url());
  }

  #[test]
  fn test_missing_title_stored_verbatim() {
    let entry = rss_entry(None, Some("Alice"), Some("hi"));
    let post = Post::normalize(&entry, &feed_url());

    assert_eq!(post.title, "");
  }

  #[test]
  fn test_key_is_link_and_title() {
    let entry = rss_entry(Some("a post"), None, None);
    let post = Post::normalize(&entry, &feed_url());

    let key = post.key();
    assert_eq!(key.link, "https://blog.example.com/1");
    assert_eq!(key.title, "a post");
  }

  #[test]
  fn test_normalize_document_reverses_to_oldest_first() {
    const FEED: &str = r#"<?xml version="1.0"?>
      <rss version="2.0">
        <channel>
          <title>Example Blog</title>
          <link>https://blog.example.com</link>
          <description>An example</description>
          <item><title>E3</title><link>https://e/3</link></item>
          <item><title>E2</title><link>https://e/2</link></item>
          <item><title>E1</title><link>https://e/1</link></item>
        </channel>
      </rss>"#;

    let doc = FeedDocument::from_xml_content(FEED.as_bytes()).unwrap();
    let normalized = doc.normalize(&feed_url());

    assert_eq!(normalized.title, "Example Blog");
    let titles: Vec<_> =
      normalized.posts.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["E1", "E2", "E3"]);
  }
}
