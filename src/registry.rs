use std::collections::{HashMap, HashSet};

use url::Url;

use crate::feed::norm::{Post, PostKey};

/// A registered feed. The URL is the identity and never changes; the
/// title tracks whatever the document last reported.
#[derive(Debug, Clone)]
pub struct FeedRecord {
  pub url: Url,
  pub title: Option<String>,
}

/// A feed's cumulative record of previously seen posts. Append-only:
/// posts are never updated or removed, and the (link, title) key is
/// unique within one feed.
#[derive(Debug, Default)]
pub struct KnownPosts {
  posts: Vec<Post>,
  keys: HashSet<PostKey>,
}

impl KnownPosts {
  pub fn contains(&self, key: &PostKey) -> bool {
    self.keys.contains(key)
  }

  /// Returns false (and keeps the collection unchanged) when a post
  /// with the same key is already present.
  pub fn insert(&mut self, post: Post) -> bool {
    if !self.keys.insert(post.key()) {
      return false;
    }

    self.posts.push(post);
    true
  }

  #[allow(unused)]
  pub fn posts(&self) -> &[Post] {
    &self.posts
  }

  #[allow(unused)]
  pub fn len(&self) -> usize {
    self.posts.len()
  }

  #[allow(unused)]
  pub fn is_empty(&self) -> bool {
    self.posts.is_empty()
  }
}

#[derive(Debug)]
struct FeedState {
  record: FeedRecord,
  known: KnownPosts,
}

/// Owns all per-feed state for one process: which feeds are tracked
/// and which posts have been seen for each. Mutated only by the
/// sequential update pass.
#[derive(Debug, Default)]
pub struct FeedRegistry {
  feeds: HashMap<Url, FeedState>,
}

impl FeedRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn register(&mut self, url: Url) {
    self.feeds.entry(url.clone()).or_insert_with(|| FeedState {
      record: FeedRecord { url, title: None },
      known: KnownPosts::default(),
    });
  }

  #[allow(unused)]
  pub fn deregister(&mut self, url: &Url) {
    self.feeds.remove(url);
  }

  #[allow(unused)]
  pub fn contains(&self, url: &Url) -> bool {
    self.feeds.contains_key(url)
  }

  /// Registered feed URLs, sorted for a deterministic update order.
  pub fn feed_urls(&self) -> Vec<Url> {
    let mut urls: Vec<_> =
      self.feeds.values().map(|state| state.record.url.clone()).collect();
    urls.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    urls
  }

  pub fn record(&self, url: &Url) -> Option<&FeedRecord> {
    self.feeds.get(url).map(|state| &state.record)
  }

  pub fn set_title(&mut self, url: &Url, title: &str) {
    if let Some(state) = self.feeds.get_mut(url) {
      state.record.title = Some(title.to_string());
    }
  }

  pub fn known_posts(&self, url: &Url) -> Option<&KnownPosts> {
    self.feeds.get(url).map(|state| &state.known)
  }

  /// The diff engine. Walk the server entries oldest to newest and
  /// keep those whose (link, title) key is not yet known for this
  /// feed. Each new post is appended to the known set as part of the
  /// same pass, so running the diff twice against an unchanged
  /// snapshot yields nothing the second time.
  ///
  /// Entries for an unregistered feed are ignored entirely.
  pub fn diff_new_posts(&mut self, url: &Url, entries: Vec<Post>) -> Vec<Post> {
    let Some(state) = self.feeds.get_mut(url) else {
      return Vec::new();
    };

    let mut new_posts = Vec::new();
    for post in entries {
      if state.known.contains(&post.key()) {
        continue;
      }

      state.known.insert(post.clone());
      new_posts.push(post);
    }

    new_posts
  }
}

#[cfg(test)]
mod test {
  use super::*;

  fn feed_url() -> Url {
    Url::parse("https://blog.example.com/feed.xml").unwrap()
  }

  fn post(title: &str, link: &str) -> Post {
    Post {
      feed_url: feed_url(),
      title: title.to_string(),
      author: "unknown".to_string(),
      link: link.to_string(),
      description: "None".to_string(),
      published: None,
      updated: None,
    }
  }

  fn registry() -> FeedRegistry {
    let mut registry = FeedRegistry::new();
    registry.register(feed_url());
    registry
  }

  #[test]
  fn test_all_unknown_entries_are_new_in_order() {
    let mut registry = registry();

    // entries already reversed to chronological order by the parser
    let entries =
      vec![post("E1", "https://e/1"), post("E2", "https://e/2"), post("E3", "https://e/3")];
    let new_posts = registry.diff_new_posts(&feed_url(), entries);

    let titles: Vec<_> = new_posts.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["E1", "E2", "E3"]);
    assert_eq!(registry.known_posts(&feed_url()).unwrap().len(), 3);
  }

  #[test]
  fn test_second_pass_is_empty() {
    let mut registry = registry();
    let entries = vec![post("E1", "https://e/1"), post("E2", "https://e/2")];

    let first = registry.diff_new_posts(&feed_url(), entries.clone());
    assert_eq!(first.len(), 2);

    let second = registry.diff_new_posts(&feed_url(), entries);
    assert!(second.is_empty());
  }

  #[test]
  fn test_only_unknown_entries_reported() {
    let mut registry = registry();
    registry
      .diff_new_posts(&feed_url(), vec![post("E1", "https://e/1")]);

    let entries = vec![
      post("E1", "https://e/1"),
      post("E2", "https://e/2"),
      post("E3", "https://e/3"),
    ];
    let new_posts = registry.diff_new_posts(&feed_url(), entries);

    let titles: Vec<_> = new_posts.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["E2", "E3"]);
  }

  #[test]
  fn test_key_requires_both_link_and_title() {
    let mut registry = registry();
    registry
      .diff_new_posts(&feed_url(), vec![post("E1", "https://e/1")]);

    // same link, different title: a new post
    let renamed = registry
      .diff_new_posts(&feed_url(), vec![post("E1 edited", "https://e/1")]);
    assert_eq!(renamed.len(), 1);

    // same title, different link: also a new post
    let moved = registry
      .diff_new_posts(&feed_url(), vec![post("E1", "https://e/1-moved")]);
    assert_eq!(moved.len(), 1);
  }

  #[test]
  fn test_known_posts_reject_duplicate_key() {
    let mut known = KnownPosts::default();
    assert!(known.insert(post("E1", "https://e/1")));
    assert!(!known.insert(post("E1", "https://e/1")));
    assert_eq!(known.len(), 1);
  }

  #[test]
  fn test_unregistered_feed_yields_nothing() {
    let mut registry = FeedRegistry::new();
    let new_posts =
      registry.diff_new_posts(&feed_url(), vec![post("E1", "https://e/1")]);
    assert!(new_posts.is_empty());
  }

  #[test]
  fn test_title_refresh() {
    let mut registry = registry();
    registry.set_title(&feed_url(), "Example Blog");
    assert_eq!(
      registry.record(&feed_url()).unwrap().title.as_deref(),
      Some("Example Blog")
    );
  }
}
