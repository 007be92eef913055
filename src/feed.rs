pub mod norm;

use chrono::{DateTime, FixedOffset};

use crate::util::{date, Error, Result};

/// A fetched feed document, before normalization. Thin wrapper over
/// the two supported syndication formats.
#[derive(Clone, Debug)]
pub enum FeedDocument {
  Rss(rss::Channel),
  Atom(atom_syndication::Feed),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedFormat {
  /// RSS 2.0
  Rss,
  /// Atom 1.0
  Atom,
}

impl FeedDocument {
  pub fn format(&self) -> FeedFormat {
    match self {
      FeedDocument::Rss(_) => FeedFormat::Rss,
      FeedDocument::Atom(_) => FeedFormat::Atom,
    }
  }

  pub fn from_rss_content(content: &[u8]) -> Result<Self> {
    let cursor = std::io::Cursor::new(content);
    let channel = rss::Channel::read_from(cursor)?;
    Ok(FeedDocument::Rss(channel))
  }

  pub fn from_atom_content(content: &[u8]) -> Result<Self> {
    let cursor = std::io::Cursor::new(content);
    let feed = atom_syndication::Feed::read_from(cursor)?;
    Ok(FeedDocument::Atom(feed))
  }

  pub fn from_xml_content(content: &[u8]) -> Result<Self> {
    FeedDocument::from_rss_content(content)
      .or_else(|_| FeedDocument::from_atom_content(content))
      .map_err(|_| Error::FeedParse("neither RSS nor Atom"))
  }

  pub fn title(&self) -> &str {
    match self {
      FeedDocument::Rss(channel) => &channel.title,
      FeedDocument::Atom(feed) => feed.title.as_str(),
    }
  }

  /// Entries in document order. Syndication formats conventionally
  /// list the newest entry first.
  pub fn take_entries(&mut self) -> Vec<RawEntry> {
    match self {
      FeedDocument::Rss(channel) => {
        let items = channel.items.split_off(0);
        items.into_iter().map(RawEntry::Rss).collect()
      }
      FeedDocument::Atom(feed) => {
        let entries = feed.entries.split_off(0);
        entries.into_iter().map(RawEntry::Atom).collect()
      }
    }
  }

  pub fn entry_count(&self) -> usize {
    match self {
      FeedDocument::Rss(channel) => channel.items.len(),
      FeedDocument::Atom(feed) => feed.entries.len(),
    }
  }
}

/// One raw entry of a feed document. Accessors return None whenever
/// the source omits the field; defaulting happens in normalization,
/// not here.
#[derive(Clone, Debug)]
pub enum RawEntry {
  Rss(rss::Item),
  Atom(atom_syndication::Entry),
}

enum EntryField {
  Title,
  Link,
  Author,
  Description,
}

impl RawEntry {
  fn get_field(&self, field: EntryField) -> Option<&str> {
    match (self, field) {
      (RawEntry::Rss(item), EntryField::Title) => item.title.as_deref(),
      (RawEntry::Rss(item), EntryField::Link) => item.link.as_deref(),
      (RawEntry::Rss(item), EntryField::Author) => item.author.as_deref(),
      (RawEntry::Rss(item), EntryField::Description) => {
        item.description.as_deref()
      }
      (RawEntry::Atom(entry), EntryField::Title) => Some(&entry.title.value),
      (RawEntry::Atom(entry), EntryField::Link) => {
        entry.links.first().map(|link| link.href.as_str())
      }
      (RawEntry::Atom(entry), EntryField::Author) => {
        entry.authors.first().map(|person| person.name.as_str())
      }
      (RawEntry::Atom(entry), EntryField::Description) => {
        entry.summary.as_ref().map(|text| text.value.as_str())
      }
    }
  }

  pub fn title(&self) -> Option<&str> {
    self.get_field(EntryField::Title)
  }

  pub fn link(&self) -> Option<&str> {
    self.get_field(EntryField::Link)
  }

  pub fn author(&self) -> Option<&str> {
    self.get_field(EntryField::Author)
  }

  pub fn description(&self) -> Option<&str> {
    self.get_field(EntryField::Description)
  }

  pub fn published(&self) -> Option<DateTime<FixedOffset>> {
    match self {
      RawEntry::Rss(item) => item.pub_date.as_deref().and_then(date::parse_date),
      RawEntry::Atom(entry) => entry.published,
    }
  }

  pub fn updated(&self) -> Option<DateTime<FixedOffset>> {
    match self {
      // RSS 2.0 has no per-item updated date
      RawEntry::Rss(_) => None,
      RawEntry::Atom(entry) => Some(entry.updated),
    }
  }
}
