pub mod date;

pub const USER_AGENT: &str =
  concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("YAML parse error")]
  Yaml(#[from] serde_yaml::Error),

  #[error("{0}")]
  Message(String),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("IO error")]
  Io(#[from] std::io::Error),

  #[error("Invalid URL {0}")]
  InvalidUrl(#[from] url::ParseError),

  #[error("Reqwest client error {0:?}")]
  Reqwest(#[from] reqwest::Error),

  #[error("HTTP status error {0} (url: {1})")]
  HttpStatus(http::StatusCode, url::Url),

  #[error("RSS error")]
  Rss(#[from] rss::Error),

  #[error("Atom error")]
  Atom(#[from] atom_syndication::Error),

  #[error("Feed parsing error {0:?}")]
  FeedParse(&'static str),

  #[error("Config error {0:?}")]
  Config(#[from] ConfigError),

  #[error("{0}")]
  Message(String),
}

/// Coarse classification used by the update loop to tell a failed
/// fetch from a document that fetched fine but would not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  Fetch,
  Parse,
  Other,
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Error::Reqwest(_) | Error::HttpStatus(..) => ErrorKind::Fetch,
      Error::Rss(_) | Error::Atom(_) | Error::FeedParse(_) => ErrorKind::Parse,
      _ => ErrorKind::Other,
    }
  }
}
