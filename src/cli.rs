use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use url::Url;

use crate::config::Config;
use crate::registry::FeedRegistry;
use crate::update::update_feeds;
use crate::util::Result;

#[derive(Parser)]
pub struct Cli {
  #[clap(subcommand)]
  subcmd: SubCommand,

  #[clap(long, short)]
  config: PathBuf,
}

#[derive(Parser)]
enum SubCommand {
  Run(RunConfig),
  Check(CheckConfig),
}

#[derive(Parser)]
struct RunConfig {
  /// Repeat the update pass at this interval (e.g. "5m", "300s").
  /// Without it a single pass is performed.
  #[clap(long, short, value_parser = parse_duration)]
  interval: Option<Duration>,
}

fn parse_duration(s: &str) -> Result<Duration, String> {
  duration_str::parse(s).map_err(|e| e.to_string())
}

#[derive(Parser)]
struct CheckConfig {
  /// The feed URL to fetch and parse once
  url: Url,
}

impl Cli {
  pub async fn run(self) -> Result<()> {
    let config = Config::load_from_file(&self.config)?;

    match self.subcmd {
      SubCommand::Run(run_config) => run_updates(config, run_config).await,
      SubCommand::Check(check_config) => {
        check_feed(config, &check_config.url).await
      }
    }
  }
}

async fn run_updates(config: Config, run_config: RunConfig) -> Result<()> {
  let client = config.client.build()?;
  let subscribers = config.subscribers();
  let sink = config.build_sink()?;

  let mut registry = FeedRegistry::new();
  for url in &config.feeds {
    registry.register(url.clone());
  }

  loop {
    let summary =
      update_feeds(&client, &mut registry, &subscribers, sink.as_ref()).await;
    tracing::info!(
      feeds = summary.feeds,
      new_posts = summary.new_posts,
      failures = summary.failures,
      "update pass finished"
    );

    match run_config.interval {
      Some(interval) => tokio::time::sleep(interval).await,
      None => return Ok(()),
    }
  }
}

/// Fetch a feed once and report what we make of it. Handy for
/// verifying a URL before adding it to the config.
async fn check_feed(config: Config, url: &Url) -> Result<()> {
  let client = config.client.build()?;
  let document = client.fetch_feed(url).await?;

  println!(
    "{:?} feed \"{}\" with {} entries",
    document.format(),
    document.title(),
    document.entry_count()
  );
  Ok(())
}
