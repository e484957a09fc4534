use anyhow::{Result, bail};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug)]
#[command(
    name = "jira-sprint-history",
    version,
    about = "Reconstruct per-day sprint status/effort history from Jira Agile changelogs",
    long_about = None
)]
pub struct Cli {
  /// Base URL of the agile REST endpoint
  #[arg(long, default_value = "http://localhost:3001")]
  pub url: String,

  /// Board id that owns the sprint
  #[arg(long)]
  pub board: String,

  /// Sprint id to reconstruct
  #[arg(long)]
  pub sprint: String,

  /// Output location: file path, or "-" for stdout
  #[arg(long, default_value = "-")]
  pub out: String,

  /// Emit the extended report (sprint + issues + history) instead of the history array
  #[arg(long)]
  pub full: bool,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,

  /// Override the "now" instant anchoring the day window (hidden; tests only)
  #[arg(long = "now-override", hide = true)]
  pub now_override: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EffectiveConfig {
  pub url: String,
  pub board: String,
  pub sprint: String,
  pub out: String,
  pub full: bool,
  pub now_override: Option<String>,
}

pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  if !cli.url.starts_with("http://") && !cli.url.starts_with("https://") {
    bail!("--url must be an http(s) endpoint, got {:?}", cli.url);
  }
  if cli.board.trim().is_empty() || cli.sprint.trim().is_empty() {
    bail!("--board and --sprint must be non-empty");
  }

  Ok(EffectiveConfig {
    url: cli.url,
    board: cli.board,
    sprint: cli.sprint,
    out: cli.out,
    full: cli.full,
    now_override: cli.now_override,
  })
}
