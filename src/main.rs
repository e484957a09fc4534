use anyhow::Result;
use clap::Parser;

mod api;
mod cli;
mod day;
mod error;
mod ext;
mod history;
mod model;
mod paging;
mod render;
mod replay;
mod util;

use crate::cli::{Cli, normalize};

fn main() -> Result<()> {
  let cli = Cli::parse();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  // Diagnostics go to stderr so stdout stays pure JSON.
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_writer(std::io::stderr)
    .init();

  // Phase 1: normalize CLI
  let cfg = normalize(cli)?;

  // Phase 2: resolve the effective "now" anchoring the day window
  let now_opt = util::parse_now_override(cfg.now_override.as_deref());

  // Phase 3: run the orchestration against the configured endpoint
  let api = api::HttpAgileApi::new(&cfg.url);
  let result = history::collect_history(&api, &cfg.board, &cfg.sprint, now_opt)?;

  if cfg.full {
    render::write_report(&cfg.out, &result)
  } else {
    render::write_report(&cfg.out, &result.history)
  }
}
