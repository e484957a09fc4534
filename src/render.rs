use anyhow::{Context, Result};
use serde::Serialize;

/// Write a report as pretty JSON to `out`: stdout for "-", a file otherwise.
/// Parent directories are created as needed.
pub fn write_report<T: Serialize>(out: &str, report: &T) -> Result<()> {
  let text = serde_json::to_string_pretty(report)?;

  if out == "-" {
    println!("{}", text);
    return Ok(());
  }

  let path = std::path::Path::new(out);

  if let Some(parent) = path.parent() {
    if !parent.as_os_str().is_empty() {
      std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
  }

  std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}
