// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Typed error taxonomy for the sprint-history run (transport, empty sprint, malformed data)
// role: errors/types
// outputs: HistoryError consumed by the orchestrator and surfaced through anyhow at the CLI boundary
// invariants:
// - Transport failures carry the request context and the underlying source error
// - No error is retried or recovered inside the core; all abort the run
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use thiserror::Error;

/// Failures that abort a sprint-history run.
#[derive(Debug, Error)]
pub enum HistoryError {
  /// A fetch against the agile API failed (network, HTTP status, or an
  /// undecodable transport layer). Propagated unchanged; never retried.
  #[error("agile api request failed ({context})")]
  Transport {
    context: String,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
  },

  /// The sprint's issue list came back empty, so there is no representative
  /// issue to discover the estimation field from.
  #[error("sprint {sprint_id} has no issues to analyze")]
  NoIssues { sprint_id: String },

  /// A response was structurally not what the endpoint contract promises
  /// (missing changelog, non-numeric estimation, unparseable timestamp, ...).
  #[error("malformed response: {detail}")]
  Malformed { detail: String },
}

impl HistoryError {
  pub fn transport(context: impl Into<String>, source: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Transport {
      context: context.into(),
      source: Box::new(source),
    }
  }

  pub fn malformed(detail: impl Into<String>) -> Self {
    Self::Malformed { detail: detail.into() }
  }
}
