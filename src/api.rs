// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Seam to the agile REST collaborator: the three read operations the history engine consumes
// role: api/client
// inputs: Explicit base URL configuration; board/sprint/issue identifiers
// outputs: Typed Sprint, IssuePage, and EstimationField values
// side_effects: Network calls against {base_url}/rest/agile/1.0
// invariants:
// - Base URL is constructor state, never process-wide mutable configuration
// - No retries, no timeouts imposed here; transport policy belongs to the agent/caller
// errors: Failed calls map to Transport; undecodable bodies map to Malformed
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use serde::de::DeserializeOwned;

use crate::error::HistoryError;
use crate::model::{EstimationField, IssuePage, Sprint};

const API_PREFIX: &str = "rest/agile/1.0";

/// The three read operations the history engine consumes.
///
/// `Sync` so the orchestrator can issue the sprint and issue fetches from
/// separate scoped threads against one shared client.
pub trait AgileApi: Sync {
  /// `sprint/{sprintId}` — sprint metadata (start date et al).
  fn get_sprint(&self, sprint_id: &str) -> Result<Sprint, HistoryError>;

  /// `board/{boardId}/sprint/{sprintId}/issue` with changelog expansion,
  /// one page starting at the zero-based offset `start_at`.
  fn get_sprint_issues(&self, board_id: &str, sprint_id: &str, start_at: usize) -> Result<IssuePage, HistoryError>;

  /// `issue/{key}/estimation?boardId=...` — the board's effort field id.
  fn get_estimation_field(&self, issue_key: &str, board_id: &str) -> Result<EstimationField, HistoryError>;
}

/// Blocking HTTP implementation of [`AgileApi`].
pub struct HttpAgileApi {
  agent: ureq::Agent,
  base_url: String,
}

impl HttpAgileApi {
  pub fn new(base_url: impl Into<String>) -> Self {
    let agent: ureq::Agent = ureq::Agent::config_builder().build().into();
    let base_url = base_url.into().trim_end_matches('/').to_string();

    Self { agent, base_url }
  }

  fn url(&self, resource: &str) -> String {
    format!("{}/{}/{}", self.base_url, API_PREFIX, resource)
  }

  fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, &str)]) -> Result<T, HistoryError> {
    let mut req = self.agent.get(url).header("Accept", "application/json");

    for (k, v) in query {
      req = req.query(*k, *v);
    }

    let mut resp = req.call().map_err(|e| HistoryError::transport(format!("GET {url}"), e))?;

    resp
      .body_mut()
      .read_json::<T>()
      .map_err(|e| HistoryError::malformed(format!("GET {url}: undecodable body ({e})")))
  }
}

impl AgileApi for HttpAgileApi {
  fn get_sprint(&self, sprint_id: &str) -> Result<Sprint, HistoryError> {
    self.get_json(&self.url(&format!("sprint/{sprint_id}")), &[])
  }

  fn get_sprint_issues(&self, board_id: &str, sprint_id: &str, start_at: usize) -> Result<IssuePage, HistoryError> {
    let start = start_at.to_string();
    self.get_json(
      &self.url(&format!("board/{board_id}/sprint/{sprint_id}/issue")),
      &[("expand", "changelog"), ("startAt", &start)],
    )
  }

  fn get_estimation_field(&self, issue_key: &str, board_id: &str) -> Result<EstimationField, HistoryError> {
    self.get_json(&self.url(&format!("issue/{issue_key}/estimation")), &[("boardId", board_id)])
  }
}
