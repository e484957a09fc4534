// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Define the JSON model (sprint, issues, changelog pages, history report) shared by api, replay, and rendering
// role: model/types
// outputs: Serializable structs mirroring the agile REST shapes plus the report output surface
// invariants: Wire field names match the collaborator (camelCase, toString); issue fields stay raw JSON because the estimation key is per-board
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use serde::{Deserialize, Serialize};

/// Sprint metadata as returned by `sprint/{sprintId}`.
///
/// Only `startDate` participates in the history computation; the rest is
/// carried through so the extended report keeps the raw record intact.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Sprint {
  pub id: i64,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub state: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub start_date: Option<String>,
  #[serde(flatten)]
  pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One work item with its changelog expansion.
///
/// `fields` stays a raw JSON object: the effort value lives under a
/// board-specific key (e.g. `customfield_10002`) that is only discovered at
/// run time, and `created` is read from the same object.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Issue {
  pub key: String,
  pub fields: serde_json::Value,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub changelog: Option<Changelog>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Changelog {
  pub histories: Vec<ChangeHistory>,
}

/// One recorded transition batch: a timestamp plus the fields it touched.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChangeHistory {
  pub created: String,
  pub items: Vec<ChangeItem>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChangeItem {
  pub field: String,
  #[serde(rename = "toString", skip_serializing_if = "Option::is_none")]
  pub to_label: Option<String>,
}

/// One page of `board/{boardId}/sprint/{sprintId}/issue`.
///
/// `total` is re-read from every page; the collector never caches it.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct IssuePage {
  pub total: i64,
  pub issues: Vec<Issue>,
}

/// Response of `issue/{key}/estimation?boardId=...`.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EstimationField {
  pub field_id: String,
}

/// One day of the report: day-string key plus per-status effort sums.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HistoryEntry {
  pub date: String,
  pub stats: std::collections::BTreeMap<String, f64>,
}

/// The extended orchestrator output: raw inputs alongside the derived report.
#[derive(Debug, Serialize, Deserialize)]
pub struct SprintHistory {
  pub sprint: Sprint,
  pub issues: Vec<Issue>,
  pub history: Vec<HistoryEntry>,
}
