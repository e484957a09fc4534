// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Walk the sprint's day window per issue, aggregate effort per day per status, and orchestrate the full run
// role: core/orchestrator
// inputs: AgileApi, board/sprint identifiers, optional now override
// outputs: SprintHistory (raw sprint + issues + ordered per-day report)
// invariants:
// - Sprint metadata and the issue list are fetched concurrently and joined before anything else
// - Validation (prepare_issue, startDate) completes before the walk; the walk itself cannot fail
// - The table has one writer; day keys keep first-populated order (reverse-chronological)
// - An empty issue list is the NoIssues error, never an index into issues[0]
// errors: Transport/NoIssues/Malformed from phases 1-3; phase 4 is pure
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Local};
use tracing::{debug, info};

use crate::api::AgileApi;
use crate::day::DayMarker;
use crate::error::HistoryError;
use crate::model::{HistoryEntry, Sprint, SprintHistory};
use crate::paging;
use crate::replay::{self, TrackedIssue};

/// Per-day, per-status effort sums, remembering the order in which day keys
/// were first populated. Local to one run; single writer.
#[derive(Debug, Default)]
pub struct DailyStatusTable {
  order: Vec<String>,
  stats: HashMap<String, BTreeMap<String, f64>>,
}

impl DailyStatusTable {
  pub fn add(&mut self, day: String, status: &str, estimation: f64) {
    let per_day = match self.stats.get_mut(&day) {
      Some(existing) => existing,
      None => {
        self.order.push(day.clone());
        self.stats.entry(day).or_default()
      }
    };

    *per_day.entry(status.to_string()).or_insert(0.0) += estimation;
  }

  /// Consume the table into the ordered report.
  pub fn into_report(mut self) -> Vec<HistoryEntry> {
    self
      .order
      .into_iter()
      .map(|date| {
        let stats = self.stats.remove(&date).unwrap_or_default();
        HistoryEntry { date, stats }
      })
      .collect()
  }
}

/// Walk one issue across the day window, newest day first, accumulating its
/// effort under the status it had at each day's end. Days on which the issue
/// did not exist contribute nothing.
fn walk_issue(table: &mut DailyStatusTable, issue: &TrackedIssue, sprint: &Sprint, today: DayMarker, window_start: DayMarker) {
  debug!(issue = %issue.key, estimation = issue.estimation, "processing issue");

  let mut day = today;

  while day >= window_start {
    if let Some(status) = replay::status_at(issue, day, sprint) {
      table.add(day.date_key(), status, issue.estimation);
    }

    day = day.prev_day();
  }
}

/// Fetch everything for the sprint and derive its day-by-day history.
///
/// Returns the extended variant: the raw sprint, the raw issue list, and the
/// ordered report. Use [`history_report`] when only the report is wanted.
pub fn collect_history(
  api: &dyn AgileApi,
  board_id: &str,
  sprint_id: &str,
  now: Option<DateTime<Local>>,
) -> Result<SprintHistory, HistoryError> {
  // Phase 1: fetch sprint metadata and drain the issue pages concurrently.
  // The pagination loop runs on this thread; the sprint fetch is joined
  // before anything downstream looks at either result.
  let (sprint_res, issues_res) = std::thread::scope(|scope| {
    let sprint_handle = scope.spawn(|| api.get_sprint(sprint_id));
    let issues_res = paging::collect_sprint_issues(api, board_id, sprint_id);
    (sprint_handle.join(), issues_res)
  });

  let sprint = match sprint_res {
    Ok(res) => res?,
    Err(payload) => std::panic::resume_unwind(payload),
  };
  let issues = issues_res?;

  // Phase 2: discover the estimation field from a representative issue.
  // The field is assumed uniform across the sprint's issues.
  let first = issues.first().ok_or_else(|| HistoryError::NoIssues {
    sprint_id: sprint_id.to_string(),
  })?;
  let field = api.get_estimation_field(&first.key, board_id)?;

  // Phase 3: validate every issue into its replayable form and resolve the
  // window bounds; all data-shape failures surface here.
  let tracked: Vec<TrackedIssue> = issues
    .iter()
    .map(|issue| replay::prepare_issue(issue, &field.field_id))
    .collect::<Result<_, _>>()?;

  let start_raw = sprint
    .start_date
    .as_deref()
    .ok_or_else(|| HistoryError::malformed(format!("sprint {sprint_id} has no startDate")))?;
  let window_start = DayMarker::from_timestamp(start_raw)?.prev_day();
  let today = DayMarker::today(now);

  info!(
    issues = tracked.len(),
    window_start = %window_start.date_key(),
    today = %today.date_key(),
    "replaying sprint history"
  );

  // Phase 4: pure walk over already-validated data.
  let mut table = DailyStatusTable::default();

  for issue in &tracked {
    walk_issue(&mut table, issue, &sprint, today, window_start);
  }

  Ok(SprintHistory {
    sprint,
    issues,
    history: table.into_report(),
  })
}

/// Report-only convenience over [`collect_history`].
pub fn history_report(
  api: &dyn AgileApi,
  board_id: &str,
  sprint_id: &str,
  now: Option<DateTime<Local>>,
) -> Result<Vec<HistoryEntry>, HistoryError> {
  collect_history(api, board_id, sprint_id, now).map(|h| h.history)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::{EstimationField, Issue, IssuePage};
  use chrono::TimeZone;
  use std::sync::Mutex;

  fn fixed_now() -> DateTime<Local> {
    Local.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).single().unwrap()
  }

  fn sprint_json() -> serde_json::Value {
    serde_json::json!({ "id": 42, "state": "active", "startDate": "2024-03-01T08:00:00.000+0000" })
  }

  fn issue_json(key: &str, created: &str, estimation: f64, transitions: &[(&str, &str)]) -> serde_json::Value {
    let histories: Vec<serde_json::Value> = transitions
      .iter()
      .map(|(ts, to)| {
        serde_json::json!({ "created": ts, "items": [{ "field": "status", "toString": to }] })
      })
      .collect();

    serde_json::json!({
      "key": key,
      "fields": { "created": created, "customfield_10002": estimation },
      "changelog": { "histories": histories }
    })
  }

  /// Scripted collaborator: one sprint, a fixed page script, one field id.
  struct ScriptedApi {
    sprint: serde_json::Value,
    pages: Vec<IssuePage>,
    cursor: Mutex<usize>,
  }

  impl ScriptedApi {
    fn new(sprint: serde_json::Value, issues: Vec<serde_json::Value>) -> Self {
      let issues: Vec<Issue> = issues.into_iter().map(|v| serde_json::from_value(v).unwrap()).collect();
      let total = issues.len() as i64;
      Self {
        sprint,
        pages: vec![IssuePage { total, issues }],
        cursor: Mutex::new(0),
      }
    }
  }

  impl AgileApi for ScriptedApi {
    fn get_sprint(&self, _sprint_id: &str) -> Result<Sprint, HistoryError> {
      Ok(serde_json::from_value(self.sprint.clone()).unwrap())
    }

    fn get_sprint_issues(&self, _b: &str, _s: &str, _at: usize) -> Result<IssuePage, HistoryError> {
      let mut cursor = self.cursor.lock().unwrap();
      let page = self.pages[*cursor].clone();
      *cursor += 1;
      Ok(page)
    }

    fn get_estimation_field(&self, _k: &str, _b: &str) -> Result<EstimationField, HistoryError> {
      Ok(EstimationField {
        field_id: "customfield_10002".into(),
      })
    }
  }

  #[test]
  fn empty_sprint_is_the_no_issues_error() {
    let api = ScriptedApi::new(sprint_json(), vec![]);
    let err = collect_history(&api, "3", "42", Some(fixed_now())).unwrap_err();
    assert!(matches!(err, HistoryError::NoIssues { .. }), "got {err}");
  }

  #[test]
  fn issue_created_after_window_end_contributes_nothing() {
    let api = ScriptedApi::new(
      sprint_json(),
      vec![issue_json("PR-1", "2024-03-15T09:00:00.000+0000", 3.0, &[])],
    );

    let out = collect_history(&api, "3", "42", Some(fixed_now())).unwrap();
    assert!(out.history.is_empty());
  }

  #[test]
  fn issue_older_than_window_covers_every_day_once() {
    let api = ScriptedApi::new(
      sprint_json(),
      vec![issue_json("PR-1", "2024-02-01T09:00:00.000+0000", 3.0, &[])],
    );

    let out = collect_history(&api, "3", "42", Some(fixed_now())).unwrap();
    // today 2024-03-10 down to window start 2024-02-29 inclusive: 11 days.
    assert_eq!(out.history.len(), 11);
    assert!(out.history.iter().all(|e| e.stats == BTreeMap::from([("To Do".to_string(), 3.0)])));
  }

  #[test]
  fn report_days_run_reverse_chronological_with_quirky_keys() {
    let api = ScriptedApi::new(
      sprint_json(),
      vec![issue_json("PR-1", "2024-02-01T09:00:00.000+0000", 1.0, &[])],
    );

    let out = collect_history(&api, "3", "42", Some(fixed_now())).unwrap();
    let dates: Vec<&str> = out.history.iter().map(|e| e.date.as_str()).collect();
    assert_eq!(dates.first().copied(), Some("2024-2-10"));
    assert_eq!(dates.last().copied(), Some("2024-1-29"));
  }

  #[test]
  fn efforts_accumulate_per_day_per_status() {
    let api = ScriptedApi::new(
      sprint_json(),
      vec![
        issue_json(
          "PR-1",
          "2024-03-01T09:00:00.000+0000",
          3.0,
          &[("2024-03-02T10:00:00.000+0000", "In Progress")],
        ),
        issue_json(
          "PR-2",
          "2024-03-01T09:30:00.000+0000",
          5.0,
          &[("2024-03-02T11:00:00.000+0000", "In Progress")],
        ),
      ],
    );

    let out = collect_history(&api, "3", "42", Some(fixed_now())).unwrap();
    let day = out.history.iter().find(|e| e.date == "2024-2-5").unwrap();
    assert_eq!(day.stats.get("In Progress").copied(), Some(8.0));
  }

  #[test]
  fn zero_and_negative_efforts_accumulate_as_given() {
    let api = ScriptedApi::new(
      sprint_json(),
      vec![
        issue_json("PR-1", "2024-03-01T09:00:00.000+0000", 0.0, &[]),
        issue_json("PR-2", "2024-03-01T09:30:00.000+0000", -2.0, &[]),
      ],
    );

    let out = collect_history(&api, "3", "42", Some(fixed_now())).unwrap();
    let day = out.history.iter().find(|e| e.date == "2024-2-5").unwrap();
    assert_eq!(day.stats.get("To Do").copied(), Some(-2.0));
  }

  #[test]
  fn repeated_runs_yield_byte_identical_reports() {
    let build = || {
      ScriptedApi::new(
        sprint_json(),
        vec![
          issue_json(
            "PR-1",
            "2024-03-01T09:00:00.000+0000",
            3.0,
            &[("2024-03-04T10:00:00.000+0000", "Done")],
          ),
          issue_json("PR-2", "2024-03-06T09:00:00.000+0000", 2.0, &[]),
        ],
      )
    };

    let a = collect_history(&build(), "3", "42", Some(fixed_now())).unwrap();
    let b = collect_history(&build(), "3", "42", Some(fixed_now())).unwrap();
    assert_eq!(serde_json::to_vec(&a.history).unwrap(), serde_json::to_vec(&b.history).unwrap());
  }

  #[test]
  fn sprint_without_start_date_is_malformed() {
    let api = ScriptedApi::new(
      serde_json::json!({ "id": 42, "state": "future" }),
      vec![issue_json("PR-1", "2024-03-01T09:00:00.000+0000", 1.0, &[])],
    );

    let err = collect_history(&api, "3", "42", Some(fixed_now())).unwrap_err();
    assert!(err.to_string().contains("startDate"));
  }

  #[test]
  fn report_only_wrapper_matches_extended_history() {
    let api = ScriptedApi::new(
      sprint_json(),
      vec![issue_json("PR-1", "2024-03-01T09:00:00.000+0000", 1.0, &[])],
    );
    let report = history_report(&api, "3", "42", Some(fixed_now())).unwrap();

    let api = ScriptedApi::new(
      sprint_json(),
      vec![issue_json("PR-1", "2024-03-01T09:00:00.000+0000", 1.0, &[])],
    );
    let extended = collect_history(&api, "3", "42", Some(fixed_now())).unwrap();

    assert_eq!(report, extended.history);
  }
}
