// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Drain the paged sprint-issue collection, tolerating a total that moves between pages
// role: core/pagination
// inputs: AgileApi plus board/sprint identifiers
// outputs: The accumulated issue list with changelog expansion
// invariants:
// - Strictly sequential: page N+1 is requested only after page N's total is observed
// - total is re-read from every page, never cached from the first
// - Terminates when accumulated >= last-observed total (covers a shrinking total)
// - No page-count bound and no deduplication; overlapping pages duplicate issues
// errors: Any page fetch failure aborts and propagates unchanged
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use tracing::debug;

use crate::api::AgileApi;
use crate::error::HistoryError;
use crate::model::Issue;

/// Collect every issue of the sprint's issue list.
///
/// Requests pages at `startAt = accumulated length` until the accumulated
/// count reaches the most recently reported `total`. A total that grows
/// between requests extends the loop; one that shrinks below what is already
/// collected ends it.
pub fn collect_sprint_issues(api: &dyn AgileApi, board_id: &str, sprint_id: &str) -> Result<Vec<Issue>, HistoryError> {
  let mut issues: Vec<Issue> = Vec::new();

  loop {
    let page = api.get_sprint_issues(board_id, sprint_id, issues.len())?;
    let total = page.total;

    debug!(
      received = page.issues.len(),
      accumulated = issues.len() + page.issues.len(),
      total,
      "issue page received"
    );

    issues.extend(page.issues);

    if issues.len() as i64 >= total {
      return Ok(issues);
    }
  }
}
