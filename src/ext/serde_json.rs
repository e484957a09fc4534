// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Dotted-path access into serde_json::Value for dynamic issue fields (created, customfield_*)
// role: extension/serde_json
// outputs: Pluck trait and Plucked wrapper for typed extraction without panics
// invariants: Missing paths yield None; numeric extraction accepts any JSON number
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use serde::de::DeserializeOwned;

/// A located (or absent) JSON value, ready for a typed second step.
pub struct Plucked<'a> {
  inner: Option<&'a serde_json::Value>,
}

impl<'a> Plucked<'a> {
  /// Deserialize the located value as `T`, `None` on absence or mismatch.
  pub fn to<T>(&self) -> Option<T>
  where
    T: DeserializeOwned,
  {
    self.inner.and_then(|v| serde_json::from_value::<T>(v.clone()).ok())
  }

  /// Read the located value as a float. Integers widen; anything else is `None`.
  pub fn as_f64(&self) -> Option<f64> {
    self.inner.and_then(serde_json::Value::as_f64)
  }

  pub fn is_present(&self) -> bool {
    self.inner.is_some()
  }
}

/// Fetch nested values via dotted paths like `"fields.created"`.
///
/// A single path segment is also the way to read dynamic keys such as the
/// per-board estimation field (`"customfield_10002"`).
pub trait Pluck {
  fn pluck(&self, path: &str) -> Plucked<'_>;
}

impl Pluck for serde_json::Value {
  fn pluck(&self, path: &str) -> Plucked<'_> {
    if path.is_empty() {
      return Plucked { inner: Some(self) };
    }

    let mut cur = self;

    for key in path.split('.') {
      match cur.get(key) {
        Some(next) => cur = next,
        None => return Plucked { inner: None },
      }
    }

    Plucked { inner: Some(cur) }
  }
}
