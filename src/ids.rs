//! Identifier generation

use chrono::Utc;
use uuid::Uuid;

/// Fresh unique id for tags, presets and history entries
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Collision-proof id for an imported record: `imported-<original>-<stamp>`.
///
/// The stamp combines the current time with a random suffix so that two
/// records sharing an original id in the same document still get distinct ids.
pub fn imported_id(original: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "imported-{}-{}{}",
        original,
        Utc::now().timestamp_millis(),
        &suffix[..8]
    )
}
