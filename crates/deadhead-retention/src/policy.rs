use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};

use crate::deployment::DeploymentRecord;

/// How a run decides which deployments survive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetentionPolicy {
    /// Keep the `keep` newest deployments and delete everything ranked below
    /// them.
    KeepCount { keep: usize },
    /// Keep the `keep_min` newest deployments no matter their age, then keep
    /// anything modified within the last `days` days. Only deployments past
    /// the floor and older than the cutoff are deleted.
    KeepNewerThan { days: i64, keep_min: usize },
}

/// Applies `policy` to a ranked deployment list and returns the ids to
/// delete.
///
/// `ranked` must be ordered newest first (see
/// [`rank_deployments`](crate::deployment::rank_deployments)). `now` is the
/// instant the age cutoff is computed from, taken once per run. Candidates
/// past the keep floor are judged one by one, so a young record survives even
/// when records ranked above it get deleted. A window too large to represent
/// puts the cutoff before any representable instant, so nothing qualifies.
pub fn select_for_deletion(
    ranked: &[DeploymentRecord],
    policy: &RetentionPolicy,
    now: DateTime<Utc>,
) -> HashSet<String> {
    match policy {
        RetentionPolicy::KeepCount { keep } => ranked
            .iter()
            .skip(*keep)
            .map(|record| record.id.clone())
            .collect(),
        RetentionPolicy::KeepNewerThan { days, keep_min } => {
            let cutoff = Duration::try_days(*days)
                .and_then(|window| now.checked_sub_signed(window));
            let Some(cutoff) = cutoff else {
                return HashSet::new();
            };
            ranked
                .iter()
                .skip(*keep_min)
                .filter(|record| record.last_modified < cutoff)
                .map(|record| record.id.clone())
                .collect()
        }
    }
}
