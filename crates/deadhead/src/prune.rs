use chrono::Utc;
use deadhead_retention::{
    RetentionPolicy, group_by_deployment, rank_deployments, select_for_deletion,
};
use deadhead_store::ObjectStore;
use tracing::{error, info};

/// Summary of a single pruning run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PruneOutcome {
    pub retained: usize,
    pub selected: usize,
    pub pruned: usize,
    pub failed: usize,
    pub objects_removed: u64,
}

impl PruneOutcome {
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Runs one pruning pass: list the bucket, rank the deployments, apply the
/// policy, then delete.
///
/// A deletion failure is logged against its deployment and the run moves on
/// to the next one; only the listing phase is fatal.
pub async fn run_prune(
    store: &dyn ObjectStore,
    policy: &RetentionPolicy,
    dry_run: bool,
) -> anyhow::Result<PruneOutcome> {
    let objects = store.list_objects().await?;
    let object_count = objects.len();

    let ranked = rank_deployments(group_by_deployment(objects));
    if ranked.is_empty() {
        info!("Bucket holds no deployments, nothing to prune");
        return Ok(PruneOutcome::default());
    }

    info!(
        "Bucket holds {} object(s) across {} deployment(s)",
        object_count,
        ranked.len()
    );

    let doomed = select_for_deletion(&ranked, policy, Utc::now());

    let mut outcome = PruneOutcome {
        retained: ranked.len() - doomed.len(),
        selected: doomed.len(),
        ..PruneOutcome::default()
    };

    for record in &ranked {
        if doomed.contains(&record.id) {
            info!(
                "Pruning deployment {} (last modified {})",
                record.id, record.last_modified
            );
        } else {
            info!(
                "Retaining deployment {} (last modified {})",
                record.id, record.last_modified
            );
        }
    }

    if dry_run {
        info!("Dry run: {} deployment(s) would be pruned", outcome.selected);
        return Ok(outcome);
    }

    for record in ranked.iter().filter(|record| doomed.contains(&record.id)) {
        match store.delete_deployment(&record.id).await {
            Ok(removed) => {
                info!(
                    "Pruned deployment {} ({} object(s) removed)",
                    record.id, removed
                );
                outcome.pruned += 1;
                outcome.objects_removed += removed;
            }
            Err(e) => {
                error!("Failed to prune deployment {}: {}", record.id, e);
                outcome.failed += 1;
            }
        }
    }

    Ok(outcome)
}
