use std::collections::HashMap;
use std::collections::hash_map::Entry;

use chrono::{DateTime, Utc};

/// A single stored object as reported by the bucket listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfo {
    pub key: String,
    pub last_modified: DateTime<Utc>,
}

/// One deployment: a top-level key prefix and the newest write under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRecord {
    pub id: String,
    pub last_modified: DateTime<Utc>,
}

/// Collapses a raw object listing into one record per deployment.
///
/// The deployment id is the part of the key before the first `/`; a key
/// without a separator counts as a deployment of its own. Each record carries
/// the newest `last_modified` seen among its objects.
pub fn group_by_deployment<I>(objects: I) -> HashMap<String, DeploymentRecord>
where
    I: IntoIterator<Item = ObjectInfo>,
{
    let mut deployments: HashMap<String, DeploymentRecord> = HashMap::new();

    for ObjectInfo { key, last_modified } in objects {
        let id = match key.split_once('/') {
            Some((deployment, _)) => deployment.to_string(),
            None => key,
        };

        match deployments.entry(id) {
            Entry::Occupied(mut occupied) => {
                let record = occupied.get_mut();
                if last_modified > record.last_modified {
                    record.last_modified = last_modified;
                }
            }
            Entry::Vacant(vacant) => {
                let id = vacant.key().clone();
                vacant.insert(DeploymentRecord { id, last_modified });
            }
        }
    }

    deployments
}

/// Orders deployments newest first.
///
/// Records with equal timestamps fall back to deployment id order so the
/// ranking is stable across runs.
pub fn rank_deployments(deployments: HashMap<String, DeploymentRecord>) -> Vec<DeploymentRecord> {
    let mut ranked: Vec<DeploymentRecord> = deployments.into_values().collect();
    ranked.sort_by(|a, b| {
        b.last_modified
            .cmp(&a.last_modified)
            .then_with(|| a.id.cmp(&b.id))
    });
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, 12, 0, 0).unwrap()
    }

    fn object(key: &str, last_modified: DateTime<Utc>) -> ObjectInfo {
        ObjectInfo {
            key: key.to_string(),
            last_modified,
        }
    }

    #[test]
    fn test_groups_by_first_path_segment() {
        let deployments = group_by_deployment(vec![
            object("app-a/index.html", day(1)),
            object("app-a/assets/main.js", day(3)),
            object("app-b/index.html", day(2)),
        ]);

        assert_eq!(deployments.len(), 2);
        assert_eq!(deployments["app-a"].last_modified, day(3));
        assert_eq!(deployments["app-b"].last_modified, day(2));
    }

    #[test]
    fn test_record_keeps_the_newest_timestamp_regardless_of_order() {
        let deployments = group_by_deployment(vec![
            object("app-a/new", day(9)),
            object("app-a/old", day(2)),
        ]);

        assert_eq!(deployments["app-a"].last_modified, day(9));
    }

    #[test]
    fn test_key_without_separator_is_its_own_deployment() {
        let deployments = group_by_deployment(vec![object("manifest.json", day(4))]);

        assert_eq!(deployments.len(), 1);
        assert_eq!(deployments["manifest.json"].id, "manifest.json");
    }

    #[test]
    fn test_nested_keys_group_under_the_top_segment() {
        let deployments = group_by_deployment(vec![object("app-a/assets/img/logo.svg", day(5))]);

        assert!(deployments.contains_key("app-a"));
    }

    #[test]
    fn test_empty_listing_groups_to_nothing() {
        assert!(group_by_deployment(Vec::new()).is_empty());
    }

    #[test]
    fn test_ranks_newest_first() {
        let deployments = group_by_deployment(vec![
            object("app-a/f", day(2)),
            object("app-b/f", day(8)),
            object("app-c/f", day(5)),
        ]);

        let ranked = rank_deployments(deployments);
        let ids: Vec<&str> = ranked.iter().map(|record| record.id.as_str()).collect();

        assert_eq!(ids, ["app-b", "app-c", "app-a"]);
    }

    #[test]
    fn test_ranking_does_not_depend_on_map_iteration_order() {
        let listing = vec![
            object("app-a/f", day(4)),
            object("app-b/f", day(4)),
            object("app-c/f", day(4)),
            object("app-d/f", day(9)),
        ];

        let first = rank_deployments(group_by_deployment(listing.clone()));
        let second = rank_deployments(group_by_deployment(listing));

        assert_eq!(first, second);
    }

    #[test]
    fn test_equal_timestamps_rank_by_id() {
        let deployments = group_by_deployment(vec![
            object("zeta/f", day(6)),
            object("alpha/f", day(6)),
            object("mid/f", day(7)),
        ]);

        let ranked = rank_deployments(deployments);
        let ids: Vec<&str> = ranked.iter().map(|record| record.id.as_str()).collect();

        assert_eq!(ids, ["mid", "alpha", "zeta"]);
    }
}
