use deadhead_retention::RetentionPolicy;
use thiserror::Error;

use crate::cli::Args;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("--num-deployments cannot be combined with --prune-older-than-days")]
    ConflictingModes,

    #[error("either --num-deployments or --prune-older-than-days is required")]
    MissingMode,

    #[error("--prune-older-than-days requires --keep-min-deployments")]
    MissingKeepMin,

    #[error("--num-deployments must be greater than zero")]
    NonPositiveCount,

    #[error("--prune-older-than-days must be greater than zero")]
    NonPositiveAge,
}

/// Turns the parsed flags into the single retention policy for this run.
///
/// Clap already rejects an age mode without its keep floor; the rule is
/// enforced again here so the resolver stands on its own.
pub fn resolve_policy(args: &Args) -> Result<RetentionPolicy, ConfigError> {
    match (args.num_deployments, args.prune_older_than_days) {
        (Some(_), Some(_)) => Err(ConfigError::ConflictingModes),
        (None, None) => Err(ConfigError::MissingMode),
        (Some(0), None) => Err(ConfigError::NonPositiveCount),
        (Some(keep), None) => Ok(RetentionPolicy::KeepCount { keep }),
        (None, Some(days)) if days <= 0 => Err(ConfigError::NonPositiveAge),
        (None, Some(days)) => {
            let keep_min = args
                .keep_min_deployments
                .ok_or(ConfigError::MissingKeepMin)?;
            Ok(RetentionPolicy::KeepNewerThan { days, keep_min })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn base_args() -> Args {
        Args {
            bucket_name: "deployments".to_string(),
            num_deployments: None,
            prune_older_than_days: None,
            keep_min_deployments: None,
            access_key: None,
            secret_key: None,
            region: None,
            endpoint_url: None,
            force_path_style: false,
            dry_run: false,
        }
    }

    #[test]
    fn test_count_mode_resolves_to_keep_count() {
        let mut args = base_args();
        args.num_deployments = Some(4);

        assert_eq!(
            resolve_policy(&args),
            Ok(RetentionPolicy::KeepCount { keep: 4 })
        );
    }

    #[test]
    fn test_age_mode_resolves_to_keep_newer_than() {
        let mut args = base_args();
        args.prune_older_than_days = Some(30);
        args.keep_min_deployments = Some(2);

        assert_eq!(
            resolve_policy(&args),
            Ok(RetentionPolicy::KeepNewerThan {
                days: 30,
                keep_min: 2
            })
        );
    }

    #[test]
    fn test_both_modes_conflict() {
        let mut args = base_args();
        args.num_deployments = Some(4);
        args.prune_older_than_days = Some(30);
        args.keep_min_deployments = Some(2);

        assert_eq!(resolve_policy(&args), Err(ConfigError::ConflictingModes));
    }

    #[test]
    fn test_neither_mode_is_rejected() {
        assert_eq!(resolve_policy(&base_args()), Err(ConfigError::MissingMode));
    }

    #[test]
    fn test_age_mode_without_floor_is_rejected() {
        let mut args = base_args();
        args.prune_older_than_days = Some(30);

        assert_eq!(resolve_policy(&args), Err(ConfigError::MissingKeepMin));
    }

    #[test]
    fn test_zero_deployments_to_keep_is_rejected() {
        let mut args = base_args();
        args.num_deployments = Some(0);

        assert_eq!(resolve_policy(&args), Err(ConfigError::NonPositiveCount));
    }

    #[test]
    fn test_non_positive_age_is_rejected() {
        for days in [0, -7] {
            let mut args = base_args();
            args.prune_older_than_days = Some(days);
            args.keep_min_deployments = Some(2);

            assert_eq!(resolve_policy(&args), Err(ConfigError::NonPositiveAge));
        }
    }

    #[test]
    fn test_zero_keep_floor_is_allowed() {
        let mut args = base_args();
        args.prune_older_than_days = Some(30);
        args.keep_min_deployments = Some(0);

        assert_eq!(
            resolve_policy(&args),
            Ok(RetentionPolicy::KeepNewerThan {
                days: 30,
                keep_min: 0
            })
        );
    }

    #[test]
    fn test_parser_requires_the_floor_alongside_the_age_flag() {
        let parsed = Args::try_parse_from([
            "deadhead",
            "--bucket-name",
            "deployments",
            "--prune-older-than-days",
            "30",
        ]);

        assert!(parsed.is_err());
    }
}
