use clap::Parser;

/// Prune stale deployments from an S3 bucket.
///
/// Deployments are the top-level key prefixes of the bucket; each one is
/// aged by the newest object beneath it. Exactly one of the two pruning
/// modes must be chosen per run.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Bucket holding the deployments.
    #[arg(long)]
    pub bucket_name: String,

    /// Keep only the N newest deployments and prune the rest.
    #[arg(long, value_name = "N")]
    pub num_deployments: Option<usize>,

    /// Prune deployments whose newest object is older than DAYS days.
    #[arg(long, value_name = "DAYS", requires = "keep_min_deployments")]
    pub prune_older_than_days: Option<i64>,

    /// Never prune below this many deployments when pruning by age.
    #[arg(long, value_name = "N")]
    pub keep_min_deployments: Option<usize>,

    /// AWS access key; the SDK default chain is used when keys are absent.
    #[arg(long, env = "AWS_ACCESS_KEY_ID")]
    pub access_key: Option<String>,

    /// AWS secret key.
    #[arg(long, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// AWS region of the bucket.
    #[arg(long)]
    pub region: Option<String>,

    /// Custom endpoint for S3-compatible stores.
    #[arg(long)]
    pub endpoint_url: Option<String>,

    /// Address the bucket by path rather than by virtual host.
    #[arg(long)]
    pub force_path_style: bool,

    /// Log the retention decision without deleting anything.
    #[arg(long)]
    pub dry_run: bool,
}
