mod cli;
mod config;
mod prune;

use clap::Parser;
use deadhead_store::{S3Bucket, S3Options};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = cli::Args::parse();

    // Resolve the retention mode before touching AWS at all.
    let policy = config::resolve_policy(&args)?;
    let dry_run = args.dry_run;

    // One session serves the whole run, listing and deletion alike.
    let bucket = S3Bucket::connect(S3Options {
        bucket: args.bucket_name,
        region: args.region,
        endpoint_url: args.endpoint_url,
        access_key: args.access_key,
        secret_key: args.secret_key,
        force_path_style: args.force_path_style,
    })
    .await?;

    let outcome = prune::run_prune(&bucket, &policy, dry_run).await?;

    info!(
        "Prune complete: {} retained, {} pruned, {} failed, {} object(s) removed",
        outcome.retained, outcome.pruned, outcome.failed, outcome.objects_removed
    );

    if outcome.has_failures() {
        anyhow::bail!("{} deployment(s) failed to delete", outcome.failed);
    }

    Ok(())
}
