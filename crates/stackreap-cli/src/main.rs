use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use stackreap_provider_cfn::CloudFormationProvider;
use stackreap_runner::{Config, Overrides, RunOutcome, Runner};

#[derive(Parser, Debug)]
#[command(name = "stackreap", about = "List CloudFormation stacks by name prefix and optionally delete them")]
struct Cli {
    /// Stack name prefix to match [default: thisguymartin-pit]
    #[arg(long)]
    prefix: Option<String>,

    /// AWS region. If omitted, the ambient AWS configuration decides (AWS_REGION, profile).
    #[arg(long)]
    region: Option<String>,

    /// Delete matching stacks after an interactive confirmation
    #[arg(long, default_value_t = false)]
    delete: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let cfg_path = Config::default_path();
    let cfg = Config::load_or_default(&cfg_path)?
        .resolve(Overrides { prefix: cli.prefix, region: cli.region, delete: cli.delete })
        .with_context(|| format!("invalid configuration in {}", cfg_path.display()))?;

    let provider = CloudFormationProvider::from_env(cfg.region.as_deref())
        .await
        .context("unable to load AWS configuration")?;
    info!(region = provider.region(), prefix = %cfg.prefix, delete = cfg.delete_enabled, "starting");

    let runner = Runner::new(cfg, provider);
    // The answer comes from a blocking stdin read; keep it off the async workers.
    let summary = runner
        .run(|count, prefix| tokio::task::block_in_place(|| stackreap_hitl::confirm_on_terminal(count, prefix)))
        .await?;

    if let RunOutcome::Deleted(report) = &summary.outcome {
        let c = report.counts();
        println!(
            "Deleted {} of {} stacks ({} already gone, {} failed)",
            c.succeeded + c.already_gone,
            report.outcomes.len(),
            c.already_gone,
            c.failed
        );
    }
    Ok(())
}
