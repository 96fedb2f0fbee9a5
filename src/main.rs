use clap::Parser;
use tracing::info;

use freshness_check::cli::Cli;
use freshness_check::config::FreshnessConfig;
use freshness_check::freshness::checker::{Summary, check_all};
use freshness_check::logging;
use freshness_check::report;
use freshness_check::source::readers::{
    CloudsmithFixtureSource, CloudsmithRegistry, NexusFixtureSource,
};
use freshness_check::source::traits::CloudsmithSource;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = logging::init(&cli.log_level, cli.json_logs, cli.log_file_path().as_deref())?;
    let config = cli.resolve_config()?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli, config))
}

async fn run(cli: Cli, config: FreshnessConfig) -> anyhow::Result<()> {
    let nexus = NexusFixtureSource::new(&config.fixtures_dir);
    let cloudsmith: Box<dyn CloudsmithSource> = if cli.mock {
        Box::new(CloudsmithFixtureSource::new(&config.fixtures_dir))
    } else {
        Box::new(CloudsmithRegistry::new(config.cloudsmith.clone())?)
    };

    let options = cli.check_options(&config);
    info!(
        "Checking {:?} with {:?}, excluding tags {:?}",
        options.formats, options.tie_break, options.exclude_tags
    );

    let records = check_all(&nexus, cloudsmith.as_ref(), &options).await;
    Summary::from_records(&records).log();

    if let Some(path) = &cli.output_csv {
        report::write_csv(path, &records)?;
        info!("Wrote {} results to {:?}", records.len(), path);
    }

    Ok(())
}
