use anyhow::Result;
use clap::Parser;
use futures::future::join_all;
use ivr_db::api::Database;
use ivr_dialplan::config::{Config, DEFAULT_CONFIG_PATH};
use ivr_dialplan::generator::DialplanGenerator;
use std::sync::Arc;
use tracing::info;

/// Regenerates switchboard dialplans and reloads Asterisk.
#[derive(Parser, Debug)]
#[command(name = "ivr-dialplan")]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Ids of the switchboards to regenerate.
    #[arg(required = true)]
    switchboards: Vec<i64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;
    let _guard = ivr_log::init(&config.log_level);

    let db = Database::new(&config.db)?;
    let generator = DialplanGenerator::from_config(Arc::new(db), &config);
    info!(
        mode = ?config.deployment_mode(),
        output = %config.output_dir().display(),
        "regenerating {} switchboards",
        cli.switchboards.len()
    );

    let runs = cli
        .switchboards
        .iter()
        .map(|id| generator.reload_switchboard(*id));
    for run in join_all(runs).await {
        run?;
    }
    Ok(())
}
