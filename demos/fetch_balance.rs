use anyhow::Context;
use clap::Parser;
use serde::Deserialize;
use std::fs::File;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use utxo_payment_builder::api::instant_balance;
use utxo_payment_builder::ledger::InsightLedger;
use utxo_payment_builder::model::Address;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    endpoint: String,
    address: String,
}

#[derive(Parser, Debug)]
#[clap(version)]
pub struct Cli {
    /// path to config file
    #[clap(long, value_parser)]
    config_path: PathBuf,
}

#[tokio::main]
async fn main() {
    let result = _main().await;
    result.unwrap();
}

async fn _main() -> anyhow::Result<()> {
    // Start logging setup block
    let fmt_layer = tracing_subscriber::fmt::layer().with_test_writer();

    tracing_subscriber::registry().with(fmt_layer).init();

    let Cli { config_path } = Cli::parse();

    tracing::info!("Config file {:?}", config_path);
    let file = File::open(&config_path).with_context(|| {
        format!(
            "Cannot read config file {path}",
            path = config_path.display()
        )
    })?;
    let config: Config = serde_yaml::from_reader(file).with_context(|| {
        format!(
            "Cannot read config file {path}",
            path = config_path.display()
        )
    })?;

    let ledger = InsightLedger::new(config.endpoint)?;
    let balance = instant_balance(&ledger, &Address::new(config.address)).await?;

    tracing::info!(
        "address {}: {} coins ({} units) across {} utxos",
        balance.address,
        balance.balance,
        balance.balance_units,
        balance.utxo_count
    );
    println!("{}", serde_json::to_string_pretty(&balance)?);

    Ok(())
}
