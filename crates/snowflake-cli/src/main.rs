mod cli;

use crate::cli::CLI;
use clap::Parser;
use jiff::Timestamp;
use snowflake_core::{node, NodeIdResolver, Snowflake, SnowflakeSettings, TWITTER_EPOCH};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = CLI::try_parse()?;

    let epoch = match config.epoch_ms {
        Some(ms) => Timestamp::from_millisecond(ms)?,
        None => TWITTER_EPOCH,
    };

    if let Some(id) = config.decode {
        let minted = snowflake_core::extract_timestamp(id, epoch);
        println!("{}", Timestamp::from_millisecond(minted)?);
        return Ok(());
    }

    let datacenter_id = match config.datacenter_id {
        Some(id) => id,
        None => node::default_resolver().resolve()?,
    };

    let generator = Snowflake::with_settings(
        SnowflakeSettings::builder()
            .datacenter_id(datacenter_id)
            .worker_id(config.worker_id)
            .epoch(epoch)
            .build(),
    )?;

    info!(
        datacenter_id = generator.datacenter_id(),
        worker_id = generator.worker_id(),
        epoch = %generator.epoch(),
        count = config.count,
        "minting snowflake ids"
    );

    for _ in 0..config.count {
        println!("{}", generator.next_id()?);
    }

    Ok(())
}
