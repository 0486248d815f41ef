use clap::Parser;

pub const DATACENTER_ID_ENV: &str = "SNOWFLAKE_DATACENTER_ID";
pub const WORKER_ID_ENV: &str = "SNOWFLAKE_WORKER_ID";
pub const EPOCH_MS_ENV: &str = "SNOWFLAKE_EPOCH_MS";

pub const DEFAULT_WORKER_ID: &str = "0";
pub const DEFAULT_COUNT: &str = "1";

#[derive(Debug, Parser)]
#[command(name = "snowflake", about = "Mint or decode snowflake ids")]
pub struct CLI {
    /// Datacenter id in `[0, 31]`; derived from the host when omitted.
    #[arg(long, env = DATACENTER_ID_ENV)]
    pub datacenter_id: Option<u8>,

    /// Worker id in `[0, 31]`.
    #[arg(long, env = WORKER_ID_ENV, default_value = DEFAULT_WORKER_ID)]
    pub worker_id: u8,

    /// Custom epoch in unix milliseconds; the Twitter epoch when omitted.
    #[arg(long, env = EPOCH_MS_ENV)]
    pub epoch_ms: Option<i64>,

    /// Number of ids to print.
    #[arg(long, short = 'n', default_value = DEFAULT_COUNT)]
    pub count: u64,

    /// Print the instant this id was minted at instead of minting.
    #[arg(long, conflicts_with = "count")]
    pub decode: Option<u64>,
}
