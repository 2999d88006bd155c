//! Contains the command line interface for the application.

use std::{convert::Infallible, path::PathBuf};

use clap::Parser;
use tendermint_light_client_types::TrustThreshold;

/// The command line interface for the light client.
#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct LightClientCli {
    /// Optional TOML configuration with `[log]` and `[verifier]` sections.
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// The subcommands for the light client.
#[derive(Clone, Debug, Parser)]
pub enum Commands {
    /// Apply a header to a client state and print the new states.
    Update(UpdateCmd),
    /// Verify a target light block against a trusted one.
    Verify(VerifyCmd),
}

/// The arguments for the `update` subcommand.
#[derive(Clone, Debug, Parser)]
#[command(about = "Apply a header to a client state")]
pub struct UpdateCmd {
    /// Path to the JSON encoded client state.
    #[clap(long)]
    pub client_state: PathBuf,

    /// Path to the JSON encoded header.
    #[clap(long)]
    pub header: PathBuf,

    /// Current time in unix nanoseconds. [default: system clock]
    #[clap(long)]
    pub now: Option<u64>,

    /// Output path. If not provided, the output will be written to stdout.
    #[clap(long, short = 'o', value_parser = parse_output_path, default_value = "-")]
    pub output_path: OutputPath,
}

/// The arguments for the `verify` subcommand.
#[derive(Clone, Debug, Parser)]
#[command(about = "Verify a target light block against a trusted one")]
pub struct VerifyCmd {
    /// Path to the JSON encoded trusted light block.
    #[clap(long)]
    pub trusted: PathBuf,

    /// Path to the JSON encoded target light block.
    #[clap(long)]
    pub target: PathBuf,

    /// Path to a JSON array of light blocks used for bisection.
    #[clap(long)]
    pub headers: Option<PathBuf>,

    /// Trust options
    #[clap(flatten)]
    pub trust_options: TrustOptions,

    /// Current time in unix nanoseconds. [default: system clock]
    #[clap(long)]
    pub now: Option<u64>,
}

/// The trust options for verification.
#[derive(Clone, Debug, Parser)]
pub struct TrustOptions {
    /// Trust level.
    #[clap(
        long,
        default_value = "1/3",
        value_parser = parse_trust_threshold,
        help = "Trust level as a fraction, e.g. '2/3'",
    )]
    pub trust_level: TrustThreshold,

    /// Trusting period in seconds.
    #[clap(long)]
    pub trusting_period_secs: u64,

    /// Maximum tolerated clock drift in seconds.
    #[clap(long, default_value_t = 10)]
    pub max_clock_drift_secs: u64,
}

/// The output path for files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputPath {
    /// Write the output to stdout.
    Stdout,
    /// Write the output to a file.
    File(String),
}

#[allow(clippy::unnecessary_wraps)]
fn parse_output_path(path: &str) -> Result<OutputPath, Infallible> {
    if path == "-" {
        Ok(OutputPath::Stdout)
    } else {
        Ok(OutputPath::File(path.to_string()))
    }
}

fn parse_trust_threshold(input: &str) -> anyhow::Result<TrustThreshold> {
    let (num_part, denom_part) = input.split_once('/').ok_or_else(|| {
        anyhow::anyhow!("invalid trust threshold fraction: expected format 'numerator/denominator'")
    })?;
    let numerator = num_part
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid numerator for the fraction"))?;
    let denominator = denom_part
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid denominator for the fraction"))?;
    TrustThreshold::new(numerator, denominator)
        .map_err(|e| anyhow::anyhow!("invalid trust threshold: {e}"))
}
