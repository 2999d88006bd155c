//! Runners for the light client subcommands.

use std::{
    fs,
    path::Path,
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::Context;
use serde::{de::DeserializeOwned, Serialize};
use tendermint_light_client_types::Time;

use crate::cli::command::OutputPath;

pub mod update;
pub mod verify;

/// Reads and decodes a JSON file.
/// # Errors
/// Returns an error if the file cannot be read or decoded
pub fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("decoding {}", path.display()))
}

/// Writes `value` as pretty JSON to `output`.
/// # Errors
/// Returns an error if encoding or writing fails
pub fn write_json<T: Serialize>(output: &OutputPath, value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        OutputPath::Stdout => println!("{json}"),
        OutputPath::File(path) => {
            fs::write(path, json).with_context(|| format!("writing {path}"))?;
        }
    }
    Ok(())
}

/// Returns `now`, given in unix nanoseconds, or the system clock when not given.
/// # Errors
/// Returns an error if the system clock is before the unix epoch or the time is out of range
pub fn resolve_now(now: Option<u64>) -> anyhow::Result<Time> {
    let nanos = match now {
        Some(nanos) => u128::from(nanos),
        None => SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .context("system clock is before the unix epoch")?
            .as_nanos(),
    };
    let secs = i64::try_from(nanos / 1_000_000_000)?;
    let subsec = u32::try_from(nanos % 1_000_000_000)?;
    Time::from_unix_timestamp(secs, subsec).map_err(|e| anyhow::anyhow!("invalid time: {e}"))
}
