//! Command line front end for the tendermint light client.
#![deny(missing_docs, clippy::nursery, clippy::pedantic, warnings)]

pub mod cli;
pub mod config;
pub mod runners;
pub mod tracing;
