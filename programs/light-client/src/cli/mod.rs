//! Command line interface definitions.

pub mod command;
