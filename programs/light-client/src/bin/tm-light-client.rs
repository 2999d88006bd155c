use clap::Parser;
use tendermint_light_client_cli::{
    cli::command::{Commands, LightClientCli},
    config::LightClientConfig,
    runners,
    tracing::init_subscriber,
};

fn main() -> anyhow::Result<()> {
    let cli = LightClientCli::parse();
    let config = match &cli.config {
        Some(path) => LightClientConfig::from_file(path)?,
        None => LightClientConfig::default(),
    };

    init_subscriber(&config.log)?;
    tracing::debug!(level = %config.log.level(), "logging initialized");

    match &cli.command {
        Commands::Update(args) => runners::update::run(args, config.verifier),
        Commands::Verify(args) => runners::verify::run(args, config.verifier),
    }
}
