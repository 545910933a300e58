//! Volley stub service binary

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use volley_api::Server;
use volley_config::{ConfigLoader, TlsConfig, VolleyConfig};
use volley_logging::init_logging_from_config;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Plaintext bind address
    #[arg(short, long)]
    bind: Option<String>,

    /// TLS bind address (requires a certificate)
    #[arg(long)]
    tls_bind: Option<String>,

    /// PEM certificate for the TLS listener
    #[arg(long, value_name = "FILE", requires = "key")]
    cert: Option<String>,

    /// PEM private key for the TLS listener
    #[arg(long, value_name = "FILE", requires = "cert")]
    key: Option<String>,

    /// Delay of the slow endpoint in milliseconds
    #[arg(long)]
    slow_delay_ms: Option<u64>,

    /// Print the effective configuration as YAML and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ConfigLoader::new().load(cli.config.as_deref())?;
    apply_cli_overrides(&mut config, &cli)?;
    config.validate_all()?;

    if cli.print_config {
        println!("{}", serde_yaml::to_string(&config)?);
        return Ok(());
    }

    init_logging_from_config(&config.logging)?;

    Server::new(config.server).start().await?;
    Ok(())
}

/// Apply CLI argument overrides to configuration
fn apply_cli_overrides(config: &mut VolleyConfig, cli: &Cli) -> Result<()> {
    if let Some(bind) = &cli.bind {
        config.server.bind_address = bind.clone();
    }

    if let (Some(cert), Some(key)) = (&cli.cert, &cli.key) {
        let bind_address = config
            .server
            .tls
            .as_ref()
            .map(|tls| tls.bind_address.clone());
        let mut tls = TlsConfig::new(cert.clone(), key.clone());
        if let Some(bind_address) = bind_address {
            tls = tls.with_bind_address(bind_address);
        }
        config.server.tls = Some(tls);
    }

    if let Some(tls_bind) = &cli.tls_bind {
        match config.server.tls.as_mut() {
            Some(tls) => tls.bind_address = tls_bind.clone(),
            None => anyhow::bail!("--tls-bind requires --cert and --key (or a tls section in the config file)"),
        }
    }

    if let Some(delay) = cli.slow_delay_ms {
        config.server.slow_delay = Duration::from_millis(delay);
    }

    Ok(())
}
