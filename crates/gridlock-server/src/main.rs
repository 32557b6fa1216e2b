use std::time::Duration;

use clap::Parser;
use gridlock::prelude::*;
use tracing_subscriber::EnvFilter;

/// Two-player tic-tac-toe room server.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Address to bind to
    #[clap(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[clap(short, long, default_value = "3000")]
    port: u16,

    /// Seconds a room may sit with no players before it is removed (0 keeps rooms forever)
    #[clap(long, default_value = "0")]
    empty_room_grace_secs: u64,

    /// Seconds between sweeps for idle rooms
    #[clap(long, default_value = "30")]
    reap_interval_secs: u64,
}

impl Args {
    fn registry_config(&self) -> RegistryConfig {
        RegistryConfig {
            empty_room_grace: (self.empty_room_grace_secs > 0)
                .then(|| Duration::from_secs(self.empty_room_grace_secs)),
            reap_interval: Duration::from_secs(self.reap_interval_secs.max(1)),
            ..RegistryConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=gridlock_room=debug shows rejected moves and admissions
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .compact()
        .init();

    let args = Args::parse();
    let address = format!("{}:{}", args.host, args.port);

    let server = GridlockServer::builder()
        .bind(&address)
        .registry_config(args.registry_config())
        .build()
        .await?;
    tracing::info!(addr = %server.local_addr()?, "listening");

    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
            }
        })
        .await?;

    tracing::info!("bye");
    Ok(())
}
