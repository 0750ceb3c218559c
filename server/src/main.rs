use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use log::{error, info, warn};

use turret_shared::{CommandEncoder, CommandTable};

use turret_server::cli::Cli;
use turret_server::serial::SerialLink;
use turret_server::server::{RelayConfig, RelayServer};
use turret_server::session::SessionContext;
use turret_server::shutdown::ShutdownSignal;
use turret_server::{sound, test_sequence, RelayError};

const SYSTEM_CONFIG_PATH: &str = "/etc/turret-relay/config.toml";

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), RelayError> {
    let mut config = load_config(&cli)?;
    cli.apply_to(&mut config);

    info!("Turret manager software started.");

    let table = CommandTable::standard();
    table.validate()?;
    let encoder = Arc::new(CommandEncoder::new(table));

    let shutdown = ShutdownSignal::new();
    let link = SerialLink::connect(&config).await?;
    let sink = link.start(&shutdown);

    if cli.test_mode {
        test_sequence::run_test_sequence(&sink, Duration::from_secs(1)).await?;
        cleanup(&shutdown).await;
        return Ok(());
    }

    sound::play_ready_sound(&config.ready_sound_file).await;

    let ctx = SessionContext {
        encoder,
        sink,
        password: config.password.clone(),
        validation_bypass: config.validation_bypass,
        shutdown: shutdown.clone(),
    };
    let server = RelayServer::new(config, ctx);

    tokio::select! {
        result = server.run() => result?,
        signal = tokio::signal::ctrl_c() => {
            if let Err(err) = signal {
                warn!("Could not listen for interrupt: {err}");
            }
            info!("Interrupt received.");
        }
    }

    cleanup(&shutdown).await;
    info!("Turret manager software exited.");
    Ok(())
}

fn load_config(cli: &Cli) -> Result<RelayConfig, RelayError> {
    if let Some(path) = &cli.config {
        return RelayConfig::load(path);
    }
    let system = Path::new(SYSTEM_CONFIG_PATH);
    if system.is_file() {
        return RelayConfig::load(system);
    }
    Ok(RelayConfig::default())
}

/// Signals every background task and gives them one polling interval to
/// react before the serial link is dropped.
async fn cleanup(shutdown: &ShutdownSignal) {
    shutdown.trigger();
    tokio::time::sleep(Duration::from_secs(1)).await;
    info!("Connection to turret terminated.");
}
