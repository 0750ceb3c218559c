//! Operator console for the turret relay.
//!
//! Connects to the relay over plain TCP, submits the password, then
//! forwards every line typed on stdin as a command. Server replies (the
//! two authentication messages) are printed as they arrive; commands
//! themselves are fire-and-forget and produce no reply.

use std::process::ExitCode;

use clap::Parser;
use log::{error, info};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use turret_shared::protocol::LOGIN_SUCCESSFUL;

/// Interactive command console for the turret relay.
#[derive(Parser, Debug)]
#[command(name = "turret-client", version, about)]
struct Cli {
    /// Host the relay is listening on
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port the relay is listening on
    #[arg(short = 'p', long, default_value_t = 9001)]
    port: u16,

    /// Password to authenticate with; omit when the relay runs with
    /// validation bypass
    #[arg(short = 'w', long)]
    password: Option<String>,
}

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

async fn run(cli: Cli) -> std::io::Result<()> {
    let addr = format!("{}:{}", cli.host, cli.port);
    info!("Connecting to turret relay at {addr}...");
    let stream = TcpStream::connect(&addr).await?;
    let (read_half, mut write_half) = stream.into_split();
    let mut replies = BufReader::new(read_half).lines();

    if let Some(password) = &cli.password {
        write_half.write_all(password.as_bytes()).await?;
        write_half.write_all(b"\n").await?;
        match replies.next_line().await? {
            Some(reply) if reply == LOGIN_SUCCESSFUL => info!("{reply}"),
            Some(reply) => {
                // The relay already hung up on us.
                error!("{reply}");
                return Ok(());
            }
            None => {
                error!("Relay closed the connection during login.");
                return Ok(());
            }
        }
    }

    // Print any further server output as it arrives.
    let printer = tokio::spawn(async move {
        while let Ok(Some(reply)) = replies.next_line().await {
            println!("{reply}");
        }
    });

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = input.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        write_half.write_all(line.as_bytes()).await?;
        write_half.write_all(b"\n").await?;
    }

    // stdin closed; hang up and let the printer drain.
    write_half.shutdown().await?;
    let _ = printer.await;
    info!("Disconnected.");
    Ok(())
}
