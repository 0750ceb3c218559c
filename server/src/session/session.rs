use std::sync::Arc;

use log::{info, warn};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, WriteHalf};

use turret_shared::protocol::{INVALID_PASSWORD, LOGIN_SUCCESSFUL};
use turret_shared::{CommandEncoder, ResolvedCommand};

use crate::serial::CommandSink;
use crate::session::{AuthGate, AuthOutcome};
use crate::shutdown::ShutdownSignal;

/// Everything a connection task needs, cloned per accepted client.
#[derive(Clone)]
pub struct SessionContext {
    pub encoder: Arc<CommandEncoder>,
    pub sink: CommandSink,
    pub password: String,
    pub validation_bypass: bool,
    pub shutdown: ShutdownSignal,
}

/// Drives one client connection from accept to disconnect.
///
/// While unauthenticated every inbound line is a credential; afterwards
/// every line is a command. Successful commands are fire-and-forget:
/// only authentication outcomes produce a reply.
///
/// Generic over the stream so the accept loop can hand in plain TCP or
/// TLS, and tests can hand in an in-memory duplex.
pub async fn run_session<S>(stream: S, peer: &str, ctx: SessionContext)
where
    S: AsyncRead + AsyncWrite + Send,
{
    info!("Client connected to command server. [{peer}]");

    let (read_half, mut write_half) = tokio::io::split(stream);
    let mut lines = BufReader::new(read_half).lines();
    let mut gate = AuthGate::new(&ctx.password, ctx.validation_bypass);

    loop {
        let line = tokio::select! {
            _ = ctx.shutdown.triggered() => break,
            line = lines.next_line() => line,
        };
        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                warn!("Connection read failed [{peer}]: {err}");
                break;
            }
        };
        // Tolerate clients that frame lines with CRLF.
        let line = line.trim_end_matches('\r');

        if !gate.is_authenticated() {
            match gate.submit(line) {
                AuthOutcome::Accepted => {
                    if reply(&mut write_half, LOGIN_SUCCESSFUL).await.is_err() {
                        break;
                    }
                }
                AuthOutcome::Rejected => {
                    // Best effort; the connection closes either way.
                    let _ = reply(&mut write_half, INVALID_PASSWORD).await;
                    break;
                }
            }
            continue;
        }

        info!("Incoming command: {line}");
        match ctx.encoder.resolve(line) {
            Ok(ResolvedCommand::Serial(code)) => {
                if ctx.sink.send(code).await.is_err() {
                    warn!("Serial writer is gone; dropping connection. [{peer}]");
                    break;
                }
            }
            Ok(ResolvedCommand::Shutdown) => {
                info!("Shutdown command received.");
                ctx.shutdown.trigger();
                break;
            }
            // Unrecognized or out-of-range: report and carry on.
            Err(err) => warn!("{err}"),
        }
    }

    info!("Client disconnected. [{peer}]");
}

async fn reply<S>(write_half: &mut WriteHalf<S>, message: &str) -> std::io::Result<()>
where
    S: AsyncWrite,
{
    write_half.write_all(message.as_bytes()).await?;
    write_half.write_all(b"\n").await?;
    write_half.flush().await
}
