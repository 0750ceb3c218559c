use log::{info, warn};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

use crate::shutdown::ShutdownSignal;

/// Free-running background task: reads lines the turret prints on its
/// serial side and forwards them to the console log.
///
/// The stream is uncorrelated with commands; it is diagnostics only.
/// Checks the shutdown signal between reads and exits voluntarily.
pub async fn drain_turret_output<R>(reader: R, shutdown: ShutdownSignal)
where
    R: AsyncRead + Unpin + Send,
{
    info!("Beginning turret output logging...");
    let mut lines = BufReader::new(reader).lines();
    loop {
        tokio::select! {
            _ = shutdown.triggered() => break,
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    let line = line.trim_end();
                    if !line.is_empty() {
                        info!("Turret: {line}");
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    warn!("Serial read failed: {err}");
                    break;
                }
            },
        }
    }
}
