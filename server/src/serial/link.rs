use std::time::Duration;

use log::{error, info, warn};
use thiserror::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio_serial::SerialPortBuilderExt;

use crate::error::RelayError;
use crate::server::RelayConfig;
use crate::shutdown::ShutdownSignal;

use super::reader::drain_turret_output;

// The port needs a moment after opening before the firmware listens.
const SETTLE_DELAY: Duration = Duration::from_secs(3);

const COMMAND_QUEUE_DEPTH: usize = 32;

/// The serial writer task has exited; no further commands can be sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("serial command writer is gone")]
pub struct SinkClosed;

/// Cloneable handle that queues command bytes for the single serial
/// writer task.
///
/// All sessions funnel through one of these, so concurrent clients can
/// never interleave partial writes on the wire.
#[derive(Clone)]
pub struct CommandSink {
    tx: mpsc::Sender<u8>,
}

impl CommandSink {
    /// Creates a sink and the receiving end a writer task drains.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<u8>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Queues one command byte for transmission.
    pub async fn send(&self, code: u8) -> Result<(), SinkClosed> {
        self.tx.send(code).await.map_err(|_| SinkClosed)
    }
}

/// The single logical connection to the turret hardware.
///
/// `port: None` is the explicitly selected no-hardware mode: commands are
/// resolved and logged but nothing is ever written to a device.
pub struct SerialLink {
    port: Option<tokio_serial::SerialStream>,
}

impl SerialLink {
    /// Opens the serial device, or sets up no-hardware mode when the
    /// config asks for it. A failed open in hardware mode is the one
    /// fatal startup condition.
    pub async fn connect(config: &RelayConfig) -> Result<Self, RelayError> {
        if config.no_turret {
            info!("Running without a turret serial connection.");
            return Ok(Self { port: None });
        }

        list_available_ports();

        info!("Attempting to connect to turret on {}...", config.serial_port);
        let port = tokio_serial::new(&config.serial_port, config.baud_rate)
            .timeout(Duration::from_secs(2))
            .open_native_async()
            .map_err(|source| RelayError::SerialOpen {
                port: config.serial_port.clone(),
                source,
            })?;
        tokio::time::sleep(SETTLE_DELAY).await;
        info!("Connection established");

        Ok(Self { port: Some(port) })
    }

    pub fn hardware_attached(&self) -> bool {
        self.port.is_some()
    }

    /// Splits the link into its two background tasks and returns the
    /// write handle: a writer task owning the outbound half, and the
    /// free-running reader that forwards turret output to the console.
    pub fn start(self, shutdown: &ShutdownSignal) -> CommandSink {
        let (sink, rx) = CommandSink::channel(COMMAND_QUEUE_DEPTH);
        match self.port {
            Some(port) => {
                let (read_half, write_half) = tokio::io::split(port);
                tokio::spawn(write_serial_commands(write_half, rx, shutdown.clone()));
                tokio::spawn(drain_turret_output(read_half, shutdown.clone()));
            }
            None => {
                tokio::spawn(log_unsent_commands(rx, shutdown.clone()));
            }
        }
        sink
    }
}

/// Writer task for hardware mode. Sole owner of the outbound serial half.
pub async fn write_serial_commands<W>(
    mut writer: W,
    mut rx: mpsc::Receiver<u8>,
    shutdown: ShutdownSignal,
) where
    W: AsyncWrite + Unpin + Send,
{
    loop {
        tokio::select! {
            _ = shutdown.triggered() => break,
            code = rx.recv() => match code {
                Some(code) => {
                    info!("Sending command: 0x{code:02X}");
                    if let Err(err) = writer.write_all(&[code]).await {
                        error!("Serial write failed: {err}");
                    }
                }
                None => break,
            },
        }
    }
}

/// Writer task for no-hardware mode: the resolved byte is logged
/// unmodified and nothing is written anywhere.
pub async fn log_unsent_commands(mut rx: mpsc::Receiver<u8>, shutdown: ShutdownSignal) {
    loop {
        tokio::select! {
            _ = shutdown.triggered() => break,
            code = rx.recv() => match code {
                Some(code) => {
                    info!("Sending command: 0x{code:02X}");
                    info!("Serial connection disabled. Command was not sent to the turret.");
                }
                None => break,
            },
        }
    }
}

fn list_available_ports() {
    match tokio_serial::available_ports() {
        Ok(ports) if ports.is_empty() => info!("No serial ports detected."),
        Ok(ports) => {
            info!("Available serial ports:");
            for port in ports {
                info!("  {}", port.port_name);
            }
        }
        Err(err) => warn!("Could not enumerate serial ports: {err}"),
    }
}
