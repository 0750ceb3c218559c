use std::time::Duration;

use log::info;

use turret_shared::protocol::codes;

use crate::serial::{CommandSink, SinkClosed};

/// Scripted drive-through of the command set, selected with `--test-mode`.
///
/// Exercises safety toggling, firing, both movement axes and combined
/// move-and-fire against whatever link is configured (hardware or
/// disabled). `pace` is the unit the original script counted seconds in;
/// tests pass `Duration::ZERO` to run the sequence instantly.
pub async fn run_test_sequence(sink: &CommandSink, pace: Duration) -> Result<(), SinkClosed> {
    info!("Initiating turret commands test...");
    pause(pace, 3).await;

    info!("Commanding SAFETY OFF");
    sink.send(codes::SAFETY_OFF).await?;
    pause(pace, 3).await;

    info!("Commanding SAFETY ON");
    sink.send(codes::SAFETY_ON).await?;
    pause(pace, 3).await;

    info!("Commanding SAFETY OFF");
    sink.send(codes::SAFETY_OFF).await?;
    pause(pace, 3).await;

    info!("Firing for 1 second");
    sink.send(codes::FIRE).await?;
    pause(pace, 1).await;
    sink.send(codes::STOP_FIRE).await?;
    pause(pace, 3).await;

    info!("Left at speed 7");
    sink.send(codes::ROTATE_ZERO - 7).await?;
    pause(pace, 7).await;

    info!("Right at speed 3");
    sink.send(codes::ROTATE_ZERO + 3).await?;
    pause(pace, 7).await;

    info!("Up at speed 10");
    sink.send(codes::PITCH_UP_MAX).await?;
    pause(pace, 7).await;

    info!("Down at speed 1");
    sink.send(codes::PITCH_ZERO - 1).await?;
    pause(pace, 7).await;

    info!("Testing moving and firing");
    sink.send(codes::ROTATE_ZERO + 3).await?;
    sink.send(codes::FIRE).await?;
    pause(pace, 1).await;
    sink.send(codes::STOP_FIRE).await?;
    pause(pace, 7).await;

    info!("Turning safety back on");
    sink.send(codes::SAFETY_ON).await?;
    pause(pace, 2).await;

    info!("Test complete.");
    Ok(())
}

async fn pause(pace: Duration, units: u32) {
    tokio::time::sleep(pace * units).await;
}
