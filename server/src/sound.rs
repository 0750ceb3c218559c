use std::path::Path;

use log::{info, warn};
use tokio::process::Command;

/// Plays the configured "turret ready" sound through an external player.
///
/// Lets the operator know the gun is live before the listener is up.
/// Failures are logged and otherwise ignored; a missing player or sound
/// file must never keep the relay from serving.
pub async fn play_ready_sound(path: &Path) {
    match Command::new("omxplayer").arg(path).status().await {
        Ok(status) if status.success() => {}
        Ok(status) => warn!("Ready sound player exited with {status}"),
        Err(err) => warn!("Could not play ready sound {}: {err}", path.display()),
    }
    info!("Turret is ready.");
}
